//! Field-level request validation. Each request DTO implements a
//! `validate()` built from these helpers; failures surface as one 400 with
//! per-field detail.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ApiError, FieldError};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref DATE_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref TIME_RE: Regex = Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Calendar date in YYYY-MM-DD, checked for shape and validity.
pub fn is_valid_date(date: &str) -> bool {
    if !DATE_RE.is_match(date) {
        return false;
    }
    let format = time::macros::format_description!("[year]-[month]-[day]");
    time::Date::parse(date, &format).is_ok()
}

/// Wall-clock time in HH:MM.
pub fn is_valid_time(t: &str) -> bool {
    TIME_RE.is_match(t)
}

/// Collects field errors so a response can report all of them at once.
#[derive(Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, field: &'static str, message: impl Into<String>) {
        if !ok {
            self.errors.push(FieldError::new(field, message));
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("jane@x.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email("jane@x"));
        assert!(!is_valid_email("jane x@x.com"));
        assert!(!is_valid_email("@x.com"));
    }

    #[test]
    fn date_shapes() {
        assert!(is_valid_date("2026-08-29"));
        assert!(!is_valid_date("2026-13-01"));
        assert!(!is_valid_date("2026-02-30"));
        assert!(!is_valid_date("29-08-2026"));
    }

    #[test]
    fn time_shapes() {
        assert!(is_valid_time("19:30"));
        assert!(is_valid_time("9:05"));
        assert!(is_valid_time("23:59"));
        assert!(!is_valid_time("24:00"));
        assert!(!is_valid_time("19:60"));
        assert!(!is_valid_time("7pm"));
    }

    #[test]
    fn validator_collects_all_failures() {
        let mut v = Validator::new();
        v.check(false, "name", "Name is required");
        v.check(true, "email", "unused");
        v.check(false, "phone", "Phone is required");
        let err = v.finish().unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].field, "name");
                assert_eq!(fields[1].field, "phone");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
