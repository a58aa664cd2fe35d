//! One-time passcode lifecycle: a short-lived numeric code generated on
//! register/login and consumed exactly once on verify. Persistence is the
//! caller's job (`User::set_otp` / `User::consume_otp`).

use rand::Rng;
use time::{Duration, OffsetDateTime};

pub const OTP_DIGITS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpError {
    /// No code is pending (never issued, or already consumed).
    Missing,
    /// The stored code's expiry has passed.
    Expired,
    /// The submitted code does not match the stored one.
    Mismatch,
}

/// Produce a uniformly random zero-padded numeric code and its expiry.
pub fn generate(ttl_minutes: i64) -> (String, OffsetDateTime) {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    let expires = OffsetDateTime::now_utc() + Duration::minutes(ttl_minutes);
    (format!("{code:06}"), expires)
}

/// Validate a submitted code against the stored one. Expiry is checked
/// before the code itself so an expired-but-correct code still reports
/// `Expired`.
pub fn check(
    stored: Option<&str>,
    expires: Option<OffsetDateTime>,
    submitted: &str,
) -> Result<(), OtpError> {
    let (code, expires) = match (stored, expires) {
        (Some(code), Some(expires)) => (code, expires),
        _ => return Err(OtpError::Missing),
    };
    if OffsetDateTime::now_utc() >= expires {
        return Err(OtpError::Expired);
    }
    if !constant_time_eq(code, submitted) {
        return Err(OtpError::Mismatch);
    }
    Ok(())
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn future() -> OffsetDateTime {
        OffsetDateTime::now_utc() + Duration::minutes(5)
    }

    #[test]
    fn generate_returns_fixed_length_numeric_code() {
        for _ in 0..50 {
            let (code, expires) = generate(10);
            assert_eq!(code.len(), OTP_DIGITS);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
            assert!(expires > OffsetDateTime::now_utc());
        }
    }

    #[test]
    fn check_accepts_matching_code_before_expiry() {
        assert_eq!(check(Some("042137"), Some(future()), "042137"), Ok(()));
    }

    #[test]
    fn check_fails_missing_when_no_code_is_pending() {
        assert_eq!(check(None, None, "123456"), Err(OtpError::Missing));
        // Half-set state must never validate.
        assert_eq!(check(Some("123456"), None, "123456"), Err(OtpError::Missing));
        assert_eq!(check(None, Some(future()), "123456"), Err(OtpError::Missing));
    }

    #[test]
    fn check_fails_expired_even_for_the_correct_code() {
        let past = OffsetDateTime::now_utc() - Duration::minutes(1);
        assert_eq!(
            check(Some("123456"), Some(past), "123456"),
            Err(OtpError::Expired)
        );
    }

    #[test]
    fn check_fails_mismatch_on_wrong_code() {
        assert_eq!(
            check(Some("123456"), Some(future()), "654321"),
            Err(OtpError::Mismatch)
        );
    }

    #[test]
    fn constant_time_eq_handles_length_and_content() {
        assert!(constant_time_eq("123456", "123456"));
        assert!(!constant_time_eq("123456", "123457"));
        assert!(!constant_time_eq("123456", "12345"));
        assert!(constant_time_eq("", ""));
    }
}
