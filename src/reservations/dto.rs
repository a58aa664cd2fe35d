use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::validate::{is_valid_date, is_valid_email, is_valid_time, Validator};

use super::repo_types::{Reservation, ReservationStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservation {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub people: i32,
    #[serde(default)]
    pub special_requests: String,
}

impl CreateReservation {
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.phone = self.phone.trim().to_string();
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check(
            (2..=100).contains(&self.name.chars().count()),
            "name",
            "Name must be between 2 and 100 characters",
        );
        v.check(is_valid_email(&self.email), "email", "Valid email is required");
        v.check(
            (10..=20).contains(&self.phone.len()),
            "phone",
            "Phone must be between 10 and 20 characters",
        );
        v.check(
            is_valid_date(&self.date),
            "date",
            "Valid date is required (YYYY-MM-DD format)",
        );
        v.check(
            is_valid_time(&self.time),
            "time",
            "Valid time is required (HH:MM format)",
        );
        v.check(
            (1..=20).contains(&self.people),
            "people",
            "Number of people must be between 1 and 20",
        );
        v.check(
            self.special_requests.chars().count() <= 500,
            "specialRequests",
            "Special requests cannot exceed 500 characters",
        );
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateReservationStatus {
    pub status: ReservationStatus,
}

#[derive(Debug, Serialize)]
pub struct ReservationList {
    pub items: Vec<Reservation>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ReservationsByDate {
    pub items: Vec<Reservation>,
    pub count: usize,
    pub date: String,
}
