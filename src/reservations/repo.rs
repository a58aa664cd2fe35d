use sqlx::PgPool;
use uuid::Uuid;

use super::dto::CreateReservation;
use super::repo_types::{Reservation, ReservationStatus};

const RESERVATION_COLUMNS: &str =
    "id, name, email, phone, date, time, people, special_requests, status, \
     created_at, updated_at";

impl Reservation {
    pub async fn create(db: &PgPool, payload: &CreateReservation) -> anyhow::Result<Reservation> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            "INSERT INTO reservations (name, email, phone, date, time, people, special_requests)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.date)
        .bind(&payload.time)
        .bind(payload.people)
        .bind(&payload.special_requests)
        .fetch_one(db)
        .await?;
        Ok(reservation)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations ORDER BY date DESC, time DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_date(db: &PgPool, date: &str) -> anyhow::Result<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE date = $1 ORDER BY time ASC"
        ))
        .bind(date)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Reservation>> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(reservation)
    }

    pub async fn update_status(
        db: &PgPool,
        id: Uuid,
        status: ReservationStatus,
    ) -> anyhow::Result<Option<Reservation>> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            "UPDATE reservations SET status = $2, updated_at = now()
             WHERE id = $1
             RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(db)
        .await?;
        Ok(reservation)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
