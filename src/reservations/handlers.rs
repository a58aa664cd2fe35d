use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AdminUser,
    email,
    error::ApiError,
    response::{created, ok, ok_message, Envelope},
    state::AppState,
};

use super::dto::{CreateReservation, ReservationList, ReservationsByDate, UpdateReservationStatus};
use super::repo_types::Reservation;

pub fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reservations",
            get(list_reservations).post(create_reservation),
        )
        .route("/reservations/date/:date", get(reservations_by_date))
        .route(
            "/reservations/:id",
            get(get_reservation)
                .put(update_reservation_status)
                .delete(delete_reservation),
        )
}

/// POST /api/reservations — public. Emails go out after the row is
/// committed; a delivery failure never rolls the booking back.
#[instrument(skip(state, payload))]
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(mut payload): Json<CreateReservation>,
) -> Result<(StatusCode, Json<Envelope<Reservation>>), ApiError> {
    payload.normalize();
    payload.validate()?;

    let reservation = Reservation::create(&state.db, &payload).await?;
    email::spawn_reservation_emails(state.mailer.clone(), reservation.clone());

    info!(id = %reservation.id, date = %reservation.date, "reservation created");
    Ok(created(
        "Reservation created successfully. Confirmation email sent.",
        reservation,
    ))
}

/// GET /api/reservations — admin only; the full list carries guest PII.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn list_reservations(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<Envelope<ReservationList>>, ApiError> {
    let items = Reservation::list_all(&state.db).await?;
    Ok(ok(
        "Reservations fetched successfully",
        ReservationList {
            count: items.len(),
            items,
        },
    ))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn reservations_by_date(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(date): Path<String>,
) -> Result<Json<Envelope<ReservationsByDate>>, ApiError> {
    let items = Reservation::list_by_date(&state.db, &date).await?;
    Ok(ok(
        "Reservations fetched successfully",
        ReservationsByDate {
            count: items.len(),
            items,
            date,
        },
    ))
}

#[instrument(skip(state))]
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Reservation>>, ApiError> {
    let reservation = Reservation::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Reservation"))?;
    Ok(ok("Reservation fetched successfully", reservation))
}

#[instrument(skip(state, admin, payload), fields(admin_id = %admin.id))]
pub async fn update_reservation_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservationStatus>,
) -> Result<Json<Envelope<Reservation>>, ApiError> {
    let reservation = Reservation::update_status(&state.db, id, payload.status)
        .await?
        .ok_or(ApiError::NotFound("Reservation"))?;
    info!(%id, status = ?payload.status, "reservation status updated");
    Ok(ok("Reservation updated successfully", reservation))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete_reservation(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<()>>, ApiError> {
    if !Reservation::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Reservation"));
    }
    info!(%id, "reservation deleted");
    Ok(ok_message("Reservation deleted successfully"))
}
