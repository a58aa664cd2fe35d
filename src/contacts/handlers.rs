use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{AdminUser, MaybeUser},
    error::ApiError,
    response::{created, ok, ok_message, Envelope},
    state::AppState,
};

use super::dto::{
    CallerInfo, ContactList, ContactsByStatus, CreateContact, CreatedContact, UpdateContactStatus,
};
use super::repo_types::{Contact, ContactStatus};

pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/status/:status", get(contacts_by_status))
        .route(
            "/contacts/:id",
            get(get_contact).put(update_contact_status).delete(delete_contact),
        )
}

/// GET /api/contacts — public; echoes the caller identity when a valid
/// token happened to be attached.
#[instrument(skip(state, caller))]
pub async fn list_contacts(
    State(state): State<AppState>,
    MaybeUser(caller): MaybeUser,
) -> Result<Json<Envelope<ContactList>>, ApiError> {
    let items = Contact::list_all(&state.db).await?;
    Ok(ok(
        "Contacts fetched successfully",
        ContactList {
            count: items.len(),
            items,
            user: caller.as_ref().map(CallerInfo::from),
        },
    ))
}

#[instrument(skip(state))]
pub async fn contacts_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Envelope<ContactsByStatus>>, ApiError> {
    let status: ContactStatus = status
        .parse()
        .map_err(|()| ApiError::NotFound("Contact status"))?;
    let items = Contact::list_by_status(&state.db, status).await?;
    Ok(ok(
        "Contacts fetched successfully",
        ContactsByStatus {
            count: items.len(),
            items,
            status,
        },
    ))
}

#[instrument(skip(state))]
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Contact>>, ApiError> {
    let contact = Contact::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Contact"))?;
    Ok(ok("Contact fetched successfully", contact))
}

/// POST /api/contacts — public; stamps the sender's account onto the
/// message when they were logged in.
#[instrument(skip(state, caller, payload))]
pub async fn create_contact(
    State(state): State<AppState>,
    MaybeUser(caller): MaybeUser,
    Json(mut payload): Json<CreateContact>,
) -> Result<(StatusCode, Json<Envelope<CreatedContact>>), ApiError> {
    payload.normalize();
    payload.validate()?;

    let contact = Contact::create(&state.db, &payload, caller.as_ref()).await?;
    info!(id = %contact.id, logged_in = caller.is_some(), "contact message created");
    Ok(created(
        "Contact message sent successfully",
        CreatedContact {
            contact,
            user: caller.as_ref().map(CallerInfo::from),
        },
    ))
}

#[instrument(skip(state, admin, payload), fields(admin_id = %admin.id))]
pub async fn update_contact_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContactStatus>,
) -> Result<Json<Envelope<Contact>>, ApiError> {
    let contact = Contact::update_status(&state.db, id, payload.status)
        .await?
        .ok_or(ApiError::NotFound("Contact"))?;
    info!(%id, status = ?payload.status, "contact status updated");
    Ok(ok("Contact updated successfully", contact))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete_contact(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<()>>, ApiError> {
    if !Contact::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Contact"));
    }
    info!(%id, "contact deleted");
    Ok(ok_message("Contact deleted successfully"))
}
