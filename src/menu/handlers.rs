use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AdminUser,
    error::ApiError,
    response::{created, ok, ok_message, Envelope},
    state::AppState,
};

use super::dto::{CategoryItems, CreateMenuItem, MenuPage, MenuQuery, UpdateMenuItem};
use super::repo_types::MenuItem;

pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/menu-items", get(list_items).post(create_item))
        .route("/menu-items/category/:category", get(items_by_category))
        .route(
            "/menu-items/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<Envelope<MenuPage>>, ApiError> {
    let (items, total) = MenuItem::list(&state.db, &query).await?;
    let limit = query.limit.clamp(1, 100);
    let page = MenuPage {
        count: items.len(),
        total,
        current_page: query.page.max(1),
        total_pages: (total + limit - 1) / limit,
        items,
    };
    Ok(ok("Menu items fetched successfully", page))
}

#[instrument(skip(state))]
pub async fn items_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Envelope<CategoryItems>>, ApiError> {
    let items = MenuItem::list_by_category(&state.db, &category).await?;
    Ok(ok(
        "Menu items fetched successfully",
        CategoryItems {
            count: items.len(),
            items,
            category,
        },
    ))
}

#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<MenuItem>>, ApiError> {
    let item = MenuItem::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Menu item"))?;
    Ok(ok("Menu item fetched successfully", item))
}

#[instrument(skip(state, admin, payload), fields(admin_id = %admin.id))]
pub async fn create_item(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateMenuItem>,
) -> Result<(StatusCode, Json<Envelope<MenuItem>>), ApiError> {
    payload.validate()?;
    let item = MenuItem::create(&state.db, &payload).await?;
    info!(id = %item.id, name = %item.name, "menu item created");
    Ok(created("Menu item created successfully", item))
}

#[instrument(skip(state, admin, payload), fields(admin_id = %admin.id))]
pub async fn update_item(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMenuItem>,
) -> Result<Json<Envelope<MenuItem>>, ApiError> {
    payload.validate()?;
    let item = MenuItem::update(&state.db, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Menu item"))?;
    info!(%id, "menu item updated");
    Ok(ok("Menu item updated successfully", item))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete_item(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<()>>, ApiError> {
    if !MenuItem::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Menu item"));
    }
    info!(%id, "menu item deleted");
    Ok(ok_message("Menu item deleted successfully"))
}
