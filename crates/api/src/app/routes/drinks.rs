use axum::{
    Extension, Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    middleware::from_fn_with_state,
    routing::{MethodRouter, delete, get, patch, post},
};

use coffeeshop_auth::{Claims, Permission};
use coffeeshop_core::{Drink, DrinkId, DrinkLong, DrinkShort};

use crate::app::dto::{
    CreateDrinkRequest, DeleteResponse, DrinksResponse, PatchDrinkRequest,
};
use crate::app::errors::ApiError;
use crate::app::services::AppState;
use crate::middleware::{PermissionGuard, require_permission};

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/drinks",
            get(list_drinks).merge(guarded(post(create_drink), state, Permission::POST_DRINKS)),
        )
        .route(
            "/drinks-detail",
            guarded(get(list_drinks_detail), state, Permission::GET_DRINKS_DETAIL),
        )
        .route(
            "/drinks/:id",
            guarded(patch(update_drink), state, Permission::PATCH_DRINKS).merge(guarded(
                delete(delete_drink),
                state,
                Permission::DELETE_DRINKS,
            )),
        )
}

/// Wrap `route` so it only runs for callers holding `required`.
fn guarded(
    route: MethodRouter<AppState>,
    state: &AppState,
    required: Permission,
) -> MethodRouter<AppState> {
    let guard = PermissionGuard::new(state.verifier.clone(), required);
    route.route_layer(from_fn_with_state(guard, require_permission))
}

pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<Vec<DrinkShort>>>, ApiError> {
    let drinks = state.store.list_all().await?;
    tracing::debug!(count = drinks.len(), "listed drinks");
    Ok(Json(DrinksResponse::new(
        drinks.iter().map(Drink::short).collect(),
    )))
}

pub async fn list_drinks_detail(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<Vec<DrinkLong>>>, ApiError> {
    let drinks = state.store.list_all().await?;
    tracing::debug!(count = drinks.len(), "listed drink details");
    Ok(Json(DrinksResponse::new(
        drinks.iter().map(Drink::long).collect(),
    )))
}

pub async fn create_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, ApiError> {
    let Json(body) = body?;

    let drink = state.store.create(body.into()).await?;
    tracing::info!(
        drink_id = %drink.id(),
        title = drink.title(),
        sub = claims.sub.as_deref().unwrap_or("-"),
        "drink created"
    );

    Ok(Json(DrinksResponse::new(drink.long())))
}

pub async fn update_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    body: Result<Json<PatchDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<Vec<DrinkLong>>>, ApiError> {
    let id = parse_id(&id)?;
    if state.store.find_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let Json(body) = body?;
    let drink = state
        .store
        .update(id, body.into())
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(
        drink_id = %id,
        sub = claims.sub.as_deref().unwrap_or("-"),
        "drink updated"
    );

    Ok(Json(DrinksResponse::new(vec![drink.long()])))
}

pub async fn delete_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_id(&id)?;
    let existing = state
        .store
        .find_by_id(id)
        .await
        .map_err(ApiError::unprocessable)?;
    if existing.is_none() {
        return Err(ApiError::NotFound);
    }

    let deleted = state
        .store
        .delete(id)
        .await
        .map_err(ApiError::unprocessable)?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(
        drink_id = %deleted,
        sub = claims.sub.as_deref().unwrap_or("-"),
        "drink deleted"
    );

    Ok(Json(DeleteResponse {
        success: true,
        delete: deleted,
    }))
}

/// Path ids must be integers; anything else does not name a drink.
fn parse_id(raw: &str) -> Result<DrinkId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}
