use super::state::SharedState;
use crate::admin;
use crate::calculations::latest_prices;
use crate::error::ApiError;
use crate::types::{ClientId, Factory, NewFactory, PriceHistory, ResetSummary, SeedOutcome};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn list_factories(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Factory>>, ApiError> {
    let factories = state.store.list_factories().await?;
    Ok(Json(factories))
}

pub async fn create_factory(
    State(state): State<SharedState>,
    payload: Result<Json<NewFactory>, JsonRejection>,
) -> Result<(StatusCode, Json<Factory>), ApiError> {
    // Body errors answer in the same JSON shape as every other 400
    let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Factory name is required".to_string()));
    }

    let factory = state
        .store
        .create_factory(NewFactory {
            name: name.to_string(),
        })
        .await?;

    info!("🏭 Factory {} created (id={})", factory.name, factory.id);
    Ok((StatusCode::CREATED, Json(factory)))
}

/// Latest unit price per product for one client. Unknown clients get `{}`.
pub async fn price_history(
    State(state): State<SharedState>,
    Path(client_id): Path<ClientId>,
) -> Result<Json<PriceHistory>, ApiError> {
    let orders = state.store.orders_for_client(client_id).await?;
    let prices = latest_prices(&orders)?;
    Ok(Json(prices))
}

pub async fn seed_admin(
    State(state): State<SharedState>,
) -> Result<(StatusCode, Json<SeedOutcome>), ApiError> {
    let outcome = admin::seed_admin(state.store.as_ref(), &state.config.admin).await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

pub async fn reset_data(
    State(state): State<SharedState>,
) -> Result<Json<ResetSummary>, ApiError> {
    if !state.config.allow_reset {
        warn!("Reset requested while ALLOW_RESET is off");
        return Err(ApiError::Forbidden("Reset is disabled".to_string()));
    }

    let summary = state.store.reset_transactional_data().await?;
    Ok(Json(summary))
}
