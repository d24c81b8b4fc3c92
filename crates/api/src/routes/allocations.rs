//! Order line allocation endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use repository::BatchRepository;
use serde::Serialize;
use services::Allocate;

use super::AppState;
use super::batches::OrderLineBody;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct AllocateResponse {
    pub batchref: String,
}

/// POST /allocate — allocate an order line to the preferred batch.
///
/// Responds 409 when no batch of the SKU has enough stock left.
#[tracing::instrument(skip(state, req), fields(orderid = %req.orderid, sku = %req.sku))]
pub async fn allocate<R: BatchRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<OrderLineBody>,
) -> Result<(StatusCode, Json<AllocateResponse>), ApiError> {
    let batchref = state
        .service
        .allocate(Allocate::new(req.orderid, req.sku, req.qty))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AllocateResponse {
            batchref: batchref.into_inner(),
        }),
    ))
}
