//! Batch registration, lookup and deallocation endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use common::BatchReference;
use domain::{Batch, OrderLine};
use repository::BatchRepository;
use serde::{Deserialize, Serialize};
use services::{AddBatch, Deallocate};

use super::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateBatchRequest {
    pub reference: Option<String>,
    pub sku: String,
    pub quantity: u32,
    pub eta: Option<NaiveDate>,
}

/// An order line as it appears on the wire, in requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineBody {
    pub orderid: String,
    pub sku: String,
    pub qty: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct BatchResponse {
    pub reference: String,
    pub sku: String,
    pub purchased_quantity: u32,
    pub allocated_quantity: u32,
    pub available_quantity: u32,
    pub eta: Option<NaiveDate>,
    pub allocations: Vec<OrderLineBody>,
}

impl From<&OrderLine> for OrderLineBody {
    fn from(line: &OrderLine) -> Self {
        Self {
            orderid: line.orderid().to_string(),
            sku: line.sku().to_string(),
            qty: line.qty(),
        }
    }
}

impl From<&Batch> for BatchResponse {
    fn from(batch: &Batch) -> Self {
        Self {
            reference: batch.reference().to_string(),
            sku: batch.sku().to_string(),
            purchased_quantity: batch.purchased_quantity(),
            allocated_quantity: batch.allocated_quantity(),
            available_quantity: batch.available_quantity(),
            eta: batch.eta(),
            allocations: batch.allocations().map(OrderLineBody::from).collect(),
        }
    }
}

// -- Handlers --

/// POST /batches — register a new batch, generating a reference if none is given.
#[tracing::instrument(skip(state, req), fields(sku = %req.sku))]
pub async fn create<R: BatchRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<CreateBatchRequest>,
) -> Result<(StatusCode, Json<BatchResponse>), ApiError> {
    let cmd = match req.reference {
        Some(reference) => AddBatch::new(reference, req.sku, req.quantity, req.eta),
        None => AddBatch::generated(req.sku, req.quantity, req.eta),
    };

    let batch = state.service.add_batch(cmd).await?;

    Ok((StatusCode::CREATED, Json(BatchResponse::from(&batch))))
}

/// GET /batches — list every batch.
#[tracing::instrument(skip(state))]
pub async fn list<R: BatchRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<Vec<BatchResponse>>, ApiError> {
    let batches = state.service.list_batches().await?;
    Ok(Json(batches.iter().map(BatchResponse::from).collect()))
}

/// GET /batches/{reference} — load one batch.
#[tracing::instrument(skip(state))]
pub async fn get<R: BatchRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(reference): Path<String>,
) -> Result<Json<BatchResponse>, ApiError> {
    let batch = state
        .service
        .get_batch(&BatchReference::new(reference.as_str()))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Batch {reference} not found")))?;

    Ok(Json(BatchResponse::from(&batch)))
}

/// POST /batches/{reference}/deallocate — release an order line from a batch.
#[tracing::instrument(skip(state, req))]
pub async fn deallocate<R: BatchRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(reference): Path<String>,
    Json(req): Json<OrderLineBody>,
) -> Result<Json<BatchResponse>, ApiError> {
    let batch = state
        .service
        .deallocate(Deallocate::new(reference, req.orderid, req.sku, req.qty))
        .await?;

    Ok(Json(BatchResponse::from(&batch)))
}
