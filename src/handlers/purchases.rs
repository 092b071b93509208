// src/handlers/purchases.rs
// Notas fiscais de compra. Criação e edição passam pelo InvoiceService,
// que recalcula o total a partir dos itens.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        response::{ApiResponse, Paginated},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::invoice::{PurchaseInvoice, PurchaseInvoiceFilters, PurchaseInvoicePayload},
};

// GET /api/notas-compra/findAll
#[utoipa::path(
    get,
    path = "/api/notas-compra/findAll",
    tag = "Notas de Compra",
    responses(
        (status = 200, description = "Todas as notas com seus itens, mais recentes primeiro", body = Vec<PurchaseInvoice>)
    ),
    security(("api_jwt" = []))
)]
pub async fn find_all(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let invoices = app_state
        .purchase_repo
        .find_all()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(invoices))))
}

// GET /api/notas-compra/findPerPage
#[utoipa::path(
    get,
    path = "/api/notas-compra/findPerPage",
    tag = "Notas de Compra",
    params(PurchaseInvoiceFilters),
    responses(
        (status = 200, description = "Página filtrada com o total", body = Paginated<PurchaseInvoice>)
    ),
    security(("api_jwt" = []))
)]
pub async fn find_per_page(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filters): Query<PurchaseInvoiceFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .purchase_repo
        .find_per_page(&filters)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(page))))
}

// GET /api/notas-compra/findById/{id}
#[utoipa::path(
    get,
    path = "/api/notas-compra/findById/{id}",
    tag = "Notas de Compra",
    params(("id" = i32, Path, description = "ID da nota")),
    responses(
        (status = 200, body = PurchaseInvoice),
        (status = 404, description = "Nota não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_by_id(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let invoice = app_state
        .purchase_repo
        .find_by_id(id)
        .await
        .and_then(|found| found.ok_or(AppError::NotFound("Nota fiscal de compra")))
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(invoice))))
}

// POST /api/notas-compra/create
#[utoipa::path(
    post,
    path = "/api/notas-compra/create",
    tag = "Notas de Compra",
    request_body = PurchaseInvoicePayload,
    responses(
        (status = 201, description = "Nota registrada com total calculado", body = PurchaseInvoice),
        (status = 400, description = "Dados inválidos ou fornecedor/produto inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<PurchaseInvoicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let invoice = app_state
        .invoice_service
        .create_purchase(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(invoice))))
}

// PUT /api/notas-compra/update/{id}
#[utoipa::path(
    put,
    path = "/api/notas-compra/update/{id}",
    tag = "Notas de Compra",
    params(("id" = i32, Path, description = "ID da nota")),
    request_body = PurchaseInvoicePayload,
    responses(
        (status = 200, description = "Nota e itens substituídos", body = PurchaseInvoice),
        (status = 404, description = "Nota não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
    Json(payload): Json<PurchaseInvoicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let invoice = app_state
        .invoice_service
        .update_purchase(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(invoice))))
}

// DELETE /api/notas-compra/delete/{id}
#[utoipa::path(
    delete,
    path = "/api/notas-compra/delete/{id}",
    tag = "Notas de Compra",
    params(("id" = i32, Path, description = "ID da nota")),
    responses(
        (status = 200, description = "Nota removida junto com os itens", body = PurchaseInvoice),
        (status = 404, description = "Nota não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let invoice = app_state
        .purchase_repo
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!("🗑️ Nota de compra {} removida.", id);
    Ok((StatusCode::OK, Json(ApiResponse::success(invoice))))
}
