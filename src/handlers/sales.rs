// src/handlers/sales.rs
// Notas fiscais de venda. Criação e edição passam pelo InvoiceService,
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
    models::invoice::{SaleInvoice, SaleInvoiceFilters, SaleInvoicePayload},
};

// GET /api/notas-venda/findAll
#[utoipa::path(
    get,
    path = "/api/notas-venda/findAll",
    tag = "Notas de Venda",
    responses(
        (status = 200, description = "Todas as notas com seus itens, mais recentes primeiro", body = Vec<SaleInvoice>)
    ),
    security(("api_jwt" = []))
)]
pub async fn find_all(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let invoices = app_state
        .sale_repo
        .find_all()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(invoices))))
}

// GET /api/notas-venda/findPerPage
#[utoipa::path(
    get,
    path = "/api/notas-venda/findPerPage",
    tag = "Notas de Venda",
    params(SaleInvoiceFilters),
    responses(
        (status = 200, description = "Página filtrada com o total", body = Paginated<SaleInvoice>)
    ),
    security(("api_jwt" = []))
)]
pub async fn find_per_page(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filters): Query<SaleInvoiceFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .sale_repo
        .find_per_page(&filters)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(page))))
}

// GET /api/notas-venda/findById/{id}
#[utoipa::path(
    get,
    path = "/api/notas-venda/findById/{id}",
    tag = "Notas de Venda",
    params(("id" = i32, Path, description = "ID da nota")),
    responses(
        (status = 200, body = SaleInvoice),
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
        .sale_repo
        .find_by_id(id)
        .await
        .and_then(|found| found.ok_or(AppError::NotFound("Nota fiscal de venda")))
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(invoice))))
}

// POST /api/notas-venda/create
#[utoipa::path(
    post,
    path = "/api/notas-venda/create",
    tag = "Notas de Venda",
    request_body = SaleInvoicePayload,
    responses(
        (status = 201, description = "Nota registrada com total calculado", body = SaleInvoice),
        (status = 400, description = "Dados inválidos ou produto inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SaleInvoicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let invoice = app_state
        .invoice_service
        .create_sale(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(invoice))))
}

// PUT /api/notas-venda/update/{id}
#[utoipa::path(
    put,
    path = "/api/notas-venda/update/{id}",
    tag = "Notas de Venda",
    params(("id" = i32, Path, description = "ID da nota")),
    request_body = SaleInvoicePayload,
    responses(
        (status = 200, description = "Nota e itens substituídos", body = SaleInvoice),
        (status = 404, description = "Nota não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
    Json(payload): Json<SaleInvoicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let invoice = app_state
        .invoice_service
        .update_sale(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(invoice))))
}

// DELETE /api/notas-venda/delete/{id}
#[utoipa::path(
    delete,
    path = "/api/notas-venda/delete/{id}",
    tag = "Notas de Venda",
    params(("id" = i32, Path, description = "ID da nota")),
    responses(
        (status = 200, description = "Nota removida junto com os itens", body = SaleInvoice),
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
        .sale_repo
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!("🗑️ Nota de venda {} removida.", id);
    Ok((StatusCode::OK, Json(ApiResponse::success(invoice))))
}
