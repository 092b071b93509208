// src/handlers/suppliers.rs

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
    models::supplier::{Supplier, SupplierFilters, SupplierPayload},
};

// GET /api/fornecedores/findAll
#[utoipa::path(
    get,
    path = "/api/fornecedores/findAll",
    tag = "Fornecedores",
    responses(
        (status = 200, description = "Todos os fornecedores, por nome", body = Vec<Supplier>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_all(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let suppliers = app_state
        .supplier_repo
        .find_all()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(suppliers))))
}

// GET /api/fornecedores/findPerPage
#[utoipa::path(
    get,
    path = "/api/fornecedores/findPerPage",
    tag = "Fornecedores",
    params(SupplierFilters),
    responses(
        (status = 200, description = "Página filtrada com o total", body = Paginated<Supplier>)
    ),
    security(("api_jwt" = []))
)]
pub async fn find_per_page(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filters): Query<SupplierFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .supplier_repo
        .find_per_page(&filters)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(page))))
}

// GET /api/fornecedores/findById/{id}
#[utoipa::path(
    get,
    path = "/api/fornecedores/findById/{id}",
    tag = "Fornecedores",
    params(("id" = i32, Path, description = "ID do fornecedor")),
    responses(
        (status = 200, body = Supplier),
        (status = 404, description = "Fornecedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_by_id(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = app_state
        .supplier_repo
        .find_by_id(id)
        .await
        .and_then(|found| found.ok_or(AppError::NotFound("Fornecedor")))
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(supplier))))
}

// POST /api/fornecedores/create
#[utoipa::path(
    post,
    path = "/api/fornecedores/create",
    tag = "Fornecedores",
    request_body = SupplierPayload,
    responses(
        (status = 201, description = "Fornecedor criado", body = Supplier),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Registro duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SupplierPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let supplier = app_state
        .supplier_repo
        .create(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!("🏭 Fornecedor {} criado.", supplier.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::success(supplier))))
}

// PUT /api/fornecedores/update/{id}
#[utoipa::path(
    put,
    path = "/api/fornecedores/update/{id}",
    tag = "Fornecedores",
    params(("id" = i32, Path, description = "ID do fornecedor")),
    request_body = SupplierPayload,
    responses(
        (status = 200, body = Supplier),
        (status = 404, description = "Fornecedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
    Json(payload): Json<SupplierPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let supplier = app_state
        .supplier_repo
        .update(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(supplier))))
}

// DELETE /api/fornecedores/delete/{id}
#[utoipa::path(
    delete,
    path = "/api/fornecedores/delete/{id}",
    tag = "Fornecedores",
    params(("id" = i32, Path, description = "ID do fornecedor")),
    responses(
        (status = 200, description = "Fornecedor removido", body = Supplier),
        (status = 404, description = "Fornecedor não encontrado"),
        (status = 409, description = "Registro em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = app_state
        .supplier_repo
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!("🗑️ Fornecedor {} removido.", id);
    Ok((StatusCode::OK, Json(ApiResponse::success(supplier))))
}
