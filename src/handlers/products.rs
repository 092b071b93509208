// src/handlers/products.rs

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
    models::product::{Product, ProductFilters, ProductPayload},
};

// GET /api/produtos/findAll
#[utoipa::path(
    get,
    path = "/api/produtos/findAll",
    tag = "Produtos",
    responses(
        (status = 200, description = "Todos os produtos, por nome", body = Vec<Product>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_all(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .product_repo
        .find_all()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(products))))
}

// GET /api/produtos/findPerPage
#[utoipa::path(
    get,
    path = "/api/produtos/findPerPage",
    tag = "Produtos",
    params(ProductFilters),
    responses(
        (status = 200, description = "Página filtrada com o total", body = Paginated<Product>)
    ),
    security(("api_jwt" = []))
)]
pub async fn find_per_page(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filters): Query<ProductFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .product_repo
        .find_per_page(&filters)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(page))))
}

// GET /api/produtos/findById/{id}
#[utoipa::path(
    get,
    path = "/api/produtos/findById/{id}",
    tag = "Produtos",
    params(("id" = i32, Path, description = "ID do produto")),
    responses(
        (status = 200, body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_by_id(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let product = app_state
        .product_repo
        .find_by_id(id)
        .await
        .and_then(|found| found.ok_or(AppError::NotFound("Produto")))
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(product))))
}

// POST /api/produtos/create
#[utoipa::path(
    post,
    path = "/api/produtos/create",
    tag = "Produtos",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 400, description = "Dados inválidos"),
        (status = 400, description = "Referência inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let product = app_state
        .product_repo
        .create(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!("📦 Produto {} criado.", product.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

// PUT /api/produtos/update/{id}
#[utoipa::path(
    put,
    path = "/api/produtos/update/{id}",
    tag = "Produtos",
    params(("id" = i32, Path, description = "ID do produto")),
    request_body = ProductPayload,
    responses(
        (status = 200, body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let product = app_state
        .product_repo
        .update(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(product))))
}

// DELETE /api/produtos/delete/{id}
#[utoipa::path(
    delete,
    path = "/api/produtos/delete/{id}",
    tag = "Produtos",
    params(("id" = i32, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto removido", body = Product),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "Registro em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let product = app_state
        .product_repo
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!("🗑️ Produto {} removido.", id);
    Ok((StatusCode::OK, Json(ApiResponse::success(product))))
}
