// src/handlers/stock.rs

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
    models::stock::{StockItem, StockFilters, StockItemPayload},
};

// GET /api/estoque/findAll
#[utoipa::path(
    get,
    path = "/api/estoque/findAll",
    tag = "Estoque",
    responses(
        (status = 200, description = "Todo o estoque, por produto", body = Vec<StockItem>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_all(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .stock_repo
        .find_all()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(items))))
}

// GET /api/estoque/findPerPage
#[utoipa::path(
    get,
    path = "/api/estoque/findPerPage",
    tag = "Estoque",
    params(StockFilters),
    responses(
        (status = 200, description = "Página filtrada com o total", body = Paginated<StockItem>)
    ),
    security(("api_jwt" = []))
)]
pub async fn find_per_page(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filters): Query<StockFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .stock_repo
        .find_per_page(&filters)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(page))))
}

// GET /api/estoque/findById/{id}
#[utoipa::path(
    get,
    path = "/api/estoque/findById/{id}",
    tag = "Estoque",
    params(("id" = i32, Path, description = "ID do item de estoque")),
    responses(
        (status = 200, body = StockItem),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_by_id(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .stock_repo
        .find_by_id(id)
        .await
        .and_then(|found| found.ok_or(AppError::NotFound("Item de estoque")))
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(item))))
}

// POST /api/estoque/create
#[utoipa::path(
    post,
    path = "/api/estoque/create",
    tag = "Estoque",
    request_body = StockItemPayload,
    responses(
        (status = 201, description = "Item de estoque criado", body = StockItem),
        (status = 400, description = "Dados inválidos"),
        (status = 400, description = "Referência inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<StockItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let item = app_state
        .stock_repo
        .create(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!("📥 Item de estoque {} criado.", item.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::success(item))))
}

// PUT /api/estoque/update/{id}
#[utoipa::path(
    put,
    path = "/api/estoque/update/{id}",
    tag = "Estoque",
    params(("id" = i32, Path, description = "ID do item de estoque")),
    request_body = StockItemPayload,
    responses(
        (status = 200, body = StockItem),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
    Json(payload): Json<StockItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let item = app_state
        .stock_repo
        .update(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(item))))
}

// DELETE /api/estoque/delete/{id}
#[utoipa::path(
    delete,
    path = "/api/estoque/delete/{id}",
    tag = "Estoque",
    params(("id" = i32, Path, description = "ID do item de estoque")),
    responses(
        (status = 200, description = "Item de estoque removido", body = StockItem),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .stock_repo
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!("🗑️ Item de estoque {} removido.", id);
    Ok((StatusCode::OK, Json(ApiResponse::success(item))))
}
