// src/handlers/categories.rs

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
    models::category::{Category, CategoryFilters, CategoryPayload},
};

// GET /api/categorias/findAll
#[utoipa::path(
    get,
    path = "/api/categorias/findAll",
    tag = "Categorias",
    responses(
        (status = 200, description = "Todas as categorias, por nome", body = Vec<Category>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_all(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let categories = app_state
        .category_repo
        .find_all()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(categories))))
}

// GET /api/categorias/findPerPage
#[utoipa::path(
    get,
    path = "/api/categorias/findPerPage",
    tag = "Categorias",
    params(CategoryFilters),
    responses(
        (status = 200, description = "Página filtrada com o total", body = Paginated<Category>)
    ),
    security(("api_jwt" = []))
)]
pub async fn find_per_page(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filters): Query<CategoryFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .category_repo
        .find_per_page(&filters)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(page))))
}

// GET /api/categorias/findById/{id}
#[utoipa::path(
    get,
    path = "/api/categorias/findById/{id}",
    tag = "Categorias",
    params(("id" = i32, Path, description = "ID da categoria")),
    responses(
        (status = 200, body = Category),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_by_id(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let category = app_state
        .category_repo
        .find_by_id(id)
        .await
        .and_then(|found| found.ok_or(AppError::NotFound("Categoria")))
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(category))))
}

// POST /api/categorias/create
#[utoipa::path(
    post,
    path = "/api/categorias/create",
    tag = "Categorias",
    request_body = CategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let category = app_state
        .category_repo
        .create(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!("📁 Categoria {} criada.", category.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::success(category))))
}

// PUT /api/categorias/update/{id}
#[utoipa::path(
    put,
    path = "/api/categorias/update/{id}",
    tag = "Categorias",
    params(("id" = i32, Path, description = "ID da categoria")),
    request_body = CategoryPayload,
    responses(
        (status = 200, body = Category),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let category = app_state
        .category_repo
        .update(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(category))))
}

// DELETE /api/categorias/delete/{id}
#[utoipa::path(
    delete,
    path = "/api/categorias/delete/{id}",
    tag = "Categorias",
    params(("id" = i32, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Categoria removida", body = Category),
        (status = 404, description = "Categoria não encontrada"),
        (status = 409, description = "Registro em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let category = app_state
        .category_repo
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!("🗑️ Categoria {} removida.", id);
    Ok((StatusCode::OK, Json(ApiResponse::success(category))))
}
