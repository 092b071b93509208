// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{error::ApiError, response::ApiResponse},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        report::{
            AbcEntry, CategoryRevenue, LowStockAlert, ReportQuery, ReportSummary, StockTurnover, SupplierPurchases,
            TopProduct,
        },
        stock::StockItem,
    },
};

// GET /api/relatorios/resumo
#[utoipa::path(
    get,
    path = "/api/relatorios/resumo",
    tag = "Relatórios",
    params(ReportQuery),
    responses(
        (status = 200, description = "Faturamento, custo, margem e valor de estoque do período", body = ReportSummary),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .report_service
        .summary(&query)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(summary))))
}

// GET /api/relatorios/vendas-por-categoria
#[utoipa::path(
    get,
    path = "/api/relatorios/vendas-por-categoria",
    tag = "Relatórios",
    params(ReportQuery),
    responses(
        (status = 200, description = "Faturamento por categoria", body = Vec<CategoryRevenue>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_revenue_by_category(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = app_state
        .report_service
        .revenue_by_category(&query)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(rows))))
}

// GET /api/relatorios/curva-abc
#[utoipa::path(
    get,
    path = "/api/relatorios/curva-abc",
    tag = "Relatórios",
    responses(
        (status = 200, description = "Classificação ABC pelo valor em estoque", body = Vec<AbcEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_abc_curve(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let curve = app_state
        .report_service
        .abc_curve()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(curve))))
}

// GET /api/relatorios/estoque-baixo
#[utoipa::path(
    get,
    path = "/api/relatorios/estoque-baixo",
    tag = "Relatórios",
    params(ReportQuery),
    responses(
        (status = 200, description = "Produtos ativos abaixo do limite", body = Vec<LowStockAlert>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_low_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let alerts = app_state
        .report_service
        .low_stock(&query)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(alerts))))
}

// GET /api/relatorios/giro-estoque
#[utoipa::path(
    get,
    path = "/api/relatorios/giro-estoque",
    tag = "Relatórios",
    params(ReportQuery),
    responses(
        (status = 200, description = "Giro e dias de cobertura por produto", body = Vec<StockTurnover>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stock_turnover(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = app_state
        .report_service
        .stock_turnover(&query)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(rows))))
}

// GET /api/relatorios/mais-vendidos
#[utoipa::path(
    get,
    path = "/api/relatorios/mais-vendidos",
    tag = "Relatórios",
    params(ReportQuery),
    responses(
        (status = 200, description = "Ranking de produtos por faturamento", body = Vec<TopProduct>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_top_products(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let ranking = app_state
        .report_service
        .top_products(&query)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(ranking))))
}

// GET /api/relatorios/compras-por-fornecedor
#[utoipa::path(
    get,
    path = "/api/relatorios/compras-por-fornecedor",
    tag = "Relatórios",
    params(ReportQuery),
    responses(
        (status = 200, description = "Total comprado de cada fornecedor", body = Vec<SupplierPurchases>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_purchases_by_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = app_state
        .report_service
        .purchases_by_supplier(&query)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(rows))))
}

// GET /api/relatorios/vencimentos
#[utoipa::path(
    get,
    path = "/api/relatorios/vencimentos",
    tag = "Relatórios",
    params(ReportQuery),
    responses(
        (status = 200, description = "Itens vencidos ou que vencem nos próximos `dias`", body = Vec<StockItem>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_expiring_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .report_service
        .expiring_stock(&query)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(items))))
}
