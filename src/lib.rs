// src/lib.rs

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, middleware::auth::auth_guard};

pub fn create_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new().route("/me", get(handlers::auth::get_me));

    let category_routes = Router::new()
        .route("/findAll", get(handlers::categories::find_all))
        .route("/findPerPage", get(handlers::categories::find_per_page))
        .route("/findById/{id}", get(handlers::categories::find_by_id))
        .route("/create", post(handlers::categories::create))
        .route("/update/{id}", put(handlers::categories::update))
        .route("/delete/{id}", delete(handlers::categories::delete));

    let product_routes = Router::new()
        .route("/findAll", get(handlers::products::find_all))
        .route("/findPerPage", get(handlers::products::find_per_page))
        .route("/findById/{id}", get(handlers::products::find_by_id))
        .route("/create", post(handlers::products::create))
        .route("/update/{id}", put(handlers::products::update))
        .route("/delete/{id}", delete(handlers::products::delete));

    let supplier_routes = Router::new()
        .route("/findAll", get(handlers::suppliers::find_all))
        .route("/findPerPage", get(handlers::suppliers::find_per_page))
        .route("/findById/{id}", get(handlers::suppliers::find_by_id))
        .route("/create", post(handlers::suppliers::create))
        .route("/update/{id}", put(handlers::suppliers::update))
        .route("/delete/{id}", delete(handlers::suppliers::delete));

    let stock_routes = Router::new()
        .route("/findAll", get(handlers::stock::find_all))
        .route("/findPerPage", get(handlers::stock::find_per_page))
        .route("/findById/{id}", get(handlers::stock::find_by_id))
        .route("/create", post(handlers::stock::create))
        .route("/update/{id}", put(handlers::stock::update))
        .route("/delete/{id}", delete(handlers::stock::delete));

    let purchase_routes = Router::new()
        .route("/findAll", get(handlers::purchases::find_all))
        .route("/findPerPage", get(handlers::purchases::find_per_page))
        .route("/findById/{id}", get(handlers::purchases::find_by_id))
        .route("/create", post(handlers::purchases::create))
        .route("/update/{id}", put(handlers::purchases::update))
        .route("/delete/{id}", delete(handlers::purchases::delete));

    let sale_routes = Router::new()
        .route("/findAll", get(handlers::sales::find_all))
        .route("/findPerPage", get(handlers::sales::find_per_page))
        .route("/findById/{id}", get(handlers::sales::find_by_id))
        .route("/create", post(handlers::sales::create))
        .route("/update/{id}", put(handlers::sales::update))
        .route("/delete/{id}", delete(handlers::sales::delete));

    let report_routes = Router::new()
        .route("/resumo", get(handlers::reports::get_summary))
        .route("/vendas-por-categoria", get(handlers::reports::get_revenue_by_category))
        .route("/curva-abc", get(handlers::reports::get_abc_curve))
        .route("/estoque-baixo", get(handlers::reports::get_low_stock))
        .route("/giro-estoque", get(handlers::reports::get_stock_turnover))
        .route("/mais-vendidos", get(handlers::reports::get_top_products))
        .route("/compras-por-fornecedor", get(handlers::reports::get_purchases_by_supplier))
        .route("/vencimentos", get(handlers::reports::get_expiring_stock));

    // Tudo que exige token passa pelo auth_guard
    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/categorias", category_routes)
        .nest("/produtos", product_routes)
        .nest("/fornecedores", supplier_routes)
        .nest("/estoque", stock_routes)
        .nest("/notas-compra", purchase_routes)
        .nest("/notas-venda", sale_routes)
        .nest("/relatorios", report_routes)
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { Json(json!({ "success": true, "data": "OK" })) }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    // Pool preguiçosa: as rotas testadas aqui respondem antes de tocar o banco
    fn app() -> Router {
        let config = Config {
            database_url: "postgres://localhost/gestao_test".into(),
            jwt_secret: "segredo-de-teste".into(),
            server_addr: "127.0.0.1:0".into(),
            max_connections: 1,
            token_ttl_days: 1,
        };
        let pool = PgPoolOptions::new().connect_lazy(&config.database_url).unwrap();
        create_router(AppState::from_pool(pool, &config))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = app()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"], "OK");
    }

    #[tokio::test]
    async fn business_routes_require_token() {
        let response = app()
            .oneshot(Request::builder().uri("/api/produtos/findAll").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Token de autenticação inválido ou ausente.");
    }

    #[tokio::test]
    async fn malformed_token_is_rejected_in_english() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/relatorios/resumo")
                    .header(header::AUTHORIZATION, "Bearer nao-e-um-jwt")
                    .header(header::ACCEPT_LANGUAGE, "en-US")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "Missing or invalid authentication token.");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let response = app()
            .oneshot(Request::builder().uri("/api-docs/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        assert!(doc["paths"]["/api/notas-venda/create"].is_object());
    }
}
