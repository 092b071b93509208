// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::common;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Categorias ---
        handlers::categories::find_all,
        handlers::categories::find_per_page,
        handlers::categories::find_by_id,
        handlers::categories::create,
        handlers::categories::update,
        handlers::categories::delete,

        // --- Produtos ---
        handlers::products::find_all,
        handlers::products::find_per_page,
        handlers::products::find_by_id,
        handlers::products::create,
        handlers::products::update,
        handlers::products::delete,

        // --- Fornecedores ---
        handlers::suppliers::find_all,
        handlers::suppliers::find_per_page,
        handlers::suppliers::find_by_id,
        handlers::suppliers::create,
        handlers::suppliers::update,
        handlers::suppliers::delete,

        // --- Estoque ---
        handlers::stock::find_all,
        handlers::stock::find_per_page,
        handlers::stock::find_by_id,
        handlers::stock::create,
        handlers::stock::update,
        handlers::stock::delete,

        // --- Notas de compra ---
        handlers::purchases::find_all,
        handlers::purchases::find_per_page,
        handlers::purchases::find_by_id,
        handlers::purchases::create,
        handlers::purchases::update,
        handlers::purchases::delete,

        // --- Notas de venda ---
        handlers::sales::find_all,
        handlers::sales::find_per_page,
        handlers::sales::find_by_id,
        handlers::sales::create,
        handlers::sales::update,
        handlers::sales::delete,

        // --- Relatórios ---
        handlers::reports::get_summary,
        handlers::reports::get_revenue_by_category,
        handlers::reports::get_abc_curve,
        handlers::reports::get_low_stock,
        handlers::reports::get_stock_turnover,
        handlers::reports::get_top_products,
        handlers::reports::get_purchases_by_supplier,
        handlers::reports::get_expiring_stock,
    ),
    components(
        schemas(
            common::pagination::SortOrder,

            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Cadastros ---
            models::category::Category,
            models::category::CategoryPayload,
            models::product::ProductType,
            models::product::Product,
            models::product::ProductPayload,
            models::supplier::Supplier,
            models::supplier::SupplierPayload,
            models::stock::StockItem,
            models::stock::StockItemPayload,

            // --- Notas ---
            models::invoice::PurchaseInvoice,
            models::invoice::PurchaseLineItem,
            models::invoice::SaleInvoice,
            models::invoice::SaleLineItem,
            models::invoice::LineItemPayload,
            models::invoice::PurchaseInvoicePayload,
            models::invoice::SaleInvoicePayload,

            // --- Relatórios ---
            models::report::Period,
            models::report::ReportSummary,
            models::report::CategoryRevenue,
            models::report::AbcClass,
            models::report::AbcEntry,
            models::report::LowStockAlert,
            models::report::StockTurnover,
            models::report::TopProduct,
            models::report::SupplierPurchases,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Categorias", description = "Categorias de produtos"),
        (name = "Produtos", description = "Cadastro de produtos (insumos e cardápio)"),
        (name = "Fornecedores", description = "Cadastro de fornecedores"),
        (name = "Estoque", description = "Itens de estoque com preço, quantidade e validade"),
        (name = "Notas de Compra", description = "Notas fiscais de entrada"),
        (name = "Notas de Venda", description = "Notas fiscais de saída"),
        (name = "Relatórios", description = "Indicadores gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_business_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for entity in ["categorias", "produtos", "fornecedores", "estoque", "notas-compra", "notas-venda"] {
            for op in ["findAll", "findPerPage", "findById/{id}", "create", "update/{id}", "delete/{id}"] {
                let path = format!("/api/{}/{}", entity, op);
                assert!(paths.contains_key(&path), "rota sem documentação: {}", path);
            }
        }
        assert!(paths.contains_key("/api/relatorios/curva-abc"));
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
