// src/models/invoice.rs
// Notas fiscais de compra e de venda, com seus itens.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{
    pagination::{empty_string_as_none, PageRequest, SortOrder},
    validation::{validate_not_blank, validate_not_negative, validate_positive},
};

// --- Nota Fiscal de Compra ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInvoice {
    pub id: i32,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub total: Decimal,
    pub supplier_id: i32,

    #[sqlx(default)]
    pub supplier_name: Option<String>,

    #[sqlx(skip)]
    pub items: Vec<PurchaseLineItem>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLineItem {
    pub id: i32,
    pub invoice_id: i32,
    pub product_id: i32,
    #[sqlx(default)]
    pub product_name: Option<String>,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
}

// --- Nota Fiscal de Venda ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleInvoice {
    pub id: i32,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub total: Decimal,

    #[sqlx(skip)]
    pub items: Vec<SaleLineItem>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineItem {
    pub id: i32,
    pub invoice_id: i32,
    pub product_id: i32,
    #[sqlx(default)]
    pub product_name: Option<String>,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
}

// --- Payloads ---

/// Item enviado pelo formulário; serve para compra e venda.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItemPayload {
    pub product_id: i32,

    #[validate(custom(function = "validate_positive"))]
    pub quantity: Decimal,

    #[validate(length(min = 1, max = 10, message = "A unidade é obrigatória."), custom(function = "validate_not_blank"))]
    #[schema(example = "UN")]
    pub unit: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInvoicePayload {
    #[schema(value_type = String, format = Date, example = "2026-10-01")]
    pub date: NaiveDate,

    pub supplier_id: i32,

    #[validate(length(min = 1, message = "A nota precisa de ao menos um item."), nested)]
    pub items: Vec<LineItemPayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleInvoicePayload {
    #[schema(value_type = String, format = Date, example = "2026-10-01")]
    pub date: NaiveDate,

    #[validate(length(min = 1, message = "A nota precisa de ao menos um item."), nested)]
    pub items: Vec<LineItemPayload>,
}

// --- Filtros ---

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PurchaseInvoiceFilters {
    /// Trecho do nome do fornecedor
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub fornecedor_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<String>, format = Date)]
    pub date_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<String>, format = Date)]
    pub date_end: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<f64>)]
    pub total_min: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<f64>)]
    pub total_max: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sort_field: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<SortOrder>)]
    pub sort_order: Option<SortOrder>,
}

impl PurchaseInvoiceFilters {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SaleInvoiceFilters {
    /// Apenas notas que contenham este produto
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub product_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<String>, format = Date)]
    pub date_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<String>, format = Date)]
    pub date_end: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<f64>)]
    pub total_min: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<f64>)]
    pub total_max: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sort_field: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<SortOrder>)]
    pub sort_order: Option<SortOrder>,
}

impl SaleInvoiceFilters {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}
