// src/models/stock.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{
    pagination::{empty_string_as_none, PageRequest, SortOrder},
    validation::{validate_not_blank, validate_not_negative},
};

// Item de estoque: um lote (ou o saldo aproximado) de um produto.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub id: i32,
    pub product_id: i32,

    #[sqlx(default)]
    pub product_name: Option<String>,

    pub unit_price: Decimal,
    pub quantity: Decimal,
    #[schema(example = "KG")]
    pub unit: String,
    pub expiry_date: Option<NaiveDate>,
    pub stockable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_stockable() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockItemPayload {
    pub product_id: i32,

    #[validate(custom(function = "validate_not_negative"))]
    pub unit_price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    pub quantity: Decimal,

    #[validate(length(min = 1, max = 10, message = "A unidade é obrigatória."), custom(function = "validate_not_blank"))]
    pub unit: String,

    #[schema(value_type = Option<String>, format = Date, example = "2026-12-31")]
    pub expiry_date: Option<NaiveDate>,

    #[serde(default = "default_stockable")]
    pub stockable: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StockFilters {
    /// Trecho do nome do produto
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub product_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<f64>)]
    pub quantidade_min: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<f64>)]
    pub quantidade_max: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<f64>)]
    pub preco_min: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<f64>)]
    pub preco_max: Option<Decimal>,
    /// Validade a partir de (YYYY-MM-DD)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<String>, format = Date)]
    pub date_start: Option<NaiveDate>,
    /// Validade até (YYYY-MM-DD)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<String>, format = Date)]
    pub date_end: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub estocavel: Option<bool>,
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

impl StockFilters {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}
