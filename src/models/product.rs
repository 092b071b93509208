// src/models/product.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{
    pagination::{empty_string_as_none, PageRequest, SortOrder},
    validation::validate_not_blank,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "product_type", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum ProductType {
    Insumo,   // Matéria-prima, vira "INSUMO"
    Cardapio, // Item vendido, vira "CARDAPIO"
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INSUMO" => Ok(ProductType::Insumo),
            "CARDAPIO" => Ok(ProductType::Cardapio),
            other => Err(format!("tipo de produto inválido: '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    #[schema(example = "Farinha de Trigo")]
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub active: bool,
    pub product_type: ProductType,
    pub category_id: Option<i32>,

    // Vem do JOIN com categories nas leituras; ausente no RETURNING.
    #[sqlx(default)]
    pub category_name: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 150, message = "O nome é obrigatório."), custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Descrição muito longa."))]
    pub description: Option<String>,

    #[validate(url(message = "URL da imagem inválida."))]
    pub image_url: Option<String>,

    #[serde(default = "default_active")]
    pub active: bool,

    pub product_type: ProductType,

    pub category_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductFilters {
    /// Trecho do nome
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<ProductType>)]
    pub tipo: Option<ProductType>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub ativo: Option<bool>,
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

impl ProductFilters {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}
