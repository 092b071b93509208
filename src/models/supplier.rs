// src/models/supplier.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{
    pagination::{empty_string_as_none, PageRequest, SortOrder},
    validation::validate_not_blank,
};

// Fornecedor
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: i32,
    #[schema(example = "Distribuidora Silva Ltda")]
    pub name: String,
    #[schema(example = "12.345.678/0001-99")]
    pub tax_id: Option<String>,
    #[schema(example = "(11) 99999-8888")]
    pub phone: Option<String>,
    #[schema(example = "contato@silva.com.br")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPayload {
    #[validate(length(min = 1, max = 150, message = "O nome é obrigatório."), custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(length(min = 11, max = 18, message = "CNPJ/CPF inválido."))]
    pub tax_id: Option<String>,

    #[validate(length(max = 20, message = "Telefone muito longo."))]
    pub phone: Option<String>,

    #[validate(email(message = "E-mail inválido."))]
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SupplierFilters {
    /// Trecho do nome, CNPJ ou e-mail
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
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

impl SupplierFilters {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_name_is_invalid() {
        let payload = SupplierPayload { name: "\t ".into(), tax_id: None, phone: None, email: None };
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.field_errors()["name"][0].code, "blank");
    }
}
