// src/models/category.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{
    pagination::{empty_string_as_none, PageRequest, SortOrder},
    validation::validate_not_blank,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    #[schema(example = "Bebidas")]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[validate(length(min = 1, max = 100, message = "O nome é obrigatório."), custom(function = "validate_not_blank"))]
    #[schema(example = "Bebidas")]
    pub name: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CategoryFilters {
    /// Trecho do nome
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

impl CategoryFilters {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_name_is_invalid() {
        let errors = CategoryPayload { name: "   ".into() }.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        assert!(CategoryPayload { name: " Bebidas ".into() }.validate().is_ok());
    }
}
