// src/common/pagination.rs

use std::{fmt::Display, str::FromStr};

use serde::{de, Deserialize, Deserializer};
use sqlx::{Postgres, QueryBuilder};
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Os filtros chegam da URL; o frontend manda `?precoMin=` quando o campo está vazio.
/// Trata string vazia como ausente e converte o resto via `FromStr`.
pub fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => T::from_str(s).map(Some).map_err(de::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("sortOrder inválido: '{}'", other)),
        }
    }
}

/// Página normalizada: `page` começa em 1 e `limit` fica entre 1 e MAX_PAGE_SIZE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn push_limit_offset(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" LIMIT ").push_bind(self.limit);
        qb.push(" OFFSET ").push_bind(self.offset());
    }
}

/// Colunas ordenáveis de uma entidade: nome do campo na API -> expressão SQL.
pub struct SortColumns {
    pub allowed: &'static [(&'static str, &'static str)],
    pub default: &'static str,
    pub primary_key: &'static str,
}

impl SortColumns {
    /// Monta o ORDER BY. Campos fora da lista caem na ordenação padrão,
    /// e a chave primária sempre desempata na mesma direção.
    pub fn order_by(&self, field: Option<&str>, order: SortOrder) -> String {
        let column = self.column(field).unwrap_or(self.default);

        let dir = order.as_sql();
        if column == self.primary_key {
            format!(" ORDER BY {} {}", column, dir)
        } else {
            format!(" ORDER BY {} {}, {} {}", column, dir, self.primary_key, dir)
        }
    }

    /// Direção efetiva: a pedida; sem ela, ASC para um `sortField` válido
    /// e `default_order` para a ordenação padrão da entidade.
    pub fn direction(&self, field: Option<&str>, order: Option<SortOrder>, default_order: SortOrder) -> SortOrder {
        order.unwrap_or(match self.column(field) {
            Some(_) => SortOrder::Asc,
            None => default_order,
        })
    }

    fn column(&self, field: Option<&str>) -> Option<&'static str> {
        field
            .and_then(|f| self.allowed.iter().find(|(name, _)| *name == f))
            .map(|(_, column)| *column)
    }
}

/// Padrão `%termo%` para ILIKE, com `\`, `%` e `_` escapados.
/// Usar sempre junto de `ESCAPE '\'`.
pub fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    const COLUMNS: SortColumns = SortColumns {
        allowed: &[("name", "p.name"), ("id", "p.id")],
        default: "p.name",
        primary_key: "p.id",
    };

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Query {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        page: Option<i64>,
        #[serde(default, deserialize_with = "empty_string_as_none")]
        sort_order: Option<SortOrder>,
    }

    #[test]
    fn page_request_clamps_values() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(0), Some(500)), PageRequest { page: 1, limit: 100 });
        assert_eq!(PageRequest::new(Some(-3), Some(0)), PageRequest { page: 1, limit: 1 });
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn order_by_uses_whitelist_and_tiebreak() {
        assert_eq!(
            COLUMNS.order_by(Some("name"), SortOrder::Desc),
            " ORDER BY p.name DESC, p.id DESC"
        );
        assert_eq!(COLUMNS.order_by(Some("id"), SortOrder::Asc), " ORDER BY p.id ASC");
    }

    #[test]
    fn unknown_sort_field_falls_back_to_default() {
        assert_eq!(
            COLUMNS.order_by(Some("name; DROP TABLE products"), SortOrder::Asc),
            " ORDER BY p.name ASC, p.id ASC"
        );
    }

    #[test]
    fn explicit_sort_field_defaults_to_ascending() {
        assert_eq!(COLUMNS.direction(Some("name"), None, SortOrder::Desc), SortOrder::Asc);
        assert_eq!(COLUMNS.direction(None, None, SortOrder::Desc), SortOrder::Desc);
        assert_eq!(COLUMNS.direction(Some("nope"), None, SortOrder::Desc), SortOrder::Desc);
        assert_eq!(COLUMNS.direction(Some("name"), Some(SortOrder::Desc), SortOrder::Asc), SortOrder::Desc);
    }

    #[test]
    fn like_wildcards_in_search_are_literal() {
        assert_eq!(like_pattern("farinha"), "%farinha%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\x"), "%c:\\\\x%");
    }

    #[test]
    fn empty_query_values_are_none() {
        let q: Query = serde_json::from_str(r#"{"page": "", "sortOrder": "DESC"}"#).unwrap();
        assert_eq!(q.page, None);
        assert_eq!(q.sort_order, Some(SortOrder::Desc));

        let q: Query = serde_json::from_str(r#"{"page": "2"}"#).unwrap();
        assert_eq!(q.page, Some(2));
    }

    #[test]
    fn invalid_number_is_rejected() {
        assert!(serde_json::from_str::<Query>(r#"{"page": "abc"}"#).is_err());
    }
}
