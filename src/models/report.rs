// src/models/report.rs

use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::common::pagination::empty_string_as_none;

// =============================================================================
//  PARÂMETROS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Period {
    Semana,
    #[default]
    Mes,
    Trimestre,
    Ano,
    Tudo,
}

impl Period {
    pub fn days(self) -> Option<i64> {
        match self {
            Period::Semana => Some(7),
            Period::Mes => Some(30),
            Period::Trimestre => Some(90),
            Period::Ano => Some(365),
            Period::Tudo => None,
        }
    }

    /// Primeiro dia da janela, inclusive. `None` para o período inteiro.
    pub fn start_date(self, today: NaiveDate) -> Option<NaiveDate> {
        self.days().map(|d| today - Duration::days(d - 1))
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SEMANA" => Ok(Period::Semana),
            "MES" => Ok(Period::Mes),
            "TRIMESTRE" => Ok(Period::Trimestre),
            "ANO" => Ok(Period::Ano),
            "TUDO" => Ok(Period::Tudo),
            other => Err(format!("período inválido: '{}'", other)),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// SEMANA, MES (padrão), TRIMESTRE, ANO ou TUDO
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<Period>)]
    pub periodo: Option<Period>,
    /// Limite de estoque baixo (padrão 10)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<f64>)]
    pub limite: Option<Decimal>,
    /// Quantidade de linhas no ranking (padrão 10)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub limit: Option<i64>,
    /// Janela de vencimento em dias (padrão 30)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub dias: Option<i64>,
}

impl ReportQuery {
    pub fn period(&self) -> Period {
        self.periodo.unwrap_or_default()
    }
}

// =============================================================================
//  LINHAS BRUTAS (vindas do banco)
// =============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct SaleLineRow {
    pub invoice_id: i32,
    pub date: NaiveDate,
    pub product_id: i32,
    pub product_name: String,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, FromRow)]
pub struct PurchaseLineRow {
    pub invoice_id: i32,
    pub date: NaiveDate,
    pub supplier_id: i32,
    pub supplier_name: String,
    pub product_id: i32,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, FromRow)]
pub struct StockRow {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub stockable: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub active: bool,
}

// =============================================================================
//  SAÍDAS
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub period: Period,
    pub revenue: Decimal,
    pub sales_count: i64,
    pub average_ticket: Decimal,
    pub purchase_total: Decimal,
    pub cost_of_goods_sold: Decimal,
    pub gross_profit: Decimal,
    /// (faturamento - custo) / faturamento * 100; ausente sem vendas
    pub margin_percent: Option<Decimal>,
    pub stock_value: Decimal,
    pub low_stock_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRevenue {
    pub category_id: Option<i32>,
    pub category_name: String,
    pub revenue: Decimal,
    pub quantity: Decimal,
    pub share_percent: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum AbcClass {
    A,
    B,
    C,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AbcEntry {
    pub product_id: i32,
    pub product_name: String,
    pub value: Decimal,
    pub share_percent: Decimal,
    pub cumulative_percent: Decimal,
    pub class: AbcClass,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LowStockAlert {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: Decimal,
    pub threshold: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockTurnover {
    pub product_id: i32,
    pub product_name: String,
    pub quantity_sold: Decimal,
    pub current_stock: Decimal,
    pub average_daily_sales: Decimal,
    /// vendido / estoque atual; ausente com estoque zerado
    pub turnover: Option<Decimal>,
    /// estoque atual / venda média diária; ausente sem vendas
    pub coverage_days: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: Decimal,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPurchases {
    pub supplier_id: i32,
    pub supplier_name: String,
    pub invoice_count: i64,
    pub total: Decimal,
}
