// src/db/report_repo.rs
// Consultas brutas para os relatórios. A agregação fica no ReportService.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::report::{ProductRow, PurchaseLineRow, SaleLineRow, StockRow},
};

// Notas com data futura ficam fora da janela
const SALE_LINES_SQL: &str = r#"
    SELECT
        n.id AS invoice_id,
        n.date,
        p.id AS product_id,
        p.name AS product_name,
        c.id AS category_id,
        c.name AS category_name,
        i.quantity,
        i.unit_price
    FROM sale_items i
    JOIN sale_invoices n ON n.id = i.invoice_id
    JOIN products p ON p.id = i.product_id
    LEFT JOIN categories c ON c.id = p.category_id
    WHERE ($1::date IS NULL OR n.date >= $1) AND n.date <= $2
    ORDER BY n.date ASC, i.id ASC
"#;

const PURCHASE_LINES_SQL: &str = r#"
    SELECT
        n.id AS invoice_id,
        n.date,
        f.id AS supplier_id,
        f.name AS supplier_name,
        i.product_id,
        i.quantity,
        i.unit_price
    FROM purchase_items i
    JOIN purchase_invoices n ON n.id = i.invoice_id
    JOIN suppliers f ON f.id = n.supplier_id
    WHERE ($1::date IS NULL OR n.date >= $1) AND n.date <= $2
    ORDER BY n.date ASC, i.id ASC
"#;

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Itens vendidos em `[since, until]`; sem `since`, desde o início.
    pub async fn sale_lines(
        &self,
        since: Option<NaiveDate>,
        until: NaiveDate,
    ) -> Result<Vec<SaleLineRow>, AppError> {
        let rows = sqlx::query_as::<_, SaleLineRow>(SALE_LINES_SQL)
            .bind(since)
            .bind(until)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn purchase_lines(
        &self,
        since: Option<NaiveDate>,
        until: NaiveDate,
    ) -> Result<Vec<PurchaseLineRow>, AppError> {
        let rows = sqlx::query_as::<_, PurchaseLineRow>(PURCHASE_LINES_SQL)
            .bind(since)
            .bind(until)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn stock(&self) -> Result<Vec<StockRow>, AppError> {
        let rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT s.product_id, p.name AS product_name, s.quantity, s.unit_price, s.stockable
            FROM stock_items s
            JOIN products p ON p.id = s.product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn products(&self) -> Result<Vec<ProductRow>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>("SELECT id, name, active FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_queries_are_bounded_on_both_ends() {
        for sql in [SALE_LINES_SQL, PURCHASE_LINES_SQL] {
            assert!(sql.contains("n.date >= $1"));
            assert!(sql.contains("n.date <= $2"));
        }
    }
}
