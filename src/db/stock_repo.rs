// src/db/stock_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        error::AppError,
        pagination::{like_pattern, SortColumns, SortOrder},
        response::Paginated,
    },
    models::stock::{StockFilters, StockItem, StockItemPayload},
};

const SELECT_STOCK: &str = r#"
    SELECT s.*, p.name AS product_name
    FROM stock_items s
    JOIN products p ON p.id = s.product_id
"#;

// Escritas devolvem a linha já com o nome do produto
const WRITTEN_STOCK: &str = r#"
    SELECT w.*, p.name AS product_name
    FROM written w
    JOIN products p ON p.id = w.product_id
"#;

const INSERT_STOCK: &str = r#"
    INSERT INTO stock_items (product_id, unit_price, quantity, unit, expiry_date, stockable)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING *
"#;

const UPDATE_STOCK: &str = r#"
    UPDATE stock_items
    SET product_id = $2, unit_price = $3, quantity = $4, unit = $5,
        expiry_date = $6, stockable = $7, updated_at = NOW()
    WHERE id = $1
    RETURNING *
"#;

fn with_product_name(write: &str) -> String {
    format!("WITH written AS ({}) {}", write, WRITTEN_STOCK)
}

const SORT: SortColumns = SortColumns {
    allowed: &[
        ("id", "s.id"),
        ("productName", "p.name"),
        ("quantity", "s.quantity"),
        ("unitPrice", "s.unit_price"),
        ("expiryDate", "s.expiry_date"),
        ("unit", "s.unit"),
        ("createdAt", "s.created_at"),
    ],
    default: "p.name",
    primary_key: "s.id",
};

#[derive(Clone)]
pub struct StockRepository {
    pool: PgPool,
}

impl StockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<StockItem>, AppError> {
        let sql = format!("{} ORDER BY p.name ASC, s.id ASC", SELECT_STOCK);
        let items = sqlx::query_as::<_, StockItem>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<StockItem>, AppError> {
        let sql = format!("{} WHERE s.id = $1", SELECT_STOCK);
        let item = sqlx::query_as::<_, StockItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    pub async fn find_per_page(&self, filters: &StockFilters) -> Result<Paginated<StockItem>, AppError> {
        let page = filters.page_request();
        let mut tx = self.pool.begin().await?;

        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM stock_items s JOIN products p ON p.id = s.product_id WHERE 1=1",
        );
        push_filters(&mut count, filters);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&mut *tx).await?;

        let mut query = QueryBuilder::<Postgres>::new(SELECT_STOCK);
        query.push(" WHERE 1=1");
        push_filters(&mut query, filters);
        query.push(SORT.order_by(
            filters.sort_field.as_deref(),
            filters.sort_order.unwrap_or(SortOrder::Asc),
        ));
        page.push_limit_offset(&mut query);
        let items = query.build_query_as::<StockItem>().fetch_all(&mut *tx).await?;

        tx.commit().await?;
        Ok(Paginated::new(items, total))
    }

    /// Itens com validade até `until` (os já vencidos entram também).
    pub async fn find_expiring(&self, until: NaiveDate) -> Result<Vec<StockItem>, AppError> {
        let sql = format!(
            "{} WHERE s.expiry_date IS NOT NULL AND s.expiry_date <= $1 ORDER BY s.expiry_date ASC, s.id ASC",
            SELECT_STOCK
        );
        let items = sqlx::query_as::<_, StockItem>(&sql)
            .bind(until)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &StockItemPayload) -> Result<StockItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = with_product_name(INSERT_STOCK);
        sqlx::query_as::<_, StockItem>(&sql)
            .bind(payload.product_id)
            .bind(payload.unit_price)
            .bind(payload.quantity)
            .bind(payload.unit.trim())
            .bind(payload.expiry_date)
            .bind(payload.stockable)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_write(e, "stock_items"))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i32,
        payload: &StockItemPayload,
    ) -> Result<StockItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = with_product_name(UPDATE_STOCK);
        sqlx::query_as::<_, StockItem>(&sql)
            .bind(id)
            .bind(payload.product_id)
            .bind(payload.unit_price)
            .bind(payload.quantity)
            .bind(payload.unit.trim())
            .bind(payload.expiry_date)
            .bind(payload.stockable)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::from_write(e, "stock_items"))?
            .ok_or(AppError::NotFound("Item de estoque"))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i32) -> Result<StockItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = with_product_name("DELETE FROM stock_items WHERE id = $1 RETURNING *");
        sqlx::query_as::<_, StockItem>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::from_delete(e, "Item de estoque"))?
            .ok_or(AppError::NotFound("Item de estoque"))
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &StockFilters) {
    if let Some(search) = &filters.search {
        qb.push(" AND p.name ILIKE ").push_bind(like_pattern(search)).push(" ESCAPE '\\'");
    }
    if let Some(product_id) = filters.product_id {
        qb.push(" AND s.product_id = ").push_bind(product_id);
    }
    if let Some(min) = filters.quantidade_min {
        qb.push(" AND s.quantity >= ").push_bind(min);
    }
    if let Some(max) = filters.quantidade_max {
        qb.push(" AND s.quantity <= ").push_bind(max);
    }
    if let Some(min) = filters.preco_min {
        qb.push(" AND s.unit_price >= ").push_bind(min);
    }
    if let Some(max) = filters.preco_max {
        qb.push(" AND s.unit_price <= ").push_bind(max);
    }
    if let Some(start) = filters.date_start {
        qb.push(" AND s.expiry_date >= ").push_bind(start);
    }
    if let Some(end) = filters.date_end {
        qb.push(" AND s.expiry_date <= ").push_bind(end);
    }
    if let Some(estocavel) = filters.estocavel {
        qb.push(" AND s.stockable = ").push_bind(estocavel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ranges_are_inclusive() {
        let filters = StockFilters {
            quantidade_min: Some(dec!(1)),
            quantidade_max: Some(dec!(10)),
            preco_min: Some(dec!(2.5)),
            date_end: NaiveDate::from_ymd_opt(2026, 12, 31),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("WHERE 1=1");
        push_filters(&mut qb, &filters);
        assert_eq!(
            qb.sql(),
            "WHERE 1=1 AND s.quantity >= $1 AND s.quantity <= $2 AND s.unit_price >= $3 \
             AND s.expiry_date <= $4"
        );
    }

    #[test]
    fn stock_query_string_is_parsed() {
        let filters: StockFilters = serde_json::from_value(serde_json::json!({
            "search": "leite",
            "quantidadeMin": "",
            "precoMax": "12.90",
            "dateStart": "2026-01-01",
            "estocavel": "true",
            "page": "2",
        }))
        .unwrap();

        assert_eq!(filters.search.as_deref(), Some("leite"));
        assert_eq!(filters.quantidade_min, None);
        assert_eq!(filters.preco_max, Some(dec!(12.90)));
        assert_eq!(filters.date_start, NaiveDate::from_ymd_opt(2026, 1, 1));
        assert_eq!(filters.estocavel, Some(true));
        assert_eq!(filters.page_request().page, 2);
    }

    #[test]
    fn writes_return_product_name() {
        let sql = with_product_name(UPDATE_STOCK);
        assert!(sql.starts_with("WITH written AS ("));
        assert!(sql.contains("RETURNING *\n) "));
        assert!(sql.contains("p.name AS product_name"));
        assert!(sql.contains("JOIN products p ON p.id = w.product_id"));
    }
}
