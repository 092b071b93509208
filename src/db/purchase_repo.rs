// src/db/purchase_repo.rs

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        error::AppError,
        pagination::{like_pattern, SortColumns, SortOrder},
        response::Paginated,
    },
    models::invoice::{LineItemPayload, PurchaseInvoice, PurchaseInvoiceFilters, PurchaseLineItem},
};

const SELECT_INVOICE: &str = r#"
    SELECT n.*, f.name AS supplier_name
    FROM purchase_invoices n
    JOIN suppliers f ON f.id = n.supplier_id
"#;

const SORT: SortColumns = SortColumns {
    allowed: &[
        ("id", "n.id"),
        ("date", "n.date"),
        ("total", "n.total"),
        ("supplierName", "f.name"),
    ],
    default: "n.date",
    primary_key: "n.id",
};

#[derive(Clone)]
pub struct PurchaseInvoiceRepository {
    pool: PgPool,
}

impl PurchaseInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn find_all(&self) -> Result<Vec<PurchaseInvoice>, AppError> {
        let sql = format!("{} ORDER BY n.date DESC, n.id DESC", SELECT_INVOICE);
        let mut invoices = sqlx::query_as::<_, PurchaseInvoice>(&sql)
            .fetch_all(&self.pool)
            .await?;
        self.load_items(&mut invoices).await?;
        Ok(invoices)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<PurchaseInvoice>, AppError> {
        let sql = format!("{} WHERE n.id = $1", SELECT_INVOICE);
        let invoice = sqlx::query_as::<_, PurchaseInvoice>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match invoice {
            Some(invoice) => {
                let mut invoices = vec![invoice];
                self.load_items(&mut invoices).await?;
                Ok(invoices.pop())
            }
            None => Ok(None),
        }
    }

    pub async fn find_per_page(
        &self,
        filters: &PurchaseInvoiceFilters,
    ) -> Result<Paginated<PurchaseInvoice>, AppError> {
        let page = filters.page_request();
        let mut tx = self.pool.begin().await?;

        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM purchase_invoices n JOIN suppliers f ON f.id = n.supplier_id WHERE 1=1",
        );
        push_filters(&mut count, filters);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&mut *tx).await?;

        let mut query = QueryBuilder::<Postgres>::new(SELECT_INVOICE);
        query.push(" WHERE 1=1");
        push_filters(&mut query, filters);
        query.push(order_clause(filters));
        page.push_limit_offset(&mut query);
        let mut items = query.build_query_as::<PurchaseInvoice>().fetch_all(&mut *tx).await?;

        tx.commit().await?;
        self.load_items(&mut items).await?;
        Ok(Paginated::new(items, total))
    }

    async fn load_items(&self, invoices: &mut [PurchaseInvoice]) -> Result<(), AppError> {
        if invoices.is_empty() {
            return Ok(());
        }
        let ids: Vec<i32> = invoices.iter().map(|n| n.id).collect();
        let items = sqlx::query_as::<_, PurchaseLineItem>(
            r#"
            SELECT i.*, p.name AS product_name
            FROM purchase_items i
            JOIN products p ON p.id = i.product_id
            WHERE i.invoice_id = ANY($1)
            ORDER BY i.id ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_invoice = group_by_invoice(items, |i| i.invoice_id);
        for invoice in invoices.iter_mut() {
            invoice.items = by_invoice.remove(&invoice.id).unwrap_or_default();
        }
        Ok(())
    }

    // ---
    // Escrita (chamadas dentro da transação do InvoiceService)
    // ---

    pub async fn insert_header<'e, E>(
        &self,
        executor: E,
        date: NaiveDate,
        supplier_id: i32,
        total: Decimal,
    ) -> Result<PurchaseInvoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PurchaseInvoice>(
            "INSERT INTO purchase_invoices (date, supplier_id, total) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(date)
        .bind(supplier_id)
        .bind(total)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::from_write(e, "purchase_invoices"))
    }

    pub async fn update_header<'e, E>(
        &self,
        executor: E,
        id: i32,
        date: NaiveDate,
        supplier_id: i32,
        total: Decimal,
    ) -> Result<PurchaseInvoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PurchaseInvoice>(
            r#"
            UPDATE purchase_invoices
            SET date = $2, supplier_id = $3, total = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(date)
        .bind(supplier_id)
        .bind(total)
        .fetch_optional(executor)
        .await
        .map_err(|e| AppError::from_write(e, "purchase_invoices"))?
        .ok_or(AppError::NotFound("Nota fiscal de compra"))
    }

    pub async fn insert_items<'e, E>(
        &self,
        executor: E,
        invoice_id: i32,
        items: &[LineItemPayload],
    ) -> Result<Vec<PurchaseLineItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO purchase_items (invoice_id, product_id, quantity, unit, unit_price) ",
        );
        qb.push_values(items, |mut b, item| {
            b.push_bind(invoice_id)
                .push_bind(item.product_id)
                .push_bind(item.quantity)
                .push_bind(item.unit.trim().to_string())
                .push_bind(item.unit_price);
        });
        qb.push(" RETURNING *");

        qb.build_query_as::<PurchaseLineItem>()
            .fetch_all(executor)
            .await
            .map_err(|e| AppError::from_write(e, "purchase_items"))
    }

    pub async fn delete_items<'e, E>(&self, executor: E, invoice_id: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM purchase_items WHERE invoice_id = $1")
            .bind(invoice_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Os itens caem junto (ON DELETE CASCADE).
    pub async fn delete<'e, E>(&self, executor: E, id: i32) -> Result<PurchaseInvoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PurchaseInvoice>("DELETE FROM purchase_invoices WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::from_delete(e, "Nota fiscal de compra"))?
            .ok_or(AppError::NotFound("Nota fiscal de compra"))
    }
}

/// Agrupa itens de nota pelo id da nota, mantendo a ordem de chegada.
pub(crate) fn group_by_invoice<T>(items: Vec<T>, invoice_id: impl Fn(&T) -> i32) -> HashMap<i32, Vec<T>> {
    let mut by_invoice: HashMap<i32, Vec<T>> = HashMap::new();
    for item in items {
        by_invoice.entry(invoice_id(&item)).or_default().push(item);
    }
    by_invoice
}

/// Notas mais recentes primeiro quando nada for pedido; um `sortField`
/// explícito sem `sortOrder` ordena em ASC.
fn order_clause(filters: &PurchaseInvoiceFilters) -> String {
    let field = filters.sort_field.as_deref();
    SORT.order_by(field, SORT.direction(field, filters.sort_order, SortOrder::Desc))
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &PurchaseInvoiceFilters) {
    if let Some(search) = &filters.search {
        qb.push(" AND f.name ILIKE ").push_bind(like_pattern(search)).push(" ESCAPE '\\'");
    }
    if let Some(supplier_id) = filters.fornecedor_id {
        qb.push(" AND n.supplier_id = ").push_bind(supplier_id);
    }
    if let Some(start) = filters.date_start {
        qb.push(" AND n.date >= ").push_bind(start);
    }
    if let Some(end) = filters.date_end {
        qb.push(" AND n.date <= ").push_bind(end);
    }
    if let Some(min) = filters.total_min {
        qb.push(" AND n.total >= ").push_bind(min);
    }
    if let Some(max) = filters.total_max {
        qb.push(" AND n.total <= ").push_bind(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn supplier_and_period_filters() {
        let filters = PurchaseInvoiceFilters {
            fornecedor_id: Some(7),
            date_start: NaiveDate::from_ymd_opt(2026, 1, 1),
            date_end: NaiveDate::from_ymd_opt(2026, 1, 31),
            total_min: Some(dec!(100)),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("WHERE 1=1");
        push_filters(&mut qb, &filters);
        assert_eq!(
            qb.sql(),
            "WHERE 1=1 AND n.supplier_id = $1 AND n.date >= $2 AND n.date <= $3 AND n.total >= $4"
        );
    }

    #[test]
    fn items_are_grouped_per_invoice_in_order() {
        let grouped = group_by_invoice(vec![(1, "a"), (2, "b"), (1, "c")], |(id, _)| *id);
        assert_eq!(grouped[&1], vec![(1, "a"), (1, "c")]);
        assert_eq!(grouped[&2], vec![(2, "b")]);
    }

    #[test]
    fn default_order_is_newest_first_but_explicit_field_is_ascending() {
        let default = PurchaseInvoiceFilters::default();
        assert_eq!(order_clause(&default), " ORDER BY n.date DESC, n.id DESC");

        let by_total = PurchaseInvoiceFilters { sort_field: Some("total".into()), ..Default::default() };
        assert_eq!(order_clause(&by_total), " ORDER BY n.total ASC, n.id ASC");

        let by_total_desc = PurchaseInvoiceFilters {
            sort_field: Some("total".into()),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(order_clause(&by_total_desc), " ORDER BY n.total DESC, n.id DESC");
    }
}
