// src/db/sale_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        error::AppError,
        pagination::{SortColumns, SortOrder},
        response::Paginated,
    },
    db::purchase_repo::group_by_invoice,
    models::invoice::{LineItemPayload, SaleInvoice, SaleInvoiceFilters, SaleLineItem},
};

const SORT: SortColumns = SortColumns {
    allowed: &[("id", "n.id"), ("date", "n.date"), ("total", "n.total")],
    default: "n.date",
    primary_key: "n.id",
};

#[derive(Clone)]
pub struct SaleInvoiceRepository {
    pool: PgPool,
}

impl SaleInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<SaleInvoice>, AppError> {
        let mut invoices = sqlx::query_as::<_, SaleInvoice>(
            "SELECT n.* FROM sale_invoices n ORDER BY n.date DESC, n.id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        self.load_items(&mut invoices).await?;
        Ok(invoices)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<SaleInvoice>, AppError> {
        let invoice = sqlx::query_as::<_, SaleInvoice>("SELECT n.* FROM sale_invoices n WHERE n.id = $1")
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

    pub async fn find_per_page(&self, filters: &SaleInvoiceFilters) -> Result<Paginated<SaleInvoice>, AppError> {
        let page = filters.page_request();
        let mut tx = self.pool.begin().await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM sale_invoices n WHERE 1=1");
        push_filters(&mut count, filters);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&mut *tx).await?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT n.* FROM sale_invoices n WHERE 1=1");
        push_filters(&mut query, filters);
        query.push(order_clause(filters));
        page.push_limit_offset(&mut query);
        let mut items = query.build_query_as::<SaleInvoice>().fetch_all(&mut *tx).await?;

        tx.commit().await?;
        self.load_items(&mut items).await?;
        Ok(Paginated::new(items, total))
    }

    async fn load_items(&self, invoices: &mut [SaleInvoice]) -> Result<(), AppError> {
        if invoices.is_empty() {
            return Ok(());
        }
        let ids: Vec<i32> = invoices.iter().map(|n| n.id).collect();
        let items = sqlx::query_as::<_, SaleLineItem>(
            r#"
            SELECT i.*, p.name AS product_name
            FROM sale_items i
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

    pub async fn insert_header<'e, E>(
        &self,
        executor: E,
        date: NaiveDate,
        total: Decimal,
    ) -> Result<SaleInvoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, SaleInvoice>("INSERT INTO sale_invoices (date, total) VALUES ($1, $2) RETURNING *")
            .bind(date)
            .bind(total)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_write(e, "sale_invoices"))
    }

    pub async fn update_header<'e, E>(
        &self,
        executor: E,
        id: i32,
        date: NaiveDate,
        total: Decimal,
    ) -> Result<SaleInvoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, SaleInvoice>(
            "UPDATE sale_invoices SET date = $2, total = $3, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(date)
        .bind(total)
        .fetch_optional(executor)
        .await
        .map_err(|e| AppError::from_write(e, "sale_invoices"))?
        .ok_or(AppError::NotFound("Nota fiscal de venda"))
    }

    pub async fn insert_items<'e, E>(
        &self,
        executor: E,
        invoice_id: i32,
        items: &[LineItemPayload],
    ) -> Result<Vec<SaleLineItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO sale_items (invoice_id, product_id, quantity, unit, unit_price) ",
        );
        qb.push_values(items, |mut b, item| {
            b.push_bind(invoice_id)
                .push_bind(item.product_id)
                .push_bind(item.quantity)
                .push_bind(item.unit.trim().to_string())
                .push_bind(item.unit_price);
        });
        qb.push(" RETURNING *");

        qb.build_query_as::<SaleLineItem>()
            .fetch_all(executor)
            .await
            .map_err(|e| AppError::from_write(e, "sale_items"))
    }

    pub async fn delete_items<'e, E>(&self, executor: E, invoice_id: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM sale_items WHERE invoice_id = $1")
            .bind(invoice_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i32) -> Result<SaleInvoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, SaleInvoice>("DELETE FROM sale_invoices WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::from_delete(e, "Nota fiscal de venda"))?
            .ok_or(AppError::NotFound("Nota fiscal de venda"))
    }
}

/// Notas mais recentes primeiro quando nada for pedido; um `sortField`
/// explícito sem `sortOrder` ordena em ASC.
fn order_clause(filters: &SaleInvoiceFilters) -> String {
    let field = filters.sort_field.as_deref();
    SORT.order_by(field, SORT.direction(field, filters.sort_order, SortOrder::Desc))
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &SaleInvoiceFilters) {
    if let Some(product_id) = filters.product_id {
        qb.push(" AND EXISTS (SELECT 1 FROM sale_items si WHERE si.invoice_id = n.id AND si.product_id = ")
            .push_bind(product_id)
            .push(")");
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
    fn product_filter_uses_exists_subquery() {
        let filters = SaleInvoiceFilters {
            product_id: Some(4),
            total_max: Some(dec!(50)),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("WHERE 1=1");
        push_filters(&mut qb, &filters);
        assert_eq!(
            qb.sql(),
            "WHERE 1=1 AND EXISTS (SELECT 1 FROM sale_items si WHERE si.invoice_id = n.id AND si.product_id = $1) \
             AND n.total <= $2"
        );
    }

    #[test]
    fn default_order_is_newest_first_but_explicit_field_is_ascending() {
        let default = SaleInvoiceFilters::default();
        assert_eq!(order_clause(&default), " ORDER BY n.date DESC, n.id DESC");

        let by_total = SaleInvoiceFilters { sort_field: Some("total".into()), ..Default::default() };
        assert_eq!(order_clause(&by_total), " ORDER BY n.total ASC, n.id ASC");

        let by_total_desc = SaleInvoiceFilters {
            sort_field: Some("total".into()),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(order_clause(&by_total_desc), " ORDER BY n.total DESC, n.id DESC");
    }
}
