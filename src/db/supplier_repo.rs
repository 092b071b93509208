// src/db/supplier_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        error::AppError,
        pagination::{like_pattern, SortColumns, SortOrder},
        response::Paginated,
    },
    models::supplier::{Supplier, SupplierFilters, SupplierPayload},
};

const SORT: SortColumns = SortColumns {
    allowed: &[
        ("id", "id"),
        ("name", "name"),
        ("taxId", "tax_id"),
        ("email", "email"),
        ("createdAt", "created_at"),
    ],
    default: "name",
    primary_key: "id",
};

#[derive(Clone)]
pub struct SupplierRepository {
    pool: PgPool,
}

impl SupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Supplier>, AppError> {
        let suppliers = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers ORDER BY name ASC, id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(suppliers)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Supplier>, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(supplier)
    }

    pub async fn find_per_page(&self, filters: &SupplierFilters) -> Result<Paginated<Supplier>, AppError> {
        let page = filters.page_request();
        let mut tx = self.pool.begin().await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM suppliers WHERE 1=1");
        push_filters(&mut count, filters);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&mut *tx).await?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM suppliers WHERE 1=1");
        push_filters(&mut query, filters);
        query.push(SORT.order_by(
            filters.sort_field.as_deref(),
            filters.sort_order.unwrap_or(SortOrder::Asc),
        ));
        page.push_limit_offset(&mut query);
        let items = query.build_query_as::<Supplier>().fetch_all(&mut *tx).await?;

        tx.commit().await?;
        Ok(Paginated::new(items, total))
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &SupplierPayload) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, tax_id, phone, email)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(payload.name.trim())
        .bind(payload.tax_id.as_deref())
        .bind(payload.phone.as_deref())
        .bind(payload.email.as_deref())
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::from_write(e, "suppliers"))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i32,
        payload: &SupplierPayload,
    ) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
            SET name = $2, tax_id = $3, phone = $4, email = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.name.trim())
        .bind(payload.tax_id.as_deref())
        .bind(payload.phone.as_deref())
        .bind(payload.email.as_deref())
        .fetch_optional(executor)
        .await
        .map_err(|e| AppError::from_write(e, "suppliers"))?
        .ok_or(AppError::NotFound("Fornecedor"))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i32) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Supplier>("DELETE FROM suppliers WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::from_delete(e, "Fornecedor"))?
            .ok_or(AppError::NotFound("Fornecedor"))
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &SupplierFilters) {
    if let Some(search) = &filters.search {
        let term = like_pattern(search);
        qb.push(" AND (name ILIKE ").push_bind(term.clone()).push(" ESCAPE '\\'");
        qb.push(" OR tax_id ILIKE ").push_bind(term.clone()).push(" ESCAPE '\\'");
        qb.push(" OR email ILIKE ").push_bind(term).push(" ESCAPE '\\'");
        qb.push(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_matches_name_tax_id_or_email() {
        let filters = SupplierFilters { search: Some("silva".into()), ..Default::default() };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM suppliers WHERE 1=1");
        push_filters(&mut qb, &filters);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM suppliers WHERE 1=1 AND (name ILIKE $1 ESCAPE '\\' OR tax_id ILIKE $2 ESCAPE '\\' OR email ILIKE $3 ESCAPE '\\')"
        );
    }
}
