// src/db/category_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        error::AppError,
        pagination::{like_pattern, SortColumns, SortOrder},
        response::Paginated,
    },
    models::category::{Category, CategoryFilters, CategoryPayload},
};

const SORT: SortColumns = SortColumns {
    allowed: &[("id", "id"), ("name", "name"), ("createdAt", "created_at")],
    default: "name",
    primary_key: "id",
};

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura: usa a pool principal
    // ---

    pub async fn find_all(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC, id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    pub async fn find_per_page(&self, filters: &CategoryFilters) -> Result<Paginated<Category>, AppError> {
        let page = filters.page_request();
        let mut tx = self.pool.begin().await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM categories WHERE 1=1");
        push_filters(&mut count, filters);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&mut *tx).await?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM categories WHERE 1=1");
        push_filters(&mut query, filters);
        query.push(SORT.order_by(
            filters.sort_field.as_deref(),
            filters.sort_order.unwrap_or(SortOrder::Asc),
        ));
        page.push_limit_offset(&mut query);
        let items = query.build_query_as::<Category>().fetch_all(&mut *tx).await?;

        tx.commit().await?;
        Ok(Paginated::new(items, total))
    }

    // ---
    // Escrita: aceita qualquer executor (pool, conexão ou transação)
    // ---

    pub async fn create<'e, E>(&self, executor: E, payload: &CategoryPayload) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Category>("INSERT INTO categories (name) VALUES ($1) RETURNING *")
            .bind(payload.name.trim())
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_write(e, "categories"))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i32,
        payload: &CategoryPayload,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(payload.name.trim())
        .fetch_optional(executor)
        .await
        .map_err(|e| AppError::from_write(e, "categories"))?
        .ok_or(AppError::NotFound("Categoria"))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i32) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Category>("DELETE FROM categories WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::from_delete(e, "Categoria"))?
            .ok_or(AppError::NotFound("Categoria"))
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &CategoryFilters) {
    if let Some(search) = &filters.search {
        qb.push(" AND name ILIKE ").push_bind(like_pattern(search)).push(" ESCAPE '\\'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_becomes_ilike() {
        let filters = CategoryFilters { search: Some("beb".into()), ..Default::default() };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM categories WHERE 1=1");
        push_filters(&mut qb, &filters);
        assert_eq!(qb.sql(), "SELECT * FROM categories WHERE 1=1 AND name ILIKE $1 ESCAPE '\\'");
    }

    #[test]
    fn no_filters_no_clauses() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM categories WHERE 1=1");
        push_filters(&mut qb, &CategoryFilters::default());
        assert_eq!(qb.sql(), "SELECT * FROM categories WHERE 1=1");
    }
}
