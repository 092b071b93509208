// src/db/product_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        error::AppError,
        pagination::{like_pattern, SortColumns, SortOrder},
        response::Paginated,
    },
    models::product::{Product, ProductFilters, ProductPayload},
};

const SELECT_PRODUCT: &str = r#"
    SELECT p.*, c.name AS category_name
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

// Escritas devolvem a linha já com o nome da categoria
const WRITTEN_PRODUCT: &str = r#"
    SELECT w.*, c.name AS category_name
    FROM written w
    LEFT JOIN categories c ON c.id = w.category_id
"#;

const INSERT_PRODUCT: &str = r#"
    INSERT INTO products (name, description, image_url, active, product_type, category_id)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING *
"#;

const UPDATE_PRODUCT: &str = r#"
    UPDATE products
    SET name = $2, description = $3, image_url = $4, active = $5,
        product_type = $6, category_id = $7, updated_at = NOW()
    WHERE id = $1
    RETURNING *
"#;

fn with_category_name(write: &str) -> String {
    format!("WITH written AS ({}) {}", write, WRITTEN_PRODUCT)
}

const SORT: SortColumns = SortColumns {
    allowed: &[
        ("id", "p.id"),
        ("name", "p.name"),
        ("active", "p.active"),
        ("productType", "p.product_type"),
        ("categoryName", "c.name"),
        ("createdAt", "p.created_at"),
    ],
    default: "p.name",
    primary_key: "p.id",
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Product>, AppError> {
        let sql = format!("{} ORDER BY p.name ASC, p.id ASC", SELECT_PRODUCT);
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Product>, AppError> {
        let sql = format!("{} WHERE p.id = $1", SELECT_PRODUCT);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn find_per_page(&self, filters: &ProductFilters) -> Result<Paginated<Product>, AppError> {
        let page = filters.page_request();
        let mut tx = self.pool.begin().await?;

        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM products p LEFT JOIN categories c ON c.id = p.category_id WHERE 1=1",
        );
        push_filters(&mut count, filters);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&mut *tx).await?;

        let mut query = QueryBuilder::<Postgres>::new(SELECT_PRODUCT);
        query.push(" WHERE 1=1");
        push_filters(&mut query, filters);
        query.push(SORT.order_by(
            filters.sort_field.as_deref(),
            filters.sort_order.unwrap_or(SortOrder::Asc),
        ));
        page.push_limit_offset(&mut query);
        let items = query.build_query_as::<Product>().fetch_all(&mut *tx).await?;

        tx.commit().await?;
        Ok(Paginated::new(items, total))
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &ProductPayload) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = with_category_name(INSERT_PRODUCT);
        sqlx::query_as::<_, Product>(&sql)
            .bind(payload.name.trim())
            .bind(payload.description.as_deref())
            .bind(payload.image_url.as_deref())
            .bind(payload.active)
            .bind(payload.product_type)
            .bind(payload.category_id)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_write(e, "products"))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i32,
        payload: &ProductPayload,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = with_category_name(UPDATE_PRODUCT);
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(payload.name.trim())
            .bind(payload.description.as_deref())
            .bind(payload.image_url.as_deref())
            .bind(payload.active)
            .bind(payload.product_type)
            .bind(payload.category_id)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::from_write(e, "products"))?
            .ok_or(AppError::NotFound("Produto"))
    }

    /// Falha com `InUse` se houver estoque ou itens de nota apontando para o produto.
    pub async fn delete<'e, E>(&self, executor: E, id: i32) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = with_category_name("DELETE FROM products WHERE id = $1 RETURNING *");
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::from_delete(e, "Produto"))?
            .ok_or(AppError::NotFound("Produto"))
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &ProductFilters) {
    if let Some(search) = &filters.search {
        qb.push(" AND p.name ILIKE ").push_bind(like_pattern(search)).push(" ESCAPE '\\'");
    }
    if let Some(category_id) = filters.category_id {
        qb.push(" AND p.category_id = ").push_bind(category_id);
    }
    if let Some(tipo) = filters.tipo {
        qb.push(" AND p.product_type = ").push_bind(tipo);
    }
    if let Some(ativo) = filters.ativo {
        qb.push(" AND p.active = ").push_bind(ativo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::ProductType;

    #[test]
    fn all_filters_are_combined_with_and() {
        let filters = ProductFilters {
            search: Some("farinha".into()),
            category_id: Some(3),
            tipo: Some(ProductType::Insumo),
            ativo: Some(true),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM products p WHERE 1=1");
        push_filters(&mut qb, &filters);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM products p WHERE 1=1 AND p.name ILIKE $1 ESCAPE '\\' AND p.category_id = $2 \
             AND p.product_type = $3 AND p.active = $4"
        );
    }

    #[test]
    fn category_name_sort_uses_join_alias() {
        assert_eq!(
            SORT.order_by(Some("categoryName"), SortOrder::Desc),
            " ORDER BY c.name DESC, p.id DESC"
        );
    }

    #[test]
    fn writes_return_category_name() {
        let sql = with_category_name(INSERT_PRODUCT);
        assert!(sql.starts_with("WITH written AS ("));
        assert!(sql.contains("RETURNING *\n) "));
        assert!(sql.contains("c.name AS category_name"));
        assert!(sql.contains("LEFT JOIN categories c ON c.id = w.category_id"));
    }
}
