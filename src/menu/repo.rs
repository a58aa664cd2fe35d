use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::dto::{CreateMenuItem, MenuQuery, UpdateMenuItem};
use super::repo_types::MenuItem;

const ITEM_COLUMNS: &str = "id, name, description, price, category, available, image_url, \
                            is_vegetarian, is_vegan, is_gluten_free, created_at, updated_at";

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Postgres>, query: &'a MenuQuery) {
    if let Some(category) = &query.category {
        qb.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(search) = &query.search {
        qb.push(" AND name ILIKE ").push_bind(format!("%{search}%"));
    }
}

impl MenuItem {
    /// Filtered, sorted, paginated listing plus the unpaginated total.
    pub async fn list(db: &PgPool, query: &MenuQuery) -> anyhow::Result<(Vec<MenuItem>, i64)> {
        let limit = query.limit.clamp(1, 100);
        let offset = (query.page.max(1) - 1) * limit;

        let order = match query.sort.as_deref() {
            Some("price_asc") => " ORDER BY price ASC",
            Some("price_desc") => " ORDER BY price DESC",
            Some("name_asc") => " ORDER BY name ASC",
            Some("name_desc") => " ORDER BY name DESC",
            _ => " ORDER BY created_at DESC",
        };

        let mut qb = QueryBuilder::new(format!("SELECT {ITEM_COLUMNS} FROM menu_items WHERE TRUE"));
        push_filters(&mut qb, query);
        qb.push(order);
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);
        let items = qb.build_query_as::<MenuItem>().fetch_all(db).await?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM menu_items WHERE TRUE");
        push_filters(&mut count_qb, query);
        let total: i64 = count_qb.build_query_scalar().fetch_one(db).await?;

        Ok((items, total))
    }

    pub async fn list_by_category(db: &PgPool, category: &str) -> anyhow::Result<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM menu_items WHERE category = $1 ORDER BY name ASC"
        ))
        .bind(category)
        .fetch_all(db)
        .await?;
        Ok(items)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM menu_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(item)
    }

    pub async fn create(db: &PgPool, payload: &CreateMenuItem) -> anyhow::Result<MenuItem> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "INSERT INTO menu_items
                (name, description, price, category, available, image_url,
                 is_vegetarian, is_vegan, is_gluten_free)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price)
        .bind(&payload.category)
        .bind(payload.available)
        .bind(&payload.image_url)
        .bind(payload.is_vegetarian)
        .bind(payload.is_vegan)
        .bind(payload.is_gluten_free)
        .fetch_one(db)
        .await?;
        Ok(item)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        payload: &UpdateMenuItem,
    ) -> anyhow::Result<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "UPDATE menu_items SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                category = COALESCE($5, category),
                available = COALESCE($6, available),
                image_url = COALESCE($7, image_url),
                is_vegetarian = COALESCE($8, is_vegetarian),
                is_vegan = COALESCE($9, is_vegan),
                is_gluten_free = COALESCE($10, is_gluten_free),
                updated_at = now()
             WHERE id = $1
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price)
        .bind(&payload.category)
        .bind(payload.available)
        .bind(&payload.image_url)
        .bind(payload.is_vegetarian)
        .bind(payload.is_vegan)
        .bind(payload.is_gluten_free)
        .fetch_optional(db)
        .await?;
        Ok(item)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
