//! Postgres-backed inventory store
//!
//! Reads the `garments` table. Store-level filters are pushed into the SQL
//! so the engine only ever sees matching rows.
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::RawGarmentRecord,
    services::providers::{InventoryFilter, InventoryStore},
};

const SELECT_GARMENTS: &str = r#"
    SELECT id, name, garment_type, color, style, brand, price, seasons, occasions
    FROM garments
    WHERE user_id = "#;

#[derive(Clone)]
pub struct PgInventoryStore {
    db_pool: PgPool,
}

impl PgInventoryStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Builds the filtered listing query for one user
    fn build_query(user_id: Uuid, filter: &InventoryFilter) -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::new(SELECT_GARMENTS);
        query.push_bind(user_id);

        if let Some(color) = &filter.color {
            query
                .push(
                    " AND EXISTS (SELECT 1 FROM unnest(string_to_array(color, ',')) AS c \
                     WHERE lower(trim(c)) = lower(",
                )
                .push_bind(color.trim().to_string())
                .push("))");
        }
        if let Some(style) = &filter.style {
            query
                .push(" AND lower(trim(style)) = lower(")
                .push_bind(style.trim().to_string())
                .push(")");
        }
        if let Some(brand) = &filter.brand {
            query
                .push(" AND lower(trim(brand)) = lower(")
                .push_bind(brand.trim().to_string())
                .push(")");
        }
        if let Some(season) = &filter.season {
            query
                .push(" AND EXISTS (SELECT 1 FROM unnest(seasons) AS s WHERE lower(trim(s)) = lower(")
                .push_bind(season.trim().to_string())
                .push("))");
        }
        if let Some(occasion) = &filter.occasion {
            query
                .push(" AND EXISTS (SELECT 1 FROM unnest(occasions) AS o WHERE lower(trim(o)) = lower(")
                .push_bind(occasion.trim().to_string())
                .push("))");
        }
        if let Some(min_price) = filter.min_price {
            query.push(" AND price >= ").push_bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            query.push(" AND price <= ").push_bind(max_price);
        }

        query.push(" ORDER BY created_at, id");
        query
    }
}

#[async_trait::async_trait]
impl InventoryStore for PgInventoryStore {
    async fn list_garments(
        &self,
        user_id: Uuid,
        filter: &InventoryFilter,
    ) -> AppResult<Vec<RawGarmentRecord>> {
        let mut query = Self::build_query(user_id, filter);

        let records = query
            .build_query_as::<RawGarmentRecord>()
            .fetch_all(&self.db_pool)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "Inventory query failed");
                AppError::InventoryUnavailable(e.to_string())
            })?;

        tracing::info!(
            user_id = %user_id,
            results = records.len(),
            store = self.name(),
            "Inventory listed"
        );

        Ok(records)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_query_without_filters() {
        let query = PgInventoryStore::build_query(Uuid::new_v4(), &InventoryFilter::default());
        let sql = query.sql();

        assert!(sql.contains("WHERE user_id = $1"));
        assert!(sql.ends_with("ORDER BY created_at, id"));
        assert!(!sql.contains("AND"));
    }

    #[test]
    fn test_query_binds_each_filter() {
        let filter = InventoryFilter {
            color: Some("Blue".to_string()),
            style: None,
            brand: Some("Acme".to_string()),
            season: Some("Winter".to_string()),
            occasion: None,
            min_price: Some(Decimal::from(10)),
            max_price: Some(Decimal::from(100)),
        };
        let query = PgInventoryStore::build_query(Uuid::new_v4(), &filter);
        let sql = query.sql();

        assert!(sql.contains("string_to_array(color, ',')"));
        assert!(sql.contains("lower(trim(brand)) = lower($3)"));
        assert!(sql.contains("unnest(seasons)"));
        assert!(sql.contains("price >= $5"));
        assert!(sql.contains("price <= $6"));
        assert!(!sql.contains("unnest(occasions)"));
    }
}
