use sqlx::{postgres::PgPoolOptions, PgPool};

/// Creates the inventory store's PostgreSQL pool and applies pending migrations
///
/// The engine only reads from the pool; migrations exist so a fresh
/// database has the `garments` table the store queries.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Inventory database ready");

    Ok(pool)
}
