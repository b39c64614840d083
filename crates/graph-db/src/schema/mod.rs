//! Schema bootstrap for the edge tables
//!
//! The statements are idempotent, so running them against an already
//! migrated database is a no-op.

use sqlx::PgPool;
use tracing::{info, instrument};

const EDGE_TABLES: &str = include_str!("001_edges.sql");

/// Create the edge tables and their indexes if they are missing
#[instrument(skip(pool))]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(EDGE_TABLES).execute(pool).await?;
    info!("Edge schema is up to date");
    Ok(())
}
