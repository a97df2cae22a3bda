/// Company model
///
/// Companies are a closed set of labels seeded by migration; tasks may
/// reference one by name. There is no API for creating or editing them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Company label
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    /// Unique company ID
    pub id: i32,

    /// Company label, unique
    pub name: String,

    /// When the label was seeded
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// Lists all companies, ordered alphabetically by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let companies = sqlx::query_as::<_, Company>(
            "SELECT id, name, created_at FROM companies ORDER BY name",
        )
        .fetch_all(pool)
        .await?;

        Ok(companies)
    }
}
