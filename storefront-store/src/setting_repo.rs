use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use storefront_core::{BoxError, SettingRepository};

pub struct StoreSettingRepository {
    pool: PgPool,
}

impl StoreSettingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingRepository for StoreSettingRepository {
    async fn get_setting(&self, key: &str, store_id: &str) -> Result<Option<Value>, BoxError> {
        let value: Option<Value> = sqlx::query_scalar(
            "SELECT value FROM settings WHERE name = $1 AND store_id = $2",
        )
        .bind(key)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value)
    }

    async fn set_setting(&self, key: &str, store_id: &str, value: Value) -> Result<(), BoxError> {
        sqlx::query(
            r#"
            INSERT INTO settings (name, store_id, value, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (name, store_id) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(store_id)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_setting(&self, key: &str, store_id: &str) -> Result<bool, BoxError> {
        let result = sqlx::query("DELETE FROM settings WHERE name = $1 AND store_id = $2")
            .bind(key)
            .bind(store_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
