use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::{BoxError, CoreError, CoreResult};

/// Store id under which settings shared by every store are kept.
pub const ALL_STORES: &str = "";

/// A typed settings record persisted as one JSON document under `KEY`.
pub trait Settings: Serialize + DeserializeOwned + Send + Sync {
    const KEY: &'static str;
}

#[async_trait]
pub trait SettingRepository: Send + Sync {
    async fn get_setting(&self, key: &str, store_id: &str) -> Result<Option<Value>, BoxError>;

    async fn set_setting(&self, key: &str, store_id: &str, value: Value) -> Result<(), BoxError>;

    /// Returns whether a record was removed.
    async fn delete_setting(&self, key: &str, store_id: &str) -> Result<bool, BoxError>;
}

/// Load `S` for a store, falling back to the all-stores record.
pub async fn load_settings<S: Settings>(
    repo: &dyn SettingRepository,
    store_id: &str,
) -> CoreResult<Option<S>> {
    let mut value = repo
        .get_setting(S::KEY, store_id)
        .await
        .map_err(CoreError::StorageError)?;

    if value.is_none() && store_id != ALL_STORES {
        value = repo
            .get_setting(S::KEY, ALL_STORES)
            .await
            .map_err(CoreError::StorageError)?;
    }

    value
        .map(|v| {
            serde_json::from_value(v).map_err(|source| CoreError::SettingFormat {
                key: S::KEY.to_string(),
                source,
            })
        })
        .transpose()
}

pub async fn save_settings<S: Settings>(
    repo: &dyn SettingRepository,
    store_id: &str,
    settings: &S,
) -> CoreResult<()> {
    let value = serde_json::to_value(settings).map_err(|source| CoreError::SettingFormat {
        key: S::KEY.to_string(),
        source,
    })?;

    repo.set_setting(S::KEY, store_id, value)
        .await
        .map_err(CoreError::StorageError)?;
    info!("Saved settings {} for store '{}'", S::KEY, store_id);
    Ok(())
}

pub async fn delete_settings<S: Settings>(repo: &dyn SettingRepository, store_id: &str) -> CoreResult<bool> {
    let removed = repo
        .delete_setting(S::KEY, store_id)
        .await
        .map_err(CoreError::StorageError)?;
    if removed {
        info!("Deleted settings {} for store '{}'", S::KEY, store_id);
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct ShippingSettings {
        free_shipping_over_cents: i64,
    }

    impl Settings for ShippingSettings {
        const KEY: &'static str = "shippingsettings";
    }

    #[derive(Default)]
    struct FakeSettings {
        rows: Mutex<HashMap<(String, String), Value>>,
    }

    #[async_trait]
    impl SettingRepository for FakeSettings {
        async fn get_setting(&self, key: &str, store_id: &str) -> Result<Option<Value>, BoxError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.get(&(key.to_string(), store_id.to_string())).cloned())
        }

        async fn set_setting(&self, key: &str, store_id: &str, value: Value) -> Result<(), BoxError> {
            self.rows
                .lock()
                .unwrap()
                .insert((key.to_string(), store_id.to_string()), value);
            Ok(())
        }

        async fn delete_setting(&self, key: &str, store_id: &str) -> Result<bool, BoxError> {
            let mut rows = self.rows.lock().unwrap();
            Ok(rows.remove(&(key.to_string(), store_id.to_string())).is_some())
        }
    }

    #[tokio::test]
    async fn test_store_record_overrides_global() {
        let repo = FakeSettings::default();
        save_settings(&repo, ALL_STORES, &ShippingSettings { free_shipping_over_cents: 5000 })
            .await
            .unwrap();

        let inherited: ShippingSettings = load_settings(&repo, "store-2").await.unwrap().unwrap();
        assert_eq!(inherited.free_shipping_over_cents, 5000);

        save_settings(&repo, "store-2", &ShippingSettings { free_shipping_over_cents: 9900 })
            .await
            .unwrap();
        let own: ShippingSettings = load_settings(&repo, "store-2").await.unwrap().unwrap();
        assert_eq!(own.free_shipping_over_cents, 9900);
    }

    #[tokio::test]
    async fn test_delete_settings() {
        let repo = FakeSettings::default();
        save_settings(&repo, ALL_STORES, &ShippingSettings { free_shipping_over_cents: 0 })
            .await
            .unwrap();

        assert!(delete_settings::<ShippingSettings>(&repo, ALL_STORES).await.unwrap());
        assert!(!delete_settings::<ShippingSettings>(&repo, ALL_STORES).await.unwrap());

        let loaded: Option<ShippingSettings> = load_settings(&repo, ALL_STORES).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_malformed_record_is_reported() {
        let repo = FakeSettings::default();
        repo.set_setting("shippingsettings", ALL_STORES, serde_json::json!({"oops": true}))
            .await
            .unwrap();

        let err = load_settings::<ShippingSettings>(&repo, ALL_STORES).await.unwrap_err();
        assert!(matches!(err, CoreError::SettingFormat { .. }));
    }
}
