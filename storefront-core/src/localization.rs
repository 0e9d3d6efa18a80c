use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::settings::Settings;
use crate::{BoxError, CoreError, CoreResult};

/// A translated value of one entity field, e.g. the `Name` of a return reason in German.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalizedProperty {
    pub language_id: String,
    pub locale_key: String,
    pub locale_value: String,
}

impl LocalizedProperty {
    pub fn new(
        language_id: impl Into<String>,
        locale_key: impl Into<String>,
        locale_value: impl Into<String>,
    ) -> Self {
        Self {
            language_id: language_id.into(),
            locale_key: locale_key.into(),
            locale_value: locale_value.into(),
        }
    }
}

/// Pick the translation of `key` for `language_id`, or `fallback` when there is none.
///
/// Empty translations count as missing.
pub fn localize<'a>(
    locales: &'a [LocalizedProperty],
    key: &str,
    language_id: &str,
    fallback: &'a str,
) -> &'a str {
    if language_id.is_empty() {
        return fallback;
    }

    locales
        .iter()
        .find(|l| l.language_id == language_id && l.locale_key == key)
        .map(|l| l.locale_value.as_str())
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Language {
    pub id: String,
    pub name: String,
    pub language_culture: String,
    pub unique_seo_code: String,
    pub published: bool,
    pub display_order: i32,
}

/// A named UI string in one language (`ReturnRequests.NoItemsSubmitted` → "No items submitted").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleStringResource {
    pub id: String,
    pub language_id: String,
    pub resource_name: String,
    pub resource_value: String,
}

impl LocaleStringResource {
    pub fn new(
        language_id: impl Into<String>,
        resource_name: impl Into<String>,
        resource_value: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            language_id: language_id.into(),
            resource_name: resource_name.into(),
            resource_value: resource_value.into(),
        }
    }
}

#[async_trait]
pub trait LanguageRepository: Send + Sync {
    async fn get_all_languages(&self, show_hidden: bool) -> Result<Vec<Language>, BoxError>;
}

/// Resource names are matched case-insensitively.
#[async_trait]
pub trait LocaleResourceRepository: Send + Sync {
    async fn get_resource(
        &self,
        resource_name: &str,
        language_id: &str,
    ) -> Result<Option<LocaleStringResource>, BoxError>;

    async fn insert_resource(&self, resource: &LocaleStringResource) -> Result<(), BoxError>;

    async fn update_resource(&self, resource: &LocaleStringResource) -> Result<(), BoxError>;

    async fn delete_resource(&self, id: &str) -> Result<(), BoxError>;
}

/// Languages used by back-office and customer-facing workflows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalizationSettings {
    pub default_admin_language_id: String,
    pub default_language_id: String,
}

impl Settings for LocalizationSettings {
    const KEY: &'static str = "localizationsettings";
}

#[derive(Clone)]
pub struct LocalizationService {
    resources: Arc<dyn LocaleResourceRepository>,
}

impl LocalizationService {
    pub fn new(resources: Arc<dyn LocaleResourceRepository>) -> Self {
        Self { resources }
    }

    /// Resolve a resource string, falling back to the resource name itself.
    pub async fn get_resource(&self, resource_name: &str, language_id: &str) -> CoreResult<String> {
        let resource = self
            .resources
            .get_resource(resource_name, language_id)
            .await
            .map_err(CoreError::StorageError)?;

        match resource {
            Some(r) => Ok(r.resource_value),
            None => {
                debug!("Locale resource {} missing for language {}", resource_name, language_id);
                Ok(resource_name.to_string())
            }
        }
    }
}
