use storefront_core::localization::{
    LanguageRepository, LocaleResourceRepository, LocaleStringResource,
};

use crate::plugin::PluginError;

/// Write `name = value` into every language, updating existing rows in place.
pub async fn add_or_update_plugin_locale_resource(
    resources: &dyn LocaleResourceRepository,
    languages: &dyn LanguageRepository,
    name: &str,
    value: &str,
) -> Result<(), PluginError> {
    let languages = languages
        .get_all_languages(true)
        .await
        .map_err(PluginError::Storage)?;

    for language in languages {
        let existing = resources
            .get_resource(name, &language.id)
            .await
            .map_err(PluginError::Storage)?;

        match existing {
            Some(mut resource) => {
                resource.resource_value = value.to_string();
                resources
                    .update_resource(&resource)
                    .await
                    .map_err(PluginError::Storage)?;
            }
            None => {
                let resource = LocaleStringResource::new(&language.id, name, value);
                resources
                    .insert_resource(&resource)
                    .await
                    .map_err(PluginError::Storage)?;
            }
        }
    }
    Ok(())
}

/// Remove `name` from every language. Missing rows are skipped.
pub async fn delete_plugin_locale_resource(
    resources: &dyn LocaleResourceRepository,
    languages: &dyn LanguageRepository,
    name: &str,
) -> Result<(), PluginError> {
    let languages = languages
        .get_all_languages(true)
        .await
        .map_err(PluginError::Storage)?;

    for language in languages {
        if let Some(resource) = resources
            .get_resource(name, &language.id)
            .await
            .map_err(PluginError::Storage)?
        {
            resources
                .delete_resource(&resource.id)
                .await
                .map_err(PluginError::Storage)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_store::memory::InMemoryStore;

    #[tokio::test]
    async fn test_add_or_update_writes_every_language() {
        let store = InMemoryStore::with_languages(&["en", "de"]);

        add_or_update_plugin_locale_resource(&store, &store, "Plugins.Test.Label", "Label")
            .await
            .unwrap();
        add_or_update_plugin_locale_resource(&store, &store, "plugins.test.label", "Better label")
            .await
            .unwrap();

        for lang in ["en", "de"] {
            let resource = store.get_resource("Plugins.Test.Label", lang).await.unwrap().unwrap();
            assert_eq!(resource.resource_value, "Better label");
        }
        assert_eq!(store.locale_resource_count(), 2);
    }

    #[tokio::test]
    async fn test_delete_removes_every_language() {
        let store = InMemoryStore::with_languages(&["en", "de"]);
        add_or_update_plugin_locale_resource(&store, &store, "Plugins.Test.Label", "Label")
            .await
            .unwrap();

        delete_plugin_locale_resource(&store, &store, "Plugins.Test.Label")
            .await
            .unwrap();
        // second delete is a no-op
        delete_plugin_locale_resource(&store, &store, "Plugins.Test.Label")
            .await
            .unwrap();

        assert_eq!(store.locale_resource_count(), 0);
    }
}
