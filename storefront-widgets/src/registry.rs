use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storefront_core::settings::{self, ALL_STORES};
use storefront_core::{SettingRepository, Settings};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::plugin::{Plugin, PluginDescriptor, PluginError, WidgetContext};

/// System names of installed plugins, persisted so installs survive restarts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstalledPlugins {
    pub system_names: Vec<String>,
}

impl Settings for InstalledPlugins {
    const KEY: &'static str = "installedplugins";
}

#[derive(Debug, Clone, Serialize)]
pub struct PluginInfo {
    #[serde(flatten)]
    pub descriptor: PluginDescriptor,
    pub installed: bool,
    pub configuration_url: String,
}

/// Markup one widget contributed to a zone
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WidgetContent {
    pub system_name: String,
    pub view_component: String,
    pub html: String,
}

/// Explicit registry of the plugins compiled into this deployment
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
    installed: RwLock<HashSet<String>>,
    settings: Arc<dyn SettingRepository>,
}

impl PluginRegistry {
    pub fn new(settings: Arc<dyn SettingRepository>) -> Self {
        Self {
            plugins: Vec::new(),
            installed: RwLock::new(HashSet::new()),
            settings,
        }
    }

    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> Result<(), PluginError> {
        let system_name = plugin.descriptor().system_name.clone();
        if self.find(&system_name).is_ok() {
            return Err(PluginError::AlreadyRegistered(system_name));
        }
        info!("Registered plugin {}", system_name);
        self.plugins.push(plugin);
        Ok(())
    }

    /// Restore the installed set saved by earlier installs.
    pub async fn load_installed(&self) -> Result<(), PluginError> {
        let saved: InstalledPlugins = settings::load_settings(self.settings.as_ref(), ALL_STORES)
            .await?
            .unwrap_or_default();

        let mut installed = self.installed.write().await;
        installed.clear();
        for name in saved.system_names {
            match self.find(&name) {
                Ok(plugin) => {
                    installed.insert(plugin.descriptor().system_name.clone());
                }
                Err(_) => warn!("Installed plugin {} is not registered, ignoring", name),
            }
        }
        Ok(())
    }

    pub async fn install(&self, system_name: &str) -> Result<(), PluginError> {
        let plugin = self.find(system_name)?;
        let system_name = plugin.descriptor().system_name.clone();

        let mut installed = self.installed.write().await;
        if installed.contains(&system_name) {
            return Err(PluginError::AlreadyInstalled(system_name));
        }

        plugin.install().await?;
        let mut updated = installed.clone();
        updated.insert(system_name.clone());
        self.persist(&updated).await?;
        *installed = updated;

        info!("Installed plugin {}", system_name);
        Ok(())
    }

    pub async fn uninstall(&self, system_name: &str) -> Result<(), PluginError> {
        let plugin = self.find(system_name)?;
        let system_name = plugin.descriptor().system_name.clone();

        let mut installed = self.installed.write().await;
        if !installed.contains(&system_name) {
            return Err(PluginError::NotInstalled(system_name));
        }

        plugin.uninstall().await?;
        let mut updated = installed.clone();
        updated.remove(&system_name);
        self.persist(&updated).await?;
        *installed = updated;

        info!("Uninstalled plugin {}", system_name);
        Ok(())
    }

    pub async fn is_installed(&self, system_name: &str) -> bool {
        match self.find(system_name) {
            Ok(plugin) => self
                .installed
                .read()
                .await
                .contains(&plugin.descriptor().system_name),
            Err(_) => false,
        }
    }

    /// All registered plugins ordered by display order.
    pub async fn list(&self) -> Vec<PluginInfo> {
        let installed = self.installed.read().await;
        let mut infos: Vec<PluginInfo> = self
            .plugins
            .iter()
            .map(|p| PluginInfo {
                descriptor: p.descriptor().clone(),
                installed: installed.contains(&p.descriptor().system_name),
                configuration_url: p.configuration_page_url(),
            })
            .collect();
        infos.sort_by_key(|i| i.descriptor.display_order);
        infos
    }

    /// Installed widget plugins contributing to `zone`, as (system name, view component).
    pub async fn zone_components(&self, zone: &str) -> Vec<(String, String)> {
        self.zone_plugins(zone)
            .await
            .iter()
            .filter_map(|p| {
                let widget = p.as_widget()?;
                Some((
                    p.descriptor().system_name.clone(),
                    widget.view_component(zone).to_string(),
                ))
            })
            .collect()
    }

    /// Render every installed widget contributing to `zone`, in display order.
    pub async fn render_zone(
        &self,
        zone: &str,
        context: &WidgetContext,
    ) -> Result<Vec<WidgetContent>, PluginError> {
        let mut contents = Vec::new();
        for plugin in self.zone_plugins(zone).await {
            let Some(widget) = plugin.as_widget() else {
                continue;
            };
            let html = widget.render(zone, context).await?;
            if html.is_empty() {
                continue;
            }
            contents.push(WidgetContent {
                system_name: plugin.descriptor().system_name.clone(),
                view_component: widget.view_component(zone).to_string(),
                html,
            });
        }
        Ok(contents)
    }

    async fn zone_plugins(&self, zone: &str) -> Vec<Arc<dyn Plugin>> {
        let installed = self.installed.read().await;
        let mut plugins: Vec<Arc<dyn Plugin>> = self
            .plugins
            .iter()
            .filter(|p| installed.contains(&p.descriptor().system_name))
            .filter(|p| {
                p.as_widget()
                    .map(|w| w.widget_zones().iter().any(|z| z.eq_ignore_ascii_case(zone)))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        plugins.sort_by_key(|p| p.descriptor().display_order);
        plugins
    }

    fn find(&self, system_name: &str) -> Result<&Arc<dyn Plugin>, PluginError> {
        self.plugins
            .iter()
            .find(|p| p.descriptor().system_name.eq_ignore_ascii_case(system_name))
            .ok_or_else(|| PluginError::NotFound(system_name.to_string()))
    }

    async fn persist(&self, installed: &HashSet<String>) -> Result<(), PluginError> {
        let mut system_names: Vec<String> = installed.iter().cloned().collect();
        system_names.sort();
        settings::save_settings(
            self.settings.as_ref(),
            ALL_STORES,
            &InstalledPlugins { system_names },
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::WidgetPlugin;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storefront_core::StoreContext;
    use storefront_store::memory::InMemoryStore;

    struct FooterBanner {
        descriptor: PluginDescriptor,
        installs: AtomicUsize,
        uninstalls: AtomicUsize,
    }

    impl FooterBanner {
        fn new(system_name: &str, display_order: i32) -> Self {
            Self {
                descriptor: PluginDescriptor {
                    system_name: system_name.to_string(),
                    friendly_name: "Footer banner".to_string(),
                    group: "Widgets".to_string(),
                    version: "1.0".to_string(),
                    author: "storefront".to_string(),
                    display_order,
                },
                installs: AtomicUsize::new(0),
                uninstalls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Plugin for FooterBanner {
        fn descriptor(&self) -> &PluginDescriptor {
            &self.descriptor
        }

        fn configuration_page_url(&self) -> String {
            format!("Admin/{}/Configure", self.descriptor.system_name)
        }

        async fn install(&self) -> Result<(), PluginError> {
            self.installs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn uninstall(&self) -> Result<(), PluginError> {
            self.uninstalls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn as_widget(&self) -> Option<&dyn WidgetPlugin> {
            Some(self)
        }
    }

    #[async_trait]
    impl WidgetPlugin for FooterBanner {
        fn widget_zones(&self) -> &[&'static str] {
            &["footer"]
        }

        fn view_component(&self, _widget_zone: &str) -> &'static str {
            "FooterBanner"
        }

        async fn render(&self, _widget_zone: &str, _context: &WidgetContext) -> Result<String, PluginError> {
            Ok(format!("<div>{}</div>", self.descriptor.system_name))
        }
    }

    fn context() -> WidgetContext {
        WidgetContext {
            store: StoreContext::new("store-1", "https://shop.example.com"),
            completed_order: None,
        }
    }

    #[tokio::test]
    async fn test_install_and_uninstall_lifecycle() {
        let store = Arc::new(InMemoryStore::new());
        let banner = Arc::new(FooterBanner::new("Widgets.Banner", 1));
        let mut registry = PluginRegistry::new(store.clone());
        registry.register(banner.clone()).unwrap();

        assert!(!registry.is_installed("Widgets.Banner").await);
        registry.install("widgets.banner").await.unwrap();
        assert!(registry.is_installed("Widgets.Banner").await);
        assert!(matches!(
            registry.install("Widgets.Banner").await,
            Err(PluginError::AlreadyInstalled(_))
        ));

        registry.uninstall("Widgets.Banner").await.unwrap();
        assert!(matches!(
            registry.uninstall("Widgets.Banner").await,
            Err(PluginError::NotInstalled(_))
        ));

        assert_eq!(banner.installs.load(Ordering::SeqCst), 1);
        assert_eq!(banner.uninstalls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_and_duplicate_plugins() {
        let store = Arc::new(InMemoryStore::new());
        let mut registry = PluginRegistry::new(store);
        registry.register(Arc::new(FooterBanner::new("Widgets.Banner", 1))).unwrap();

        assert!(matches!(
            registry.register(Arc::new(FooterBanner::new("WIDGETS.BANNER", 2))),
            Err(PluginError::AlreadyRegistered(_))
        ));
        assert!(matches!(
            registry.install("Widgets.Missing").await,
            Err(PluginError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_only_installed_widgets_render() {
        let store = Arc::new(InMemoryStore::new());
        let mut registry = PluginRegistry::new(store);
        registry.register(Arc::new(FooterBanner::new("Widgets.Second", 2))).unwrap();
        registry.register(Arc::new(FooterBanner::new("Widgets.First", 1))).unwrap();
        registry.register(Arc::new(FooterBanner::new("Widgets.Idle", 0))).unwrap();

        registry.install("Widgets.Second").await.unwrap();
        registry.install("Widgets.First").await.unwrap();

        let rendered = registry.render_zone("footer", &context()).await.unwrap();
        let names: Vec<&str> = rendered.iter().map(|c| c.system_name.as_str()).collect();
        assert_eq!(names, vec!["Widgets.First", "Widgets.Second"]);
        assert_eq!(rendered[0].html, "<div>Widgets.First</div>");

        assert!(registry.render_zone("header", &context()).await.unwrap().is_empty());
        assert_eq!(
            registry.zone_components("FOOTER").await,
            vec![
                ("Widgets.First".to_string(), "FooterBanner".to_string()),
                ("Widgets.Second".to_string(), "FooterBanner".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_installed_set_survives_reload() {
        let store = Arc::new(InMemoryStore::new());

        let mut registry = PluginRegistry::new(store.clone());
        registry.register(Arc::new(FooterBanner::new("Widgets.Banner", 1))).unwrap();
        registry.install("Widgets.Banner").await.unwrap();

        let mut restarted = PluginRegistry::new(store);
        restarted.register(Arc::new(FooterBanner::new("Widgets.Banner", 1))).unwrap();
        assert!(!restarted.is_installed("Widgets.Banner").await);
        restarted.load_installed().await.unwrap();
        assert!(restarted.is_installed("Widgets.Banner").await);

        let infos = restarted.list().await;
        assert_eq!(infos.len(), 1);
        assert!(infos[0].installed);
        assert_eq!(infos[0].configuration_url, "Admin/Widgets.Banner/Configure");
    }

    /// Settings store whose writes can be switched off.
    struct FlakySettings {
        inner: InMemoryStore,
        writes_fail: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl SettingRepository for FlakySettings {
        async fn get_setting(
            &self,
            key: &str,
            store_id: &str,
        ) -> Result<Option<serde_json::Value>, storefront_core::BoxError> {
            self.inner.get_setting(key, store_id).await
        }

        async fn set_setting(
            &self,
            key: &str,
            store_id: &str,
            value: serde_json::Value,
        ) -> Result<(), storefront_core::BoxError> {
            if self.writes_fail.load(Ordering::SeqCst) {
                return Err("db down".into());
            }
            self.inner.set_setting(key, store_id, value).await
        }

        async fn delete_setting(&self, key: &str, store_id: &str) -> Result<bool, storefront_core::BoxError> {
            self.inner.delete_setting(key, store_id).await
        }
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_installed_set_unchanged() {
        let settings = Arc::new(FlakySettings {
            inner: InMemoryStore::new(),
            writes_fail: std::sync::atomic::AtomicBool::new(true),
        });
        let mut registry = PluginRegistry::new(settings.clone());
        registry.register(Arc::new(FooterBanner::new("Widgets.Banner", 1))).unwrap();

        assert!(matches!(
            registry.install("Widgets.Banner").await,
            Err(PluginError::Core(_))
        ));
        assert!(!registry.is_installed("Widgets.Banner").await);
        assert!(registry.render_zone("footer", &context()).await.unwrap().is_empty());

        // retry once storage is back
        settings.writes_fail.store(false, Ordering::SeqCst);
        registry.install("Widgets.Banner").await.unwrap();
        assert!(registry.is_installed("Widgets.Banner").await);

        settings.writes_fail.store(true, Ordering::SeqCst);
        assert!(registry.uninstall("Widgets.Banner").await.is_err());
        assert!(registry.is_installed("Widgets.Banner").await);

        let mut restarted = PluginRegistry::new(settings.clone());
        restarted.register(Arc::new(FooterBanner::new("Widgets.Banner", 1))).unwrap();
        restarted.load_installed().await.unwrap();
        assert!(restarted.is_installed("Widgets.Banner").await);
    }
}
