use std::sync::Arc;

use storefront_catalog::{ProductRepository, ProductSpecificationDeps, UpdateProductSpecificationHandler};
use storefront_core::localization::{LanguageRepository, LocaleResourceRepository};
use storefront_core::settings::{load_settings, ALL_STORES};
use storefront_core::{LocalizationService, LocalizationSettings, SettingRepository, StoreContext};
use storefront_order::{
    OrderRepository, ReturnRequestRepository, ReturnRequestSettings, ReturnRequestSubmitDeps,
    ReturnRequestSubmitHandler, WorkflowMessageService,
};
use storefront_widgets::{GoogleAnalyticsDeps, GoogleAnalyticsPlugin, PluginError, PluginRegistry};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

/// Storage and messaging adapters the API runs on
#[derive(Clone)]
pub struct Repositories {
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub return_requests: Arc<dyn ReturnRequestRepository>,
    pub settings: Arc<dyn SettingRepository>,
    pub locale_resources: Arc<dyn LocaleResourceRepository>,
    pub languages: Arc<dyn LanguageRepository>,
    pub messages: Arc<dyn WorkflowMessageService>,
}

/// Deployment values taken from configuration
#[derive(Clone)]
pub struct StateOptions {
    pub store: StoreContext,
    pub auth: AuthConfig,
    /// Used until localization settings are saved.
    pub localization: LocalizationSettings,
    /// Used until return request settings are saved.
    pub returns: ReturnRequestSettings,
}

#[derive(Clone)]
pub struct AppState {
    pub store: StoreContext,
    pub auth: AuthConfig,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub return_requests: Arc<dyn ReturnRequestRepository>,
    pub settings: Arc<dyn SettingRepository>,
    pub localization_settings: LocalizationSettings,
    pub return_settings: ReturnRequestSettings,
    pub return_submit: Arc<ReturnRequestSubmitHandler>,
    pub update_specification: Arc<UpdateProductSpecificationHandler>,
    pub plugins: Arc<PluginRegistry>,
}

impl AppState {
    /// Wire handlers and the plugin registry, restoring previously installed plugins.
    pub async fn build(repos: Repositories, options: StateOptions) -> Result<Self, PluginError> {
        let localization_settings: LocalizationSettings =
            load_settings(repos.settings.as_ref(), ALL_STORES)
                .await?
                .unwrap_or(options.localization);

        let return_submit = ReturnRequestSubmitHandler::new(ReturnRequestSubmitDeps {
            products: repos.products.clone(),
            return_requests: repos.return_requests.clone(),
            messages: repos.messages.clone(),
            localization: LocalizationService::new(repos.locale_resources.clone()),
            localization_settings: localization_settings.clone(),
        });

        let update_specification = UpdateProductSpecificationHandler::new(ProductSpecificationDeps {
            products: repos.products.clone(),
        });

        let mut plugins = PluginRegistry::new(repos.settings.clone());
        plugins.register(Arc::new(GoogleAnalyticsPlugin::new(GoogleAnalyticsDeps {
            settings: repos.settings.clone(),
            locale_resources: repos.locale_resources.clone(),
            languages: repos.languages.clone(),
            store_location: options.store.store_url.clone(),
        })))?;
        plugins.load_installed().await?;

        Ok(Self {
            store: options.store,
            auth: options.auth,
            products: repos.products,
            orders: repos.orders,
            return_requests: repos.return_requests,
            settings: repos.settings,
            localization_settings,
            return_settings: options.returns,
            return_submit: Arc::new(return_submit),
            update_specification: Arc::new(update_specification),
            plugins: Arc::new(plugins),
        })
    }
}
