//! Google Analytics tracking widget.
//!
//! Injects the tracking script before `</body>` and, on the order-completed
//! page, the ecommerce transaction block.

mod script;
mod settings;

use std::sync::Arc;

use async_trait::async_trait;
use storefront_core::localization::{LanguageRepository, LocaleResourceRepository};
use storefront_core::settings::{delete_settings, load_settings, save_settings, ALL_STORES};
use storefront_core::SettingRepository;
use tracing::debug;

use crate::locale::{add_or_update_plugin_locale_resource, delete_plugin_locale_resource};
use crate::plugin::{Plugin, PluginDescriptor, PluginError, WidgetContext, WidgetPlugin};

pub use script::render_tracking_script;
pub use settings::GoogleAnalyticsSettings;

pub const SYSTEM_NAME: &str = "Widgets.GoogleAnalytics";
pub const VIEW_COMPONENT: &str = "WidgetsGoogleAnalytics";
pub const WIDGET_ZONES: [&str; 2] = ["body_end_html_tag_before", "clean_body_end_html_tag_before"];

/// Admin labels and hints installed for the configuration page.
pub const LOCALE_RESOURCES: [(&str, &str); 10] = [
    ("Plugins.Widgets.GoogleAnalytics.GoogleId", "ID"),
    ("Plugins.Widgets.GoogleAnalytics.GoogleId.Hint", "Enter Google Analytics ID."),
    ("Plugins.Widgets.GoogleAnalytics.TrackingScript", "Tracking code with {ECOMMERCE} line"),
    (
        "Plugins.Widgets.GoogleAnalytics.TrackingScript.Hint",
        "Paste the tracking code generated by Google Analytics here. {GOOGLEID} and {ECOMMERCE} will be dynamically replaced.",
    ),
    (
        "Plugins.Widgets.GoogleAnalytics.EcommerceScript",
        "Tracking code for {ECOMMERCE} part, with {DETAILS} line",
    ),
    (
        "Plugins.Widgets.GoogleAnalytics.EcommerceScript.Hint",
        "Paste the tracking code generated by Google Analytics here. {ORDERID}, {SITE}, {TOTAL}, {TAX}, {SHIP}, {CITY}, {STATEPROVINCE}, {COUNTRY}, {DETAILS} will be dynamically replaced.",
    ),
    ("Plugins.Widgets.GoogleAnalytics.EcommerceDetailScript", "Tracking code for {DETAILS} part"),
    (
        "Plugins.Widgets.GoogleAnalytics.EcommerceDetailScript.Hint",
        "Paste the tracking code generated by Google Analytics here. {ORDERID}, {PRODUCTSKU}, {PRODUCTNAME}, {CATEGORYNAME}, {UNITPRICE}, {QUANTITY} will be dynamically replaced.",
    ),
    ("Plugins.Widgets.GoogleAnalytics.IncludingTax", "Include tax"),
    (
        "Plugins.Widgets.GoogleAnalytics.IncludingTax.Hint",
        "Check to include tax when generating tracking code for {ECOMMERCE} part.",
    ),
];

#[derive(Clone)]
pub struct GoogleAnalyticsDeps {
    pub settings: Arc<dyn SettingRepository>,
    pub locale_resources: Arc<dyn LocaleResourceRepository>,
    pub languages: Arc<dyn LanguageRepository>,
    /// Base URL of the admin site, ending with `/`.
    pub store_location: String,
}

pub struct GoogleAnalyticsPlugin {
    descriptor: PluginDescriptor,
    deps: GoogleAnalyticsDeps,
}

impl GoogleAnalyticsPlugin {
    pub fn new(deps: GoogleAnalyticsDeps) -> Self {
        Self {
            descriptor: PluginDescriptor {
                system_name: SYSTEM_NAME.to_string(),
                friendly_name: "Google Analytics".to_string(),
                group: "Widgets".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                author: "storefront".to_string(),
                display_order: 1,
            },
            deps,
        }
    }
}

#[async_trait]
impl Plugin for GoogleAnalyticsPlugin {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn configuration_page_url(&self) -> String {
        format!("{}Admin/WidgetsGoogleAnalytics/Configure", self.deps.store_location)
    }

    async fn install(&self) -> Result<(), PluginError> {
        save_settings(
            self.deps.settings.as_ref(),
            ALL_STORES,
            &GoogleAnalyticsSettings::default(),
        )
        .await?;

        for (name, value) in LOCALE_RESOURCES {
            add_or_update_plugin_locale_resource(
                self.deps.locale_resources.as_ref(),
                self.deps.languages.as_ref(),
                name,
                value,
            )
            .await?;
        }
        Ok(())
    }

    async fn uninstall(&self) -> Result<(), PluginError> {
        delete_settings::<GoogleAnalyticsSettings>(self.deps.settings.as_ref(), ALL_STORES).await?;

        for (name, _) in LOCALE_RESOURCES {
            delete_plugin_locale_resource(
                self.deps.locale_resources.as_ref(),
                self.deps.languages.as_ref(),
                name,
            )
            .await?;
        }
        Ok(())
    }

    fn as_widget(&self) -> Option<&dyn WidgetPlugin> {
        Some(self)
    }
}

#[async_trait]
impl WidgetPlugin for GoogleAnalyticsPlugin {
    fn widget_zones(&self) -> &[&'static str] {
        &WIDGET_ZONES
    }

    fn view_component(&self, _widget_zone: &str) -> &'static str {
        VIEW_COMPONENT
    }

    async fn render(&self, _widget_zone: &str, context: &WidgetContext) -> Result<String, PluginError> {
        let settings: Option<GoogleAnalyticsSettings> =
            load_settings(self.deps.settings.as_ref(), &context.store.store_id).await?;

        let Some(settings) = settings else {
            debug!("Google Analytics settings missing for store {}", context.store.store_id);
            return Ok(String::new());
        };

        Ok(render_tracking_script(
            &settings,
            &context.store.store_url,
            context.completed_order.as_ref(),
        ))
    }
}
