use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storefront_catalog::Product;
use storefront_core::{BoxError, CoreError, StoreContext};
use storefront_order::Order;

/// Static metadata describing a plugin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginDescriptor {
    /// Stable identifier, e.g. `Widgets.GoogleAnalytics`.
    pub system_name: String,
    pub friendly_name: String,
    pub group: String,
    pub version: String,
    pub author: String,
    pub display_order: i32,
}

/// Lifecycle capabilities every plugin offers
#[async_trait]
pub trait Plugin: Send + Sync {
    fn descriptor(&self) -> &PluginDescriptor;

    /// Admin page where the plugin is configured.
    fn configuration_page_url(&self) -> String;

    async fn install(&self) -> Result<(), PluginError>;

    async fn uninstall(&self) -> Result<(), PluginError>;

    /// Widget capability, if the plugin renders into widget zones.
    fn as_widget(&self) -> Option<&dyn WidgetPlugin> {
        None
    }
}

/// A plugin that contributes markup to named widget zones
#[async_trait]
pub trait WidgetPlugin: Send + Sync {
    fn widget_zones(&self) -> &[&'static str];

    /// View component rendering this plugin in `widget_zone`.
    fn view_component(&self, widget_zone: &str) -> &'static str;

    async fn render(&self, widget_zone: &str, context: &WidgetContext) -> Result<String, PluginError>;
}

/// What a widget knows about the page being rendered
#[derive(Debug, Clone)]
pub struct WidgetContext {
    pub store: StoreContext,
    /// Set on the checkout-completed page.
    pub completed_order: Option<CompletedOrder>,
}

#[derive(Debug, Clone)]
pub struct CompletedOrder {
    pub order: Order,
    pub lines: Vec<TrackedOrderLine>,
}

/// Order line joined with the catalog data trackers report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedOrderLine {
    pub sku: String,
    pub product_name: String,
    pub category_name: String,
    pub quantity: i32,
    pub unit_price_incl_tax_cents: i64,
    pub unit_price_excl_tax_cents: i64,
}

impl CompletedOrder {
    /// Lines whose product is missing from `products` are reported with empty catalog fields.
    pub fn new(order: Order, products: &HashMap<String, Product>) -> Self {
        let lines = order
            .items
            .iter()
            .map(|item| {
                let product = products.get(&item.product_id);
                TrackedOrderLine {
                    sku: product.map(|p| p.sku.clone()).unwrap_or_default(),
                    product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
                    category_name: product
                        .map(|p| p.primary_category_name().to_string())
                        .unwrap_or_default(),
                    quantity: item.quantity,
                    unit_price_incl_tax_cents: item.unit_price_incl_tax_cents,
                    unit_price_excl_tax_cents: item.unit_price_excl_tax_cents,
                }
            })
            .collect();

        Self { order, lines }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Plugin not found: {0}")]
    NotFound(String),

    #[error("Plugin already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Plugin already installed: {0}")]
    AlreadyInstalled(String),

    #[error("Plugin not installed: {0}")]
    NotInstalled(String),

    #[error("Plugin storage failed: {0}")]
    Storage(BoxError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
