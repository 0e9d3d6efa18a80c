pub mod plugin;
pub mod registry;
pub mod locale;
pub mod google_analytics;

pub use plugin::{
    CompletedOrder, Plugin, PluginDescriptor, PluginError, TrackedOrderLine, WidgetContext,
    WidgetPlugin,
};
pub use registry::{PluginInfo, PluginRegistry, WidgetContent};
pub use google_analytics::{GoogleAnalyticsDeps, GoogleAnalyticsPlugin, GoogleAnalyticsSettings};
