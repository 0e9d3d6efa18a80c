use serde::{Deserialize, Serialize};
use storefront_core::Settings;

const DEFAULT_TRACKING_SCRIPT: &str = r#"<!-- Google code for Analytics tracking -->
<script>
var _gaq = _gaq || [];
_gaq.push(['_setAccount', '{GOOGLEID}']);
_gaq.push(['_trackPageview']);
{ECOMMERCE}
(function() {
    var ga = document.createElement('script'); ga.type = 'text/javascript'; ga.async = true;
    ga.src = ('https:' == document.location.protocol ? 'https://ssl' : 'http://www') + '.google-analytics.com/ga.js';
    var s = document.getElementsByTagName('script')[0]; s.parentNode.insertBefore(ga, s);
})();
</script>"#;

const DEFAULT_ECOMMERCE_SCRIPT: &str = r#"_gaq.push(['_addTrans', '{ORDERID}', '{SITE}', '{TOTAL}', '{TAX}', '{SHIP}', '{CITY}', '{STATEPROVINCE}', '{COUNTRY}']);
{DETAILS}
_gaq.push(['_trackTrans']);"#;

const DEFAULT_ECOMMERCE_DETAIL_SCRIPT: &str =
    r#"_gaq.push(['_addItem', '{ORDERID}', '{PRODUCTSKU}', '{PRODUCTNAME}', '{CATEGORYNAME}', '{UNITPRICE}', '{QUANTITY}']);"#;

/// Tracking configuration edited on the plugin's admin page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoogleAnalyticsSettings {
    pub google_id: String,
    /// Page script; `{GOOGLEID}` and `{ECOMMERCE}` are substituted.
    pub tracking_script: String,
    /// Transaction block; replaces `{ECOMMERCE}` on the order-completed page.
    pub ecommerce_script: String,
    /// Per-line block; concatenated into `{DETAILS}`.
    pub ecommerce_detail_script: String,
    /// Report tax-inclusive unit prices and shipping.
    #[serde(default)]
    pub include_tax: bool,
}

impl Default for GoogleAnalyticsSettings {
    fn default() -> Self {
        Self {
            google_id: "UA-0000000-0".to_string(),
            tracking_script: DEFAULT_TRACKING_SCRIPT.to_string(),
            ecommerce_script: DEFAULT_ECOMMERCE_SCRIPT.to_string(),
            ecommerce_detail_script: DEFAULT_ECOMMERCE_DETAIL_SCRIPT.to_string(),
            include_tax: false,
        }
    }
}

impl Settings for GoogleAnalyticsSettings {
    const KEY: &'static str = "googleanalyticsecommercesettings";
}
