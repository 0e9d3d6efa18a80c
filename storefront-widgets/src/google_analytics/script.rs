use crate::plugin::CompletedOrder;

use super::settings::GoogleAnalyticsSettings;

/// Build the page script, with the ecommerce block when an order was just completed.
pub fn render_tracking_script(
    settings: &GoogleAnalyticsSettings,
    store_url: &str,
    completed_order: Option<&CompletedOrder>,
) -> String {
    let ecommerce = completed_order
        .map(|order| render_ecommerce_script(settings, store_url, order))
        .unwrap_or_default();

    settings
        .tracking_script
        .replace("{GOOGLEID}", &settings.google_id)
        .replace("{ECOMMERCE}", &ecommerce)
}

fn render_ecommerce_script(
    settings: &GoogleAnalyticsSettings,
    store_url: &str,
    completed: &CompletedOrder,
) -> String {
    let order = &completed.order;
    let order_id = order.order_number.to_string();
    let address = &order.billing_address;
    let shipping = if settings.include_tax {
        order.order_shipping_incl_tax_cents
    } else {
        order.order_shipping_excl_tax_cents
    };

    let details: String = completed
        .lines
        .iter()
        .map(|line| {
            let unit_price = if settings.include_tax {
                line.unit_price_incl_tax_cents
            } else {
                line.unit_price_excl_tax_cents
            };
            settings
                .ecommerce_detail_script
                .replace("{ORDERID}", &order_id)
                .replace("{PRODUCTSKU}", &escape_js(&line.sku))
                .replace("{PRODUCTNAME}", &escape_js(&line.product_name))
                .replace("{CATEGORYNAME}", &escape_js(&line.category_name))
                .replace("{UNITPRICE}", &format_amount(unit_price))
                .replace("{QUANTITY}", &line.quantity.to_string())
        })
        .collect();

    settings
        .ecommerce_script
        .replace("{ORDERID}", &order_id)
        .replace("{SITE}", &site_name(store_url))
        .replace("{TOTAL}", &format_amount(order.order_total_cents))
        .replace("{TAX}", &format_amount(order.order_tax_cents))
        .replace("{SHIP}", &format_amount(shipping))
        .replace("{CITY}", &escape_js(address.city.as_deref().unwrap_or("")))
        .replace(
            "{STATEPROVINCE}",
            &escape_js(address.state_province.as_deref().unwrap_or("")),
        )
        .replace("{COUNTRY}", &escape_js(address.country.as_deref().unwrap_or("")))
        .replace("{DETAILS}", &details)
}

/// `1234` cents → `"12.34"`.
fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Values land inside single-quoted JS strings.
fn escape_js(text: &str) -> String {
    text.replace('\'', "\\'")
}

/// Host part of the store URL: scheme and slashes removed.
fn site_name(store_url: &str) -> String {
    store_url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .replace('/', "")
}
