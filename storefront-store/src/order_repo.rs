use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use storefront_core::BoxError;
use storefront_order::{Address, Order, OrderItem, OrderRepository, OrderStatus};

pub struct StoreOrderRepository {
    pool: PgPool,
}

impl StoreOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: i32,
    store_id: String,
    customer_id: String,
    customer_email: Option<String>,
    customer_language_id: String,
    status: String,
    order_shipping_incl_tax_cents: i64,
    order_shipping_excl_tax_cents: i64,
    order_tax_cents: i64,
    order_total_cents: i64,
    billing_address: Json<Address>,
    created_on_utc: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: String,
    product_id: String,
    quantity: i32,
    unit_price_incl_tax_cents: i64,
    unit_price_excl_tax_cents: i64,
    price_incl_tax_cents: i64,
    price_excl_tax_cents: i64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price_incl_tax_cents: row.unit_price_incl_tax_cents,
            unit_price_excl_tax_cents: row.unit_price_excl_tax_cents,
            price_incl_tax_cents: row.price_incl_tax_cents,
            price_excl_tax_cents: row.price_excl_tax_cents,
        }
    }
}

#[async_trait]
impl OrderRepository for StoreOrderRepository {
    async fn get_order_by_id(&self, id: &str) -> Result<Option<Order>, BoxError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, order_number, store_id, customer_id, customer_email, customer_language_id, status,
                   order_shipping_incl_tax_cents, order_shipping_excl_tax_cents, order_tax_cents,
                   order_total_cents, billing_address, created_on_utc
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items: Vec<OrderItemRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, quantity, unit_price_incl_tax_cents, unit_price_excl_tax_cents,
                   price_incl_tax_cents, price_excl_tax_cents
            FROM order_items
            WHERE order_id = $1
            ORDER BY position, id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let status: OrderStatus = row.status.parse()?;

        Ok(Some(Order {
            id: row.id,
            order_number: row.order_number,
            store_id: row.store_id,
            customer_id: row.customer_id,
            customer_email: row.customer_email,
            customer_language_id: row.customer_language_id,
            status,
            order_shipping_incl_tax_cents: row.order_shipping_incl_tax_cents,
            order_shipping_excl_tax_cents: row.order_shipping_excl_tax_cents,
            order_tax_cents: row.order_tax_cents,
            order_total_cents: row.order_total_cents,
            billing_address: row.billing_address.0,
            items: items.into_iter().map(OrderItem::from).collect(),
            created_on_utc: row.created_on_utc,
        }))
    }
}
