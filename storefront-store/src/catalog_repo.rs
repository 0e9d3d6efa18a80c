use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storefront_catalog::{
    Product, ProductRepository, ProductSpecificationAttribute, SpecificationAttributeType,
};
use storefront_core::BoxError;

pub struct StoreProductRepository {
    pool: PgPool,
}

impl StoreProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    sku: String,
    published: bool,
    not_returnable: bool,
    category_names: Vec<String>,
    updated_on_utc: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct SpecificationAttributeRow {
    id: String,
    attribute_type: i32,
    specification_attribute_id: String,
    specification_attribute_option_id: String,
    custom_value: Option<String>,
    allow_filtering: bool,
    show_on_product_page: bool,
    display_order: i32,
}

impl TryFrom<SpecificationAttributeRow> for ProductSpecificationAttribute {
    type Error = BoxError;

    fn try_from(row: SpecificationAttributeRow) -> Result<Self, Self::Error> {
        let attribute_type = SpecificationAttributeType::from_code(row.attribute_type)
            .ok_or_else(|| format!("unknown specification attribute type {}", row.attribute_type))?;

        Ok(Self {
            id: row.id,
            attribute_type,
            specification_attribute_id: row.specification_attribute_id,
            specification_attribute_option_id: row.specification_attribute_option_id,
            custom_value: row.custom_value,
            allow_filtering: row.allow_filtering,
            show_on_product_page: row.show_on_product_page,
            display_order: row.display_order,
        })
    }
}

#[async_trait]
impl ProductRepository for StoreProductRepository {
    async fn get_product_by_id(&self, id: &str) -> Result<Option<Product>, BoxError> {
        let row: Option<ProductRow> = sqlx::query_as(
            "SELECT id, name, sku, published, not_returnable, category_names, updated_on_utc FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let attribute_rows: Vec<SpecificationAttributeRow> = sqlx::query_as(
            r#"
            SELECT id, attribute_type, specification_attribute_id, specification_attribute_option_id,
                   custom_value, allow_filtering, show_on_product_page, display_order
            FROM product_specification_attributes
            WHERE product_id = $1
            ORDER BY display_order, id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let specification_attributes = attribute_rows
            .into_iter()
            .map(ProductSpecificationAttribute::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Product {
            id: row.id,
            name: row.name,
            sku: row.sku,
            published: row.published,
            not_returnable: row.not_returnable,
            category_names: row.category_names,
            specification_attributes,
            updated_on_utc: row.updated_on_utc,
        }))
    }

    async fn update_product_specification_attribute(
        &self,
        product_id: &str,
        attribute: &ProductSpecificationAttribute,
    ) -> Result<(), BoxError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE product_specification_attributes
            SET attribute_type = $1,
                specification_attribute_id = $2,
                specification_attribute_option_id = $3,
                custom_value = $4,
                allow_filtering = $5,
                show_on_product_page = $6,
                display_order = $7
            WHERE id = $8 AND product_id = $9
            "#,
        )
        .bind(attribute.attribute_type.code())
        .bind(&attribute.specification_attribute_id)
        .bind(&attribute.specification_attribute_option_id)
        .bind(&attribute.custom_value)
        .bind(attribute.allow_filtering)
        .bind(attribute.show_on_product_page)
        .bind(attribute.display_order)
        .bind(&attribute.id)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(format!(
                "specification attribute {} not found on product {}",
                attribute.id, product_id
            )
            .into());
        }

        sqlx::query("UPDATE products SET updated_on_utc = NOW() WHERE id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
