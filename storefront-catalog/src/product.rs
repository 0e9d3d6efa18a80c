use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a specification attribute value is presented on the product page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecificationAttributeType {
    Option,
    CustomText,
    CustomHtmlText,
    Hyperlink,
}

impl SpecificationAttributeType {
    /// Numeric code used in storage.
    pub fn code(&self) -> i32 {
        match self {
            SpecificationAttributeType::Option => 0,
            SpecificationAttributeType::CustomText => 10,
            SpecificationAttributeType::CustomHtmlText => 20,
            SpecificationAttributeType::Hyperlink => 30,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(SpecificationAttributeType::Option),
            10 => Some(SpecificationAttributeType::CustomText),
            20 => Some(SpecificationAttributeType::CustomHtmlText),
            30 => Some(SpecificationAttributeType::Hyperlink),
            _ => None,
        }
    }
}

/// Links a product to one value of a specification attribute ("Screen size" → "15.6in")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductSpecificationAttribute {
    pub id: String,
    pub attribute_type: SpecificationAttributeType,
    pub specification_attribute_id: String,
    pub specification_attribute_option_id: String,
    pub custom_value: Option<String>,
    pub allow_filtering: bool,
    pub show_on_product_page: bool,
    pub display_order: i32,
}

/// Core product structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub published: bool,
    /// Customers cannot file return requests for this product.
    pub not_returnable: bool,
    pub category_names: Vec<String>,
    pub specification_attributes: Vec<ProductSpecificationAttribute>,
    pub updated_on_utc: DateTime<Utc>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sku: sku.into(),
            published: true,
            not_returnable: false,
            category_names: Vec::new(),
            specification_attributes: Vec::new(),
            updated_on_utc: Utc::now(),
        }
    }

    pub fn specification_attribute(&self, id: &str) -> Option<&ProductSpecificationAttribute> {
        self.specification_attributes.iter().find(|a| a.id == id)
    }

    /// First category the product is listed under, empty if none.
    pub fn primary_category_name(&self) -> &str {
        self.category_names.first().map(String::as_str).unwrap_or("")
    }
}

/// API representation of a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub published: bool,
    pub not_returnable: bool,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            sku: product.sku.clone(),
            published: product.published,
            not_returnable: product.not_returnable,
        }
    }
}

/// API representation of a product specification attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductSpecificationAttributeDto {
    #[serde(default)]
    pub id: String,
    pub attribute_type: SpecificationAttributeType,
    pub specification_attribute_id: String,
    #[serde(default)]
    pub specification_attribute_option_id: String,
    #[serde(default)]
    pub custom_value: Option<String>,
    #[serde(default)]
    pub allow_filtering: bool,
    #[serde(default)]
    pub show_on_product_page: bool,
    #[serde(default)]
    pub display_order: i32,
}

impl From<&ProductSpecificationAttribute> for ProductSpecificationAttributeDto {
    fn from(attr: &ProductSpecificationAttribute) -> Self {
        Self {
            id: attr.id.clone(),
            attribute_type: attr.attribute_type,
            specification_attribute_id: attr.specification_attribute_id.clone(),
            specification_attribute_option_id: attr.specification_attribute_option_id.clone(),
            custom_value: attr.custom_value.clone(),
            allow_filtering: attr.allow_filtering,
            show_on_product_page: attr.show_on_product_page,
            display_order: attr.display_order,
        }
    }
}
