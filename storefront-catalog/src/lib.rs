pub mod product;
pub mod repository;
pub mod specification;

pub use product::{
    Product, ProductDto, ProductSpecificationAttribute, ProductSpecificationAttributeDto,
    SpecificationAttributeType,
};
pub use repository::ProductRepository;
pub use specification::{
    CatalogError, ProductSpecificationDeps, UpdateProductSpecificationCommand,
    UpdateProductSpecificationHandler,
};
