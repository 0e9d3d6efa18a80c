use async_trait::async_trait;
use sqlx::PgPool;
use storefront_core::localization::{
    Language, LanguageRepository, LocaleResourceRepository, LocaleStringResource,
};
use storefront_core::BoxError;

#[derive(sqlx::FromRow)]
struct LanguageRow {
    id: String,
    name: String,
    language_culture: String,
    unique_seo_code: String,
    published: bool,
    display_order: i32,
}

#[derive(sqlx::FromRow)]
struct ResourceRow {
    id: String,
    language_id: String,
    resource_name: String,
    resource_value: String,
}

pub struct StoreLanguageRepository {
    pool: PgPool,
}

impl StoreLanguageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LanguageRepository for StoreLanguageRepository {
    async fn get_all_languages(&self, show_hidden: bool) -> Result<Vec<Language>, BoxError> {
        let rows: Vec<LanguageRow> = sqlx::query_as(
            r#"
            SELECT id, name, language_culture, unique_seo_code, published, display_order
            FROM languages
            WHERE published OR $1
            ORDER BY display_order, name
            "#,
        )
        .bind(show_hidden)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Language {
                id: r.id,
                name: r.name,
                language_culture: r.language_culture,
                unique_seo_code: r.unique_seo_code,
                published: r.published,
                display_order: r.display_order,
            })
            .collect())
    }
}

pub struct StoreLocaleResourceRepository {
    pool: PgPool,
}

impl StoreLocaleResourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocaleResourceRepository for StoreLocaleResourceRepository {
    async fn get_resource(
        &self,
        resource_name: &str,
        language_id: &str,
    ) -> Result<Option<LocaleStringResource>, BoxError> {
        let row: Option<ResourceRow> = sqlx::query_as(
            r#"
            SELECT id, language_id, resource_name, resource_value
            FROM locale_string_resources
            WHERE language_id = $1 AND lower(resource_name) = lower($2)
            "#,
        )
        .bind(language_id)
        .bind(resource_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| LocaleStringResource {
            id: r.id,
            language_id: r.language_id,
            resource_name: r.resource_name,
            resource_value: r.resource_value,
        }))
    }

    async fn insert_resource(&self, resource: &LocaleStringResource) -> Result<(), BoxError> {
        sqlx::query(
            r#"
            INSERT INTO locale_string_resources (id, language_id, resource_name, resource_value)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&resource.id)
        .bind(&resource.language_id)
        .bind(&resource.resource_name)
        .bind(&resource.resource_value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_resource(&self, resource: &LocaleStringResource) -> Result<(), BoxError> {
        sqlx::query(
            "UPDATE locale_string_resources SET resource_name = $1, resource_value = $2 WHERE id = $3",
        )
        .bind(&resource.resource_name)
        .bind(&resource.resource_value)
        .bind(&resource.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_resource(&self, id: &str) -> Result<(), BoxError> {
        sqlx::query("DELETE FROM locale_string_resources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
