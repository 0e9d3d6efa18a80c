use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use storefront_core::{BoxError, LocalizedProperty};
use storefront_order::{
    ReturnRequest, ReturnRequestAction, ReturnRequestReason, ReturnRequestRepository,
};
use tracing::debug;
use uuid::Uuid;

pub struct StoreReturnRequestRepository {
    pool: PgPool,
}

impl StoreReturnRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Shared row shape of the reason and action lookup tables
#[derive(sqlx::FromRow)]
struct LookupRow {
    id: String,
    name: String,
    display_order: i32,
    locales: Json<Vec<LocalizedProperty>>,
}

impl From<LookupRow> for ReturnRequestReason {
    fn from(row: LookupRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            display_order: row.display_order,
            locales: row.locales.0,
        }
    }
}

impl From<LookupRow> for ReturnRequestAction {
    fn from(row: LookupRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            display_order: row.display_order,
            locales: row.locales.0,
        }
    }
}

#[async_trait]
impl ReturnRequestRepository for StoreReturnRequestRepository {
    async fn insert_return_request(&self, mut request: ReturnRequest) -> Result<ReturnRequest, BoxError> {
        let mut tx = self.pool.begin().await?;

        // Serialize numbering across concurrent submissions
        sqlx::query("LOCK TABLE return_requests IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let next_number: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(return_number), 0) + 1 FROM return_requests",
        )
        .fetch_one(&mut *tx)
        .await?;

        request.id = Uuid::new_v4().simple().to_string();
        request.return_number = next_number;

        sqlx::query(
            r#"
            INSERT INTO return_requests (id, return_number, store_id, order_id, customer_id, customer_comments,
                                         staff_notes, status, pickup_date, pickup_address, created_on_utc, updated_on_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(&request.id)
        .bind(request.return_number)
        .bind(&request.store_id)
        .bind(&request.order_id)
        .bind(&request.customer_id)
        .bind(&request.customer_comments)
        .bind(&request.staff_notes)
        .bind(request.status.as_str())
        .bind(request.pickup_date)
        .bind(Json(&request.pickup_address))
        .bind(request.created_on_utc)
        .bind(request.updated_on_utc)
        .execute(&mut *tx)
        .await?;

        for (position, item) in request.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO return_request_items (return_request_id, position, order_item_id, quantity, reason_for_return, requested_action)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&request.id)
            .bind(position as i32)
            .bind(&item.order_item_id)
            .bind(item.quantity)
            .bind(&item.reason_for_return)
            .bind(&item.requested_action)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!("Stored return request {} as #{}", request.id, request.return_number);

        Ok(request)
    }

    async fn get_return_request_reason_by_id(
        &self,
        id: &str,
    ) -> Result<Option<ReturnRequestReason>, BoxError> {
        let row: Option<LookupRow> = sqlx::query_as(
            "SELECT id, name, display_order, locales FROM return_request_reasons WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ReturnRequestReason::from))
    }

    async fn get_return_request_action_by_id(
        &self,
        id: &str,
    ) -> Result<Option<ReturnRequestAction>, BoxError> {
        let row: Option<LookupRow> = sqlx::query_as(
            "SELECT id, name, display_order, locales FROM return_request_actions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ReturnRequestAction::from))
    }

    async fn get_all_return_request_reasons(&self) -> Result<Vec<ReturnRequestReason>, BoxError> {
        let rows: Vec<LookupRow> = sqlx::query_as(
            "SELECT id, name, display_order, locales FROM return_request_reasons ORDER BY display_order, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ReturnRequestReason::from).collect())
    }

    async fn get_all_return_request_actions(&self) -> Result<Vec<ReturnRequestAction>, BoxError> {
        let rows: Vec<LookupRow> = sqlx::query_as(
            "SELECT id, name, display_order, locales FROM return_request_actions ORDER BY display_order, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ReturnRequestAction::from).collect())
    }
}
