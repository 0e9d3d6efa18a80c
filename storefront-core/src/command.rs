use async_trait::async_trait;

/// A typed message dispatched to exactly one handler.
pub trait Request: Send + Sync + 'static {
    type Response: Send;
}

#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn handle(&self, request: R) -> Result<R::Response, Self::Error>;
}
