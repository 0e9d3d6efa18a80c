pub mod command;
pub mod context;
pub mod localization;
pub mod settings;

pub use command::{Request, RequestHandler};
pub use context::{StoreContext, WorkContext};
pub use localization::{localize, LocalizationService, LocalizationSettings, LocalizedProperty};
pub use settings::{Settings, SettingRepository};

/// Error type returned by every repository seam.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Storage error: {0}")]
    StorageError(BoxError),
    #[error("Setting '{key}' could not be (de)serialized: {source}")]
    SettingFormat {
        key: String,
        source: serde_json::Error,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;
