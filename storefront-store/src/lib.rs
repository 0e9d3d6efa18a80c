pub mod app_config;
pub mod database;
pub mod events;
pub mod notifications;
pub mod catalog_repo;
pub mod order_repo;
pub mod return_request_repo;
pub mod setting_repo;
pub mod locale_repo;
pub mod memory;

pub use database::DbClient;
pub use events::{EventProducer, EventSink, RecordingEventSink};
pub use notifications::EventWorkflowMessageService;
pub use catalog_repo::StoreProductRepository;
pub use order_repo::StoreOrderRepository;
pub use return_request_repo::StoreReturnRequestRepository;
pub use setting_repo::StoreSettingRepository;
pub use locale_repo::{StoreLanguageRepository, StoreLocaleResourceRepository};
pub use memory::InMemoryStore;
