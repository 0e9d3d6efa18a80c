pub mod models;
pub mod returns;
pub mod form;
pub mod repository;
pub mod notifications;
pub mod submit;

pub use models::{Address, Order, OrderItem, OrderStatus};
pub use returns::{
    ReturnRequest, ReturnRequestAction, ReturnRequestItem, ReturnRequestReason,
    ReturnRequestSettings, ReturnRequestStatus,
};
pub use form::FormCollection;
pub use repository::{OrderRepository, ReturnRequestRepository};
pub use notifications::WorkflowMessageService;
pub use submit::{
    ReturnRequestError, ReturnRequestModel, ReturnRequestSubmitCommand, ReturnRequestSubmitDeps,
    ReturnRequestSubmitHandler,
};
