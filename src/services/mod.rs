pub mod error;
pub mod listing_service;
pub mod user_service;

pub use error::ServiceError;
pub use listing_service::ListingService;
pub use user_service::UserService;
