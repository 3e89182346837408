pub mod response;

pub use response::{Acknowledged, ApiResponse, ApiResult, Created};
