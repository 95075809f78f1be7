pub mod client;
pub mod endpoint;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
