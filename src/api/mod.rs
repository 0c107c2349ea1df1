//! REST client for the RIG API.

mod client;
mod error;
mod request;

pub use client::ApiClient;
pub use error::{server_detail, ApiError, GENERIC_FAILURE};
pub use request::{collection_path, FetchRequest};
