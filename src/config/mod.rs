//! Configuration, credentials and the login session.

mod credentials;
mod loader;
mod session;
mod store;
mod types;

pub use credentials::{bearer_header, CredentialProvider, SecureString, StaticCredentials};
pub use loader::{ConfigError, API_URL_ENV};
pub use session::{SessionError, SessionStore};
pub use store::ConfigStore;
pub use types::{ApiConfig, Config, SessionConfig, ViewConfig, DEFAULT_BASE_URL, MAX_PAGE_SIZE};
