pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod nav;
pub mod routes;
pub mod session;
pub mod types;

pub use api::ApiClient;
pub use error::{ClientError, StorageError};
pub use routes::{Navigation, Route, Router};
pub use session::{SessionProvider, StorageSessionProvider};
pub use types::{Role, Session, UserRecord};

#[cfg(test)]
pub mod testing;
