//! Typed client for the store's admin REST backend.
//!
//! Provides the HTTP API wrapper, the session context (token storage and
//! expiry events), configuration, and the form orchestrators that tie the
//! domain drafts from `atelier_core` to the backend.

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod session;
pub mod store;

pub use api::AdminApi;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ErrorKind};
pub use session::{Session, SessionEvent};
