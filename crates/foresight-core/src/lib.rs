//! Foresight Core
//!
//! The client-side session for forecasting jobs: the state store, the
//! upload-then-preview ingestion pipeline, the training orchestrator, and the
//! configuration that wires a session to a backend.

pub mod config;
pub mod error;
pub mod session;

pub use config::{ClientConfig, ConfigError, ConfigResult};
pub use error::{SessionError, SessionResult};
pub use session::{CompletedTraining, Dispatch, Session, SessionFlags, SessionSnapshot, SessionStore};
