//! Datachat - Conversational data analysis client library
//!
//! This library provides the core functionality for the Datachat client:
//! session state, request coordination, chart derivation, and the
//! transports to the analysis backend.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Conversation identity, transcript, and request phase
//! - `coordinator`: Single-flight request lifecycle state machine
//! - `backend`: The request/response seam to the analysis backend
//! - `progress`: Out-of-band SSE progress event channel
//! - `charts`: Descriptor parsing, binning, palettes, and the keyed store
//! - `dataset`: Schema-less row-sets and typed cell extraction
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use datachat::backend::HttpBackend;
//! use datachat::coordinator::RequestCoordinator;
//! use datachat::session::Session;
//! use datachat::Config;
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let session = Arc::new(Mutex::new(Session::new()));
//!     let backend = HttpBackend::new(&config.backend)?;
//!     let coordinator =
//!         RequestCoordinator::new(session, backend, config.display.clone());
//!     coordinator.submit("how many rows are in the dataset?").await?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod charts;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod dataset;
pub mod display;
pub mod error;
pub mod progress;
pub mod session;

// Re-export commonly used types
pub use backend::{AnalysisBackend, ChatRequest, ChatResponse};
pub use charts::{ChartCollection, ChartDescriptor, ChartKind, ChartSpec};
pub use config::Config;
pub use coordinator::{RequestCoordinator, Submission};
pub use error::{DatachatError, Result};
pub use progress::{ProgressChannel, ProgressEvent};
pub use session::{ChatMessage, Role, Session};
