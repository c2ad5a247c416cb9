//! # dbxfer
//!
//! Execution-context and data-transfer plumbing for database tools.
//!
//! This library provides:
//!
//! - **Execution contexts** tracking a connection's default catalog and schema,
//!   with change notifications
//! - **Namespace dialects** for Exasol, PostgreSQL and SQL Server
//! - **Transfer pipes** binding producers to consumers, with readiness checks
//! - **Pipeline runs** over bounded channels with cancellation and per-pipe
//!   failure reporting
//! - **YAML pipeline definitions** with validation
//!
//! ## Example
//!
//! ```rust,no_run
//! use dbxfer::{ConfigPicker, PipelineDefinition, PipelineRunner, ProgressMonitor};
//!
//! #[tokio::main]
//! async fn main() -> dbxfer::Result<()> {
//!     let def = PipelineDefinition::load("pipeline.yaml")?;
//!     let mut settings = def.build_settings(&ConfigPicker::new())?;
//!     let report = PipelineRunner::new(def.runner.clone())
//!         .run(&mut settings, &ProgressMonitor::new())
//!         .await?;
//!     println!("{}", report.stats.summary());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod core;
pub mod drivers;
pub mod error;
pub mod monitor;
pub mod pipeline;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transfer;

// Re-exports for convenient access
pub use config::{EndpointConfig, FailurePolicy, PipelineDefinition, RunnerConfig};
pub use context::{ConnectionId, DefaultsChange, DefaultsListener, ExecutionContext, NamespaceKind};
pub use crate::core::{CatalogRef, DatabaseObjectRef, SchemaCache, SchemaRef, SchemaResolver};
pub use drivers::DialectImpl;
pub use error::{Result, XferError};
pub use monitor::ProgressMonitor;
pub use pipeline::{PipelineReport, PipelineRunner, PipelineStats};
pub use session::{ExecutionPurpose, Session, SessionProvider};
pub use transfer::{
    ConfigPicker, Consumer, DataTransferPipe, DataTransferSettings, EndpointPicker,
    ProcessorProperties, Producer,
};
