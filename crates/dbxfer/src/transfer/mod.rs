//! Pipes, endpoints and pipeline-wide transfer settings.
//!
//! A [`DataTransferSettings`] owns an ordered list of [`DataTransferPipe`]s.
//! Each pipe binds an optional [`Producer`] to an optional [`Consumer`]; a
//! pipe is ready once both endpoints are present and named, and the settings
//! are complete once every pipe is ready.
//!
//! ```text
//! settings ──┬── pipe 0: Stream("orders.csv")  ─▶ Table(SALES.ORDERS)
//!            └── pipe 1: <none>                ─▶ Table(ORDER_ITEMS)
//! ```
//!
//! Endpoints are bound from configuration through an [`EndpointPicker`].

pub mod endpoint;
pub mod picker;
pub mod pipe;
pub mod properties;
pub mod settings;

pub use endpoint::{
    Consumer, EndpointKind, MemoryConsumer, MemoryProducer, Producer, StreamConsumer,
    StreamProducer, TableConsumer, TableProducer, TransferOptions, TransferSummary,
};
pub use picker::{ConfigPicker, EndpointPicker};
pub use pipe::DataTransferPipe;
pub use properties::{ProcessorProperties, PropertyValue, EXTENSION_PROPERTY};
pub use settings::DataTransferSettings;
