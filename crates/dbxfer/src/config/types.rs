//! Pipeline definition types.

use serde::{Deserialize, Serialize};

use crate::core::schema::DatabaseObjectRef;
use crate::transfer::properties::ProcessorProperties;

/// Root of a YAML pipeline definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineDefinition {
    /// Data processor selection and its properties.
    #[serde(default)]
    pub processor: ProcessorConfig,

    /// Database the table endpoints live in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionConfig>,

    /// Runner behavior.
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Pipes in execution order.
    #[serde(default)]
    pub pipes: Vec<PipeConfig>,
}

/// Processor selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Processor identifier, e.g. "csv".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Opaque processor properties.
    #[serde(default)]
    pub properties: ProcessorProperties,
}

/// Connection the table endpoints resolve against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database type: exasol, postgres or mssql.
    pub db_type: String,

    /// Display label of the connection (default: "Main").
    #[serde(default = "default_label")]
    pub label: String,
}

/// How a pipeline run reacts to a failing pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and run the remaining pipes.
    #[default]
    ContinueOnError,
    /// Stop at the first failing pipe.
    AllOrNothing,
}

/// Runner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Rows per batch (default: 10000).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Batches read ahead of the consumer (default: 4).
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            batch_size: default_batch_size(),
            channel_buffer: default_channel_buffer(),
        }
    }
}

/// One pipe; either endpoint may be left out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<EndpointConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer: Option<EndpointConfig>,
}

/// An endpoint reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EndpointConfig {
    /// A file addressed by path.
    File { path: String },

    /// A table, optionally qualified.
    Table {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        catalog: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<String>,
        name: String,
    },
}

impl EndpointConfig {
    pub fn file(path: impl Into<String>) -> Self {
        EndpointConfig::File { path: path.into() }
    }

    pub fn table(name: impl Into<String>) -> Self {
        EndpointConfig::Table {
            catalog: None,
            schema: None,
            name: name.into(),
        }
    }

    /// The table reference for table endpoints.
    pub fn database_object(&self) -> Option<DatabaseObjectRef> {
        match self {
            EndpointConfig::File { .. } => None,
            EndpointConfig::Table {
                catalog,
                schema,
                name,
            } => Some(DatabaseObjectRef {
                catalog: catalog.clone(),
                schema: schema.clone(),
                name: name.clone(),
            }),
        }
    }
}

fn default_label() -> String {
    "Main".to_string()
}

fn default_batch_size() -> usize {
    10_000
}

fn default_channel_buffer() -> usize {
    4
}
