//! Pipeline definition validation.

use super::{EndpointConfig, PipelineDefinition};
use crate::core::identifier::validate_identifier;
use crate::drivers::DialectImpl;
use crate::error::{Result, XferError};

/// Validate the definition. Partially configured pipes are allowed.
pub fn validate(def: &PipelineDefinition) -> Result<()> {
    if let Some(id) = &def.processor.id {
        if id.trim().is_empty() {
            return Err(XferError::Config("processor.id must not be empty".into()));
        }
    }

    if let Some(connection) = &def.connection {
        DialectImpl::from_db_type(&connection.db_type)?;
    }

    if def.runner.batch_size == 0 {
        return Err(XferError::Config("runner.batch_size must be at least 1".into()));
    }
    if def.runner.channel_buffer == 0 {
        return Err(XferError::Config(
            "runner.channel_buffer must be at least 1".into(),
        ));
    }

    for (index, pipe) in def.pipes.iter().enumerate() {
        if let Some(producer) = &pipe.producer {
            validate_endpoint(producer, &format!("pipes[{}].producer", index))?;
        }
        if let Some(consumer) = &pipe.consumer {
            validate_endpoint(consumer, &format!("pipes[{}].consumer", index))?;
        }
    }

    Ok(())
}

fn validate_endpoint(endpoint: &EndpointConfig, path: &str) -> Result<()> {
    match endpoint {
        EndpointConfig::File { path: file } => {
            if file.trim().is_empty() {
                return Err(XferError::Config(format!("{}.path is required", path)));
            }
        }
        EndpointConfig::Table {
            catalog,
            schema,
            name,
        } => {
            let parts = [
                ("catalog", catalog.as_deref()),
                ("schema", schema.as_deref()),
                ("name", Some(name.as_str())),
            ];
            for (field, value) in parts {
                if let Some(value) = value {
                    validate_identifier(value)
                        .map_err(|e| XferError::Config(format!("{}.{}: {}", path, field, e)))?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConnectionConfig, PipeConfig};

    fn valid_definition() -> PipelineDefinition {
        let mut def = PipelineDefinition::default();
        def.pipes.push(PipeConfig {
            producer: Some(EndpointConfig::file("orders.csv")),
            consumer: Some(EndpointConfig::table("ORDERS")),
        });
        def
    }

    #[test]
    fn test_valid_definition() {
        assert!(validate(&valid_definition()).is_ok());
    }

    #[test]
    fn test_partial_pipe_is_valid() {
        let mut def = valid_definition();
        def.pipes.push(PipeConfig {
            producer: None,
            consumer: Some(EndpointConfig::table("ORDER_ITEMS")),
        });
        assert!(validate(&def).is_ok());
    }

    #[test]
    fn test_empty_file_path() {
        let mut def = valid_definition();
        def.pipes[0].producer = Some(EndpointConfig::file("  "));
        let err = validate(&def).unwrap_err();
        assert!(err.to_string().contains("pipes[0].producer.path"));
    }

    #[test]
    fn test_empty_table_name() {
        let mut def = valid_definition();
        def.pipes[0].consumer = Some(EndpointConfig::table(""));
        let err = validate(&def).unwrap_err();
        assert!(err.to_string().contains("pipes[0].consumer.name"));
    }

    #[test]
    fn test_zero_batch_size() {
        let mut def = valid_definition();
        def.runner.batch_size = 0;
        assert!(validate(&def).is_err());
    }

    #[test]
    fn test_zero_channel_buffer() {
        let mut def = valid_definition();
        def.runner.channel_buffer = 0;
        assert!(validate(&def).is_err());
    }

    #[test]
    fn test_unknown_db_type() {
        let mut def = valid_definition();
        def.connection = Some(ConnectionConfig {
            db_type: "oracle".to_string(),
            label: "Main".to_string(),
        });
        assert!(validate(&def).is_err());

        def.connection = Some(ConnectionConfig {
            db_type: "exasol".to_string(),
            label: "Main".to_string(),
        });
        assert!(validate(&def).is_ok());
    }
}
