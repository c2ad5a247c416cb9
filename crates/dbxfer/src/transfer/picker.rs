//! Binding configured endpoint references to live endpoints.

use std::sync::Arc;

use crate::config::EndpointConfig;
use crate::context::ExecutionContext;
use crate::core::schema::DatabaseObjectRef;
use crate::core::traits::{TableReader, TableWriter};
use crate::error::Result;

use super::endpoint::{Consumer, Producer, StreamConsumer, StreamProducer, TableConsumer, TableProducer};

/// Turns endpoint references into producers and consumers.
pub trait EndpointPicker {
    fn pick_producer(&self, config: &EndpointConfig) -> Result<Producer>;

    fn pick_consumer(&self, config: &EndpointConfig) -> Result<Consumer>;
}

/// Picker for definitions loaded from configuration.
///
/// Files become stream endpoints. Tables become table endpoints attached to
/// whatever context, reader and writer the picker was given; without them the
/// endpoints are still nameable but cannot move data.
#[derive(Default, Clone)]
pub struct ConfigPicker {
    context: Option<Arc<ExecutionContext>>,
    reader: Option<Arc<dyn TableReader>>,
    writer: Option<Arc<dyn TableWriter>>,
}

impl ConfigPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(mut self, context: Arc<ExecutionContext>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_reader(mut self, reader: Arc<dyn TableReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn with_writer(mut self, writer: Arc<dyn TableWriter>) -> Self {
        self.writer = Some(writer);
        self
    }
}

fn table_object(catalog: &Option<String>, schema: &Option<String>, name: &str) -> DatabaseObjectRef {
    DatabaseObjectRef {
        catalog: catalog.clone(),
        schema: schema.clone(),
        name: name.to_string(),
    }
}

impl EndpointPicker for ConfigPicker {
    fn pick_producer(&self, config: &EndpointConfig) -> Result<Producer> {
        let object = match config {
            EndpointConfig::File { path } => {
                return Ok(Producer::Stream(StreamProducer::new(path.clone())))
            }
            EndpointConfig::Table {
                catalog,
                schema,
                name,
            } => table_object(catalog, schema, name),
        };
        let mut producer = TableProducer::new(object);
        if let Some(context) = &self.context {
            producer = producer.with_context(context.clone());
        }
        if let Some(reader) = &self.reader {
            producer = producer.with_reader(reader.clone());
        }
        Ok(Producer::Table(producer))
    }

    fn pick_consumer(&self, config: &EndpointConfig) -> Result<Consumer> {
        let object = match config {
            EndpointConfig::File { path } => {
                return Ok(Consumer::Stream(StreamConsumer::new(path.clone())))
            }
            EndpointConfig::Table {
                catalog,
                schema,
                name,
            } => table_object(catalog, schema, name),
        };
        let mut consumer = TableConsumer::new(object);
        if let Some(context) = &self.context {
            consumer = consumer.with_context(context.clone());
        }
        if let Some(writer) = &self.writer {
            consumer = consumer.with_writer(writer.clone());
        }
        Ok(Consumer::Table(consumer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::SchemaCache;
    use crate::drivers::{DialectImpl, PostgresDialect};
    use crate::testing::{MemoryTableStore, ScriptedSessionProvider};
    use crate::transfer::EndpointKind;

    #[test]
    fn test_files_become_streams() {
        let picker = ConfigPicker::new();
        let producer = picker.pick_producer(&EndpointConfig::file("orders.csv")).unwrap();
        assert_eq!(producer.kind(), EndpointKind::Stream);
        assert_eq!(producer.object_name().as_deref(), Some("orders.csv"));

        let consumer = picker.pick_consumer(&EndpointConfig::file("out.csv")).unwrap();
        assert_eq!(consumer.kind(), EndpointKind::Stream);
        assert!(consumer.database_object().is_none());
    }

    #[test]
    fn test_tables_carry_picker_attachments() {
        let ctx = Arc::new(ExecutionContext::new(
            Arc::new(ScriptedSessionProvider::new()),
            DialectImpl::Postgres(PostgresDialect::new()),
            Arc::new(SchemaCache::new()),
        ));
        let store = Arc::new(MemoryTableStore::new());
        let picker = ConfigPicker::new()
            .with_context(ctx.clone())
            .with_reader(store.clone())
            .with_writer(store);

        let config = EndpointConfig::Table {
            catalog: None,
            schema: Some("public".to_string()),
            name: "orders".to_string(),
        };
        match picker.pick_producer(&config).unwrap() {
            Producer::Table(p) => {
                assert_eq!(p.object().full_name(), "public.orders");
                assert_eq!(p.context().unwrap().connection_id(), ctx.connection_id());
            }
            other => panic!("unexpected producer {:?}", other),
        }
        match picker.pick_consumer(&config).unwrap() {
            Consumer::Table(c) => assert_eq!(c.object().full_name(), "public.orders"),
            other => panic!("unexpected consumer {:?}", other),
        }
    }
}
