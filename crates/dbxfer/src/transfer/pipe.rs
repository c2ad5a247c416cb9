//! A single producer → consumer binding.

use tracing::debug;

use crate::error::{Result, XferError};
use crate::monitor::ProgressMonitor;

use super::endpoint::{Consumer, Producer, TransferOptions, TransferSummary};

const NONE_LABEL: &str = "<none>";

/// One slot of a pipeline: an optional producer and an optional consumer.
///
/// Pipes are created empty and filled in by whoever configures the pipeline.
/// Setting an endpoint never validates it; readiness is checked on demand.
#[derive(Debug, Clone, Default)]
pub struct DataTransferPipe {
    producer: Option<Producer>,
    consumer: Option<Consumer>,
}

impl DataTransferPipe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn producer(&self) -> Option<&Producer> {
        self.producer.as_ref()
    }

    pub fn consumer(&self) -> Option<&Consumer> {
        self.consumer.as_ref()
    }

    pub fn consumer_mut(&mut self) -> Option<&mut Consumer> {
        self.consumer.as_mut()
    }

    /// Replace the producer. `None` unbinds it.
    pub fn set_producer(&mut self, producer: Option<Producer>) {
        self.producer = producer;
    }

    /// Replace the consumer. `None` unbinds it.
    pub fn set_consumer(&mut self, consumer: Option<Consumer>) {
        self.consumer = consumer;
    }

    pub fn clear(&mut self) {
        self.producer = None;
        self.consumer = None;
    }

    /// Both endpoints are present and both name something.
    pub fn is_ready(&self) -> bool {
        let producer_named = self
            .producer
            .as_ref()
            .is_some_and(|p| p.object_name().is_some());
        let consumer_named = self
            .consumer
            .as_ref()
            .is_some_and(|c| c.object_name().is_some());
        producer_named && consumer_named
    }

    /// Source column label: the producer's object name.
    pub fn producer_label(&self) -> String {
        self.producer
            .as_ref()
            .and_then(Producer::object_name)
            .unwrap_or_else(|| NONE_LABEL.to_string())
    }

    /// Target column label: the consumer's database object.
    pub fn consumer_label(&self) -> String {
        self.consumer
            .as_ref()
            .and_then(Consumer::database_object)
            .map(|object| object.full_name())
            .unwrap_or_else(|| NONE_LABEL.to_string())
    }

    /// Run the producer into the consumer.
    ///
    /// # Errors
    ///
    /// `Validation` if the pipe is not ready; otherwise whatever
    /// [`Producer::transfer_data`] reports.
    pub async fn run(&mut self, monitor: &ProgressMonitor, options: &TransferOptions) -> Result<TransferSummary> {
        if !self.is_ready() {
            return Err(XferError::Validation(format!(
                "pipe {} -> {} is not ready",
                self.producer_label(),
                self.consumer_label()
            )));
        }
        let (Some(producer), Some(consumer)) = (&self.producer, &mut self.consumer) else {
            return Err(XferError::Validation("pipe has no endpoints".into()));
        };
        debug!("Running pipe {} -> {:?}", producer.kind(), consumer.object_name());
        producer.transfer_data(monitor, consumer, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::DatabaseObjectRef;
    use crate::core::value::SqlValue;
    use crate::transfer::endpoint::{MemoryConsumer, MemoryProducer, StreamProducer, TableConsumer};

    fn file(path: &str) -> Option<Producer> {
        Some(Producer::Stream(StreamProducer::new(path)))
    }

    fn table(name: &str) -> Option<Consumer> {
        Some(Consumer::Table(TableConsumer::new(DatabaseObjectRef::new(name))))
    }

    #[test]
    fn test_empty_pipe_is_not_ready() {
        let pipe = DataTransferPipe::new();
        assert!(!pipe.is_ready());
        assert_eq!(pipe.producer_label(), "<none>");
        assert_eq!(pipe.consumer_label(), "<none>");
    }

    #[test]
    fn test_producer_only_is_not_ready() {
        let mut pipe = DataTransferPipe::new();
        pipe.set_producer(file("orders.csv"));
        assert!(!pipe.is_ready());
        assert_eq!(pipe.producer_label(), "orders.csv");
    }

    #[test]
    fn test_consumer_only_is_not_ready() {
        let mut pipe = DataTransferPipe::new();
        pipe.set_consumer(table("ORDERS"));
        assert!(!pipe.is_ready());
        assert_eq!(pipe.consumer_label(), "ORDERS");
    }

    #[test]
    fn test_both_named_is_ready() {
        let mut pipe = DataTransferPipe::new();
        pipe.set_producer(file("orders.csv"));
        pipe.set_consumer(table("ORDERS"));
        assert!(pipe.is_ready());
    }

    #[test]
    fn test_unbound_endpoint_is_not_ready() {
        let mut pipe = DataTransferPipe::new();
        pipe.set_producer(Some(Producer::Stream(StreamProducer::unbound())));
        pipe.set_consumer(table("ORDERS"));
        assert!(!pipe.is_ready());

        pipe.set_producer(file("orders.csv"));
        assert!(pipe.is_ready());

        pipe.set_consumer(None);
        assert!(!pipe.is_ready());
    }

    #[test]
    fn test_memory_consumer_has_no_target_label() {
        let mut pipe = DataTransferPipe::new();
        pipe.set_consumer(Some(Consumer::Memory(MemoryConsumer::new("buffer"))));
        assert_eq!(pipe.consumer_label(), "<none>");
    }

    #[tokio::test]
    async fn test_run_unready_pipe_is_validation_error() {
        let mut pipe = DataTransferPipe::new();
        pipe.set_producer(file("orders.csv"));
        let err = pipe
            .run(&ProgressMonitor::new(), &TransferOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, XferError::Validation(_)));
    }

    #[tokio::test]
    async fn test_run_memory_pipe() {
        let mut pipe = DataTransferPipe::new();
        pipe.set_producer(Some(Producer::Memory(MemoryProducer::new(
            "source",
            vec![vec![SqlValue::I64(1)], vec![SqlValue::I64(2)]],
        ))));
        pipe.set_consumer(Some(Consumer::Memory(MemoryConsumer::new("target"))));

        let summary = pipe
            .run(&ProgressMonitor::new(), &TransferOptions::default())
            .await
            .unwrap();
        assert_eq!(summary.rows, 2);
        match pipe.consumer() {
            Some(Consumer::Memory(c)) => assert_eq!(c.rows().len(), 2),
            other => panic!("unexpected consumer {:?}", other),
        }
    }
}
