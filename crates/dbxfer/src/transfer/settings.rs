//! Pipeline-wide transfer settings.

use super::pipe::DataTransferPipe;
use super::properties::ProcessorProperties;

/// Ordered pipes plus the processor configuration they share.
#[derive(Debug, Clone, Default)]
pub struct DataTransferSettings {
    pipes: Vec<DataTransferPipe>,
    processor_id: Option<String>,
    properties: ProcessorProperties,
}

impl DataTransferSettings {
    /// Settings with `pipe_count` empty pipes.
    pub fn new(pipe_count: usize) -> Self {
        Self {
            pipes: vec![DataTransferPipe::default(); pipe_count],
            ..Default::default()
        }
    }

    /// Replace the pipe sequence with `pipe_count` empty pipes.
    pub fn reset(&mut self, pipe_count: usize) {
        self.pipes = vec![DataTransferPipe::default(); pipe_count];
    }

    pub fn pipes(&self) -> &[DataTransferPipe] {
        &self.pipes
    }

    pub fn pipes_mut(&mut self) -> &mut [DataTransferPipe] {
        &mut self.pipes
    }

    pub fn pipe_mut(&mut self, index: usize) -> Option<&mut DataTransferPipe> {
        self.pipes.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// Whether every pipe is ready. An empty pipeline is complete.
    pub fn is_complete(&self) -> bool {
        self.pipes.iter().all(DataTransferPipe::is_ready)
    }

    /// Indices of the pipes that are not ready, in order.
    pub fn unready_pipes(&self) -> Vec<usize> {
        self.pipes
            .iter()
            .enumerate()
            .filter(|(_, pipe)| !pipe.is_ready())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn processor_id(&self) -> Option<&str> {
        self.processor_id.as_deref()
    }

    pub fn set_processor_id(&mut self, id: Option<String>) {
        self.processor_id = id;
    }

    pub fn properties(&self) -> &ProcessorProperties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut ProcessorProperties {
        &mut self.properties
    }

    pub fn set_properties(&mut self, properties: ProcessorProperties) {
        self.properties = properties;
    }

    /// File chooser patterns for stream endpoints.
    pub fn file_patterns(&self) -> Vec<String> {
        self.properties.file_patterns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::DatabaseObjectRef;
    use crate::transfer::endpoint::{Consumer, Producer, StreamProducer, TableConsumer};
    use crate::transfer::properties::EXTENSION_PROPERTY;

    #[test]
    fn test_empty_settings_are_complete() {
        let settings = DataTransferSettings::new(0);
        assert!(settings.is_complete());
        assert!(settings.unready_pipes().is_empty());
    }

    #[test]
    fn test_two_pipe_readiness() {
        let mut settings = DataTransferSettings::new(2);
        {
            let first = settings.pipe_mut(0).unwrap();
            first.set_producer(Some(Producer::Stream(StreamProducer::new("orders.csv"))));
            first.set_consumer(Some(Consumer::Table(TableConsumer::new(
                DatabaseObjectRef::new("ORDERS"),
            ))));
        }
        settings
            .pipe_mut(1)
            .unwrap()
            .set_consumer(Some(Consumer::Table(TableConsumer::new(
                DatabaseObjectRef::new("ORDER_ITEMS"),
            ))));

        assert!(!settings.is_complete());
        assert_eq!(settings.unready_pipes(), vec![1]);

        settings
            .pipe_mut(1)
            .unwrap()
            .set_producer(Some(Producer::Stream(StreamProducer::new("order_items.csv"))));
        assert!(settings.is_complete());
    }

    #[test]
    fn test_reset_replaces_pipes() {
        let mut settings = DataTransferSettings::new(1);
        settings
            .pipe_mut(0)
            .unwrap()
            .set_producer(Some(Producer::Stream(StreamProducer::new("a.csv"))));
        settings.reset(3);
        assert_eq!(settings.len(), 3);
        assert!(settings.pipes().iter().all(|p| p.producer().is_none()));
        assert_eq!(settings.unready_pipes(), vec![0, 1, 2]);
    }

    #[test]
    fn test_properties_drive_file_patterns() {
        let mut settings = DataTransferSettings::new(1);
        settings.properties_mut().set(EXTENSION_PROPERTY, "csv");
        assert_eq!(settings.file_patterns(), vec!["*.csv", "*"]);
    }
}
