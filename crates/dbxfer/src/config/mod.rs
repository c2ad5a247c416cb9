//! Pipeline definition loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use crate::transfer::{DataTransferSettings, EndpointPicker};
use sha2::{Digest, Sha256};
use std::path::Path;

impl PipelineDefinition {
    /// Load a definition from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a definition from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let def: PipelineDefinition = serde_yaml::from_str(yaml)?;
        def.validate()?;
        Ok(def)
    }

    /// Validate the definition.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// SHA256 of the normalized definition, for change detection.
    pub fn hash(&self) -> String {
        let yaml = serde_yaml::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(yaml.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Build settings with one pipe per configured pipe, bound by `picker`.
    pub fn build_settings(&self, picker: &dyn EndpointPicker) -> Result<DataTransferSettings> {
        let mut settings = DataTransferSettings::new(self.pipes.len());
        settings.set_processor_id(self.processor.id.clone());
        settings.set_properties(self.processor.properties.clone());

        for (pipe, config) in settings.pipes_mut().iter_mut().zip(&self.pipes) {
            if let Some(producer) = &config.producer {
                pipe.set_producer(Some(picker.pick_producer(producer)?));
            }
            if let Some(consumer) = &config.consumer {
                pipe.set_consumer(Some(picker.pick_consumer(consumer)?));
            }
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::ConfigPicker;

    const TWO_PIPES: &str = r#"
processor:
  id: csv
  properties:
    extension: "csv,txt"
    delimiter: ","
runner:
  failure_policy: all_or_nothing
  batch_size: 500
pipes:
  - producer: { kind: file, path: orders.csv }
    consumer: { kind: table, schema: SALES, name: ORDERS }
  - consumer: { kind: table, name: ORDER_ITEMS }
"#;

    #[test]
    fn test_from_yaml() {
        let def = PipelineDefinition::from_yaml(TWO_PIPES).unwrap();
        assert_eq!(def.processor.id.as_deref(), Some("csv"));
        assert_eq!(def.runner.failure_policy, FailurePolicy::AllOrNothing);
        assert_eq!(def.runner.batch_size, 500);
        assert_eq!(def.runner.channel_buffer, 4);
        assert_eq!(def.pipes.len(), 2);
        assert!(def.pipes[1].producer.is_none());
    }

    #[test]
    fn test_invalid_yaml_is_rejected() {
        assert!(PipelineDefinition::from_yaml("pipes: [ { producer: { kind: socket } } ]").is_err());
        assert!(PipelineDefinition::from_yaml("runner: { batch_size: 0 }").is_err());
    }

    #[test]
    fn test_hash_tracks_content() {
        let a = PipelineDefinition::from_yaml(TWO_PIPES).unwrap();
        let b = PipelineDefinition::from_yaml(TWO_PIPES).unwrap();
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.hash().len(), 64);

        let mut c = b.clone();
        c.runner.batch_size = 501;
        assert_ne!(a.hash(), c.hash());
    }

    #[test]
    fn test_build_settings() {
        let def = PipelineDefinition::from_yaml(TWO_PIPES).unwrap();
        let settings = def.build_settings(&ConfigPicker::new()).unwrap();

        assert_eq!(settings.len(), 2);
        assert_eq!(settings.processor_id(), Some("csv"));
        assert_eq!(settings.file_patterns(), vec!["*.csv", "*.txt", "*"]);
        assert!(!settings.is_complete());
        assert_eq!(settings.unready_pipes(), vec![1]);
        assert_eq!(settings.pipes()[0].producer_label(), "orders.csv");
        assert_eq!(settings.pipes()[0].consumer_label(), "SALES.ORDERS");
        assert_eq!(settings.pipes()[1].producer_label(), "<none>");
        assert_eq!(settings.properties().get_string("delimiter"), ",");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yaml");
        std::fs::write(&path, TWO_PIPES).unwrap();
        let def = PipelineDefinition::load(&path).unwrap();
        assert_eq!(def.pipes.len(), 2);

        assert!(PipelineDefinition::load(dir.path().join("missing.yaml")).is_err());
    }
}
