//! Backend pass-through options for array creation

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque array creation options handed to the storage backend unchanged
///
/// The codec never interprets these; chunking and compression policy belong
/// to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreationOptions {
    entries: Map<String, Value>,
}

impl CreationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary option
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Set the `chunks` option
    pub fn with_chunks(self, chunk_len: usize) -> Self {
        self.with_option("chunks", chunk_len)
    }

    /// Set the `compression` option
    pub fn with_compression(self, codec: impl Into<String>) -> Self {
        self.with_option("compression", codec.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = CreationOptions::new()
            .with_chunks(1024)
            .with_compression("gzip")
            .with_option("compression_opts", 4);
        assert_eq!(options.get("chunks"), Some(&Value::from(1024)));
        assert_eq!(options.get("compression"), Some(&Value::from("gzip")));
        assert_eq!(options.iter().count(), 3);
        assert!(CreationOptions::default().is_empty());
    }

    #[test]
    fn test_serializes_as_plain_mapping() {
        let options = CreationOptions::new().with_chunks(8);
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({"chunks": 8})
        );
    }
}
