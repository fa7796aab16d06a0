//! Capability-polymorphic metadata attributes
//!
//! A metadata blob is an arbitrary JSON-like mapping. Nodes with structured
//! attributes store it as-is; text-only nodes get its canonical JSON text and
//! the adapter parses it back on read. Which path is taken depends only on
//! [`AttributeBackend::capability`], never on the caller.

use binsparse_core::{AttributeBackend, AttributeCapability, BinsparseError, RawAttribute, Result};
use serde_json::Value;
use tracing::trace;

/// Reads and writes one named metadata blob on a node
pub trait AttributeAdapter: Sync {
    /// Persist `value` under `key`, replacing any previous value
    fn write(&self, node: &dyn AttributeBackend, key: &str, value: &Value) -> Result<()>;

    /// Fetch the value under `key` with its structure intact
    ///
    /// Fails with `MetadataNotFound` if the node has no such attribute.
    fn read(&self, node: &dyn AttributeBackend, key: &str) -> Result<Value>;
}

/// Adapter for nodes that store structured values natively
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeAttributes;

/// Adapter for nodes that only store text
#[derive(Debug, Clone, Copy, Default)]
pub struct TextAttributes;

impl AttributeAdapter for NativeAttributes {
    fn write(&self, node: &dyn AttributeBackend, key: &str, value: &Value) -> Result<()> {
        node.set_attribute(key, RawAttribute::Structured(value.clone()))
    }

    fn read(&self, node: &dyn AttributeBackend, key: &str) -> Result<Value> {
        match fetch(node, key)? {
            RawAttribute::Structured(value) => Ok(value),
            RawAttribute::Text(text) => Ok(Value::String(text)),
        }
    }
}

impl AttributeAdapter for TextAttributes {
    fn write(&self, node: &dyn AttributeBackend, key: &str, value: &Value) -> Result<()> {
        let text = serde_json::to_string(value)?;
        trace!(node = %node.node_path(), key, bytes = text.len(), "serialized attribute");
        node.set_attribute(key, RawAttribute::Text(text))
    }

    fn read(&self, node: &dyn AttributeBackend, key: &str) -> Result<Value> {
        match fetch(node, key)? {
            RawAttribute::Text(text) | RawAttribute::Structured(Value::String(text)) => {
                Ok(serde_json::from_str(&text)?)
            }
            RawAttribute::Structured(value) => Ok(value),
        }
    }
}

fn fetch(node: &dyn AttributeBackend, key: &str) -> Result<RawAttribute> {
    node.get_attribute(key)?
        .ok_or_else(|| BinsparseError::MetadataNotFound {
            node: node.node_path(),
            key: key.to_string(),
        })
}

/// Adapter matching the node's attribute capability
pub fn adapter_for(node: &dyn AttributeBackend) -> &'static dyn AttributeAdapter {
    match node.capability() {
        AttributeCapability::Structured => &NativeAttributes,
        AttributeCapability::TextOnly => &TextAttributes,
    }
}

/// Write a metadata blob through the node's adapter
pub fn write_metadata(node: &dyn AttributeBackend, key: &str, value: &Value) -> Result<()> {
    adapter_for(node).write(node, key, value)
}

/// Read a metadata blob through the node's adapter
pub fn read_metadata(node: &dyn AttributeBackend, key: &str) -> Result<Value> {
    adapter_for(node).read(node, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryGroup;
    use serde_json::json;

    fn nested() -> Value {
        json!({
            "format": "COO",
            "shape": [0, 12],
            "nested": {"list": [1, 2.5, "x", null, true], "empty": {}}
        })
    }

    #[test]
    fn test_structured_roundtrip() {
        let node = MemoryGroup::new();
        write_metadata(&node, "binsparse", &nested()).unwrap();
        assert_eq!(
            node.get_attribute("binsparse").unwrap(),
            Some(RawAttribute::Structured(nested()))
        );
        assert_eq!(read_metadata(&node, "binsparse").unwrap(), nested());
    }

    #[test]
    fn test_text_roundtrip() {
        let node = MemoryGroup::text_only();
        write_metadata(&node, "binsparse", &nested()).unwrap();
        assert!(matches!(
            node.get_attribute("binsparse").unwrap(),
            Some(RawAttribute::Text(_))
        ));
        assert_eq!(read_metadata(&node, "binsparse").unwrap(), nested());
    }

    #[test]
    fn test_overwrite() {
        let node = MemoryGroup::text_only();
        write_metadata(&node, "k", &json!({"a": 1})).unwrap();
        write_metadata(&node, "k", &json!({"b": [2]})).unwrap();
        assert_eq!(read_metadata(&node, "k").unwrap(), json!({"b": [2]}));
    }

    #[test]
    fn test_missing() {
        let node = MemoryGroup::new();
        let err = read_metadata(&node, "binsparse").unwrap_err();
        assert!(matches!(
            err,
            BinsparseError::MetadataNotFound { key, .. } if key == "binsparse"
        ));
    }

    #[test]
    fn test_text_adapter_accepts_string_value() {
        let node = MemoryGroup::new();
        node.set_attribute("k", RawAttribute::Structured(Value::from("{\"a\": [1]}")))
            .unwrap();
        assert_eq!(TextAttributes.read(&node, "k").unwrap(), json!({"a": [1]}));
    }
}
