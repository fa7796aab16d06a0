//! Storage backend interfaces consumed by the codec
//!
//! The codec owns no storage engine. It needs a hierarchical container whose
//! groups can be created and looked up by key, hold flat typed arrays, and
//! carry named attributes. Backends differ in what an attribute can hold:
//! some store nested mappings natively, others only text. That capability is
//! fixed when a node is constructed and reported through
//! [`AttributeBackend::capability`].

use serde_json::Value;

use crate::array::TypedArray;
use crate::error::Result;
use crate::options::CreationOptions;

/// What a node's attribute store can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeCapability {
    /// Nested mappings, lists, strings and numbers are stored as-is
    Structured,
    /// Only strings are stored; structured values must be serialized
    TextOnly,
}

/// A raw attribute value as held by a backend
#[derive(Debug, Clone, PartialEq)]
pub enum RawAttribute {
    Structured(Value),
    Text(String),
}

/// Named attribute access on a storage node
pub trait AttributeBackend {
    /// Capability this node was constructed with
    fn capability(&self) -> AttributeCapability;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// Text-only backends reject `RawAttribute::Structured`.
    fn set_attribute(&self, key: &str, value: RawAttribute) -> Result<()>;

    /// Fetch the value under `key`, `None` if absent
    fn get_attribute(&self, key: &str) -> Result<Option<RawAttribute>>;

    /// Human-readable location of this node, used in error messages
    fn node_path(&self) -> String;
}

/// A group node in a hierarchical store
///
/// Handles are cheap to clone and share the underlying node, so a child
/// returned by [`Group::require_group`] sees writes made through any other
/// handle. Keys may contain `/` to address nested nodes.
pub trait Group: AttributeBackend + Clone {
    /// Get the child group at `key`, creating it (and any parents) if absent
    fn require_group(&self, key: &str) -> Result<Self>;

    /// Get an existing child group
    fn group(&self, key: &str) -> Result<Self>;

    /// Create or replace the array at `key`
    fn create_array(&self, key: &str, data: &TypedArray, options: &CreationOptions)
        -> Result<()>;

    /// Read a fresh copy of the array at `key`
    fn read_array(&self, key: &str) -> Result<TypedArray>;

    /// Creation options the array at `key` was written with
    fn array_options(&self, key: &str) -> Result<CreationOptions>;

    /// Whether any node exists at `key`
    fn contains(&self, key: &str) -> bool;

    /// Remove the node at `key`; returns whether something was removed
    fn remove(&self, key: &str) -> Result<bool>;

    /// Names of the direct children, sorted
    fn keys(&self) -> Result<Vec<String>>;
}
