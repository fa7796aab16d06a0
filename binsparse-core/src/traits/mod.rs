//! Abstract interfaces for the binsparse codec
//!
//! Element typing for arrays and the storage collaborator interfaces. Pure
//! interfaces; implementations live in the `binsparse` crate.

pub mod element;
pub mod storage;

pub use element::{Element, IndexElement};
pub use storage::{AttributeBackend, AttributeCapability, Group, RawAttribute};
