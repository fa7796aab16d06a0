//! In-memory hierarchical store

use std::sync::Arc;

use binsparse_core::{
    AttributeBackend, AttributeCapability, BinsparseError, CreationOptions, Group, RawAttribute,
    Result, TypedArray,
};
use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::trace;

use super::{join_path, split_key, split_leaf};

#[derive(Debug, Default)]
struct GroupNode {
    attributes: HashMap<String, RawAttribute>,
    children: HashMap<String, Child>,
}

#[derive(Debug)]
enum Child {
    Group(Arc<RwLock<GroupNode>>),
    Array {
        data: TypedArray,
        options: CreationOptions,
    },
}

/// Handle to a group in an in-memory node tree
///
/// Clones share the same node. Every group in a tree has the capability of
/// the root it was created from.
#[derive(Debug, Clone)]
pub struct MemoryGroup {
    node: Arc<RwLock<GroupNode>>,
    path: String,
    capability: AttributeCapability,
}

impl MemoryGroup {
    /// Empty root group with structured attributes
    pub fn new() -> Self {
        Self::with_capability(AttributeCapability::Structured)
    }

    /// Empty root group whose attributes hold text only
    pub fn text_only() -> Self {
        Self::with_capability(AttributeCapability::TextOnly)
    }

    pub fn with_capability(capability: AttributeCapability) -> Self {
        Self {
            node: Arc::new(RwLock::new(GroupNode::default())),
            path: "/".to_string(),
            capability,
        }
    }

    /// Walk `segments` from this group, creating missing groups if asked
    fn descend(&self, segments: &[&str], create: bool) -> Result<Self> {
        let mut node = Arc::clone(&self.node);
        for (depth, segment) in segments.iter().enumerate() {
            let next = {
                let mut guard = node.write();
                if create && !guard.children.contains_key(*segment) {
                    guard
                        .children
                        .insert(segment.to_string(), Child::Group(Arc::default()));
                }
                let next = match guard.children.get(*segment) {
                    Some(Child::Group(group)) => Arc::clone(group),
                    Some(Child::Array { .. }) => {
                        return Err(BinsparseError::NodeKindMismatch {
                            key: join_path(&self.path, &segments[..=depth]),
                            expected: "a group",
                        })
                    }
                    None => {
                        return Err(BinsparseError::NodeNotFound {
                            key: join_path(&self.path, &segments[..=depth]),
                        })
                    }
                };
                next
            };
            node = next;
        }
        Ok(Self {
            node,
            path: join_path(&self.path, segments),
            capability: self.capability,
        })
    }

    fn with_array<R>(&self, key: &str, f: impl FnOnce(&TypedArray, &CreationOptions) -> R) -> Result<R> {
        let (parents, name) = split_leaf(key)?;
        let parent = self.descend(&parents, false)?;
        let guard = parent.node.read();
        match guard.children.get(name) {
            Some(Child::Array { data, options }) => Ok(f(data, options)),
            Some(Child::Group(_)) => Err(BinsparseError::NodeKindMismatch {
                key: join_path(&self.path, &split_key(key)?),
                expected: "an array",
            }),
            None => Err(BinsparseError::NodeNotFound {
                key: join_path(&self.path, &split_key(key)?),
            }),
        }
    }
}

impl Default for MemoryGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeBackend for MemoryGroup {
    fn capability(&self) -> AttributeCapability {
        self.capability
    }

    fn set_attribute(&self, key: &str, value: RawAttribute) -> Result<()> {
        if self.capability == AttributeCapability::TextOnly {
            if let RawAttribute::Structured(_) = value {
                return Err(BinsparseError::UnsupportedAttributeValue {
                    key: key.to_string(),
                });
            }
        }
        trace!(node = %self.path, key, "set attribute");
        self.node.write().attributes.insert(key.to_string(), value);
        Ok(())
    }

    fn get_attribute(&self, key: &str) -> Result<Option<RawAttribute>> {
        Ok(self.node.read().attributes.get(key).cloned())
    }

    fn node_path(&self) -> String {
        self.path.clone()
    }
}

impl Group for MemoryGroup {
    fn require_group(&self, key: &str) -> Result<Self> {
        self.descend(&split_key(key)?, true)
    }

    fn group(&self, key: &str) -> Result<Self> {
        self.descend(&split_key(key)?, false)
    }

    fn create_array(&self, key: &str, data: &TypedArray, options: &CreationOptions) -> Result<()> {
        let (parents, name) = split_leaf(key)?;
        let parent = self.descend(&parents, true)?;
        let mut guard = parent.node.write();
        if let Some(Child::Group(_)) = guard.children.get(name) {
            return Err(BinsparseError::NodeKindMismatch {
                key: join_path(&parent.path, &[name]),
                expected: "an array",
            });
        }
        trace!(
            node = %parent.path,
            name,
            dtype = %data.dtype(),
            len = data.len(),
            "store array"
        );
        guard.children.insert(
            name.to_string(),
            Child::Array {
                data: data.clone(),
                options: options.clone(),
            },
        );
        Ok(())
    }

    fn read_array(&self, key: &str) -> Result<TypedArray> {
        self.with_array(key, |data, _| data.clone())
    }

    fn array_options(&self, key: &str) -> Result<CreationOptions> {
        self.with_array(key, |_, options| options.clone())
    }

    fn contains(&self, key: &str) -> bool {
        let Ok((parents, name)) = split_leaf(key) else {
            return false;
        };
        match self.descend(&parents, false) {
            Ok(parent) => {
                let found = parent.node.read().children.contains_key(name);
                found
            }
            Err(_) => false,
        }
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let (parents, name) = split_leaf(key)?;
        let parent = match self.descend(&parents, false) {
            Ok(parent) => parent,
            Err(BinsparseError::NodeNotFound { .. }) => return Ok(false),
            Err(e) => return Err(e),
        };
        let removed = parent.node.write().children.remove(name).is_some();
        if removed {
            trace!(node = %parent.path, name, "removed child");
        }
        Ok(removed)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.node.read().children.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_groups_share_nodes() {
        let root = MemoryGroup::new();
        let a = root.require_group("a/b").unwrap();
        a.set_attribute("x", RawAttribute::Text("1".into())).unwrap();

        let again = root.group("a").unwrap().group("b").unwrap();
        assert_eq!(again.node_path(), "/a/b");
        assert_eq!(
            again.get_attribute("x").unwrap(),
            Some(RawAttribute::Text("1".into()))
        );
    }

    #[test]
    fn test_arrays() {
        let root = MemoryGroup::new();
        let options = CreationOptions::new().with_chunks(4);
        root.create_array("m/values", &TypedArray::from(vec![1u8, 2]), &options)
            .unwrap();
        assert!(root.contains("m"));
        assert!(root.contains("m/values"));
        assert_eq!(
            root.read_array("m/values").unwrap(),
            TypedArray::from(vec![1u8, 2])
        );
        assert_eq!(root.array_options("m/values").unwrap(), options);
        assert_eq!(root.group("m").unwrap().keys().unwrap(), vec!["values"]);

        root.create_array("m/values", &TypedArray::from(vec![3.0f32]), &CreationOptions::new())
            .unwrap();
        assert_eq!(root.read_array("m/values").unwrap().len(), 1);

        assert!(root.remove("m/values").unwrap());
        assert!(!root.remove("m/values").unwrap());
        assert!(!root.contains("m/values"));
    }

    #[test]
    fn test_missing_nodes() {
        let root = MemoryGroup::new();
        assert!(matches!(
            root.group("nope"),
            Err(BinsparseError::NodeNotFound { key }) if key == "/nope"
        ));
        assert!(matches!(
            root.read_array("nope/values"),
            Err(BinsparseError::NodeNotFound { .. })
        ));
    }

    #[test]
    fn test_kind_mismatch() {
        let root = MemoryGroup::new();
        root.create_array("leaf", &TypedArray::from(vec![1i64]), &CreationOptions::new())
            .unwrap();
        assert!(matches!(
            root.require_group("leaf/child"),
            Err(BinsparseError::NodeKindMismatch { .. })
        ));
        root.require_group("g").unwrap();
        assert!(matches!(
            root.read_array("g"),
            Err(BinsparseError::NodeKindMismatch { .. })
        ));
    }

    #[test]
    fn test_text_only_rejects_structured() {
        let root = MemoryGroup::text_only();
        let child = root.require_group("c").unwrap();
        assert_eq!(child.capability(), AttributeCapability::TextOnly);
        assert!(matches!(
            child.set_attribute("k", RawAttribute::Structured(serde_json::json!({}))),
            Err(BinsparseError::UnsupportedAttributeValue { .. })
        ));
    }
}
