//! Filesystem store: one directory per node
//!
//! ```text
//! root/
//!   attributes.json          group attributes
//!   matrix/
//!     attributes.json
//!     values/
//!       array.json           {"typestr": "<f8", "length": 10, "options": {...}}
//!       data.bin             little-endian elements
//! ```
//!
//! A directory holding `array.json` is an array, any other directory is a
//! group. Array data is read back through a read-only memory map.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use binsparse_core::{
    AttributeBackend, AttributeCapability, BinsparseError, CreationOptions, Dtype, Group,
    RawAttribute, Result, TypedArray,
};
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

use super::{split_key, split_leaf};

const ATTRIBUTES_FILE: &str = "attributes.json";
const ARRAY_FILE: &str = "array.json";
const DATA_FILE: &str = "data.bin";

/// On-disk descriptor of one array
#[derive(Debug, Serialize, Deserialize)]
struct ArrayDescriptor {
    typestr: String,
    length: usize,
    #[serde(default)]
    options: CreationOptions,
}

/// Handle to a group directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    path: PathBuf,
    capability: AttributeCapability,
}

impl DirectoryStore {
    /// Create the root directory if needed and open it as a group
    pub fn create(path: impl AsRef<Path>, capability: AttributeCapability) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path).map_err(|e| BinsparseError::io(&path, e))?;
        Self::open(path, capability)
    }

    /// Open an existing group directory
    pub fn open(path: impl AsRef<Path>, capability: AttributeCapability) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_dir() {
            return Err(BinsparseError::NodeNotFound {
                key: path.display().to_string(),
            });
        }
        if is_array_dir(&path) {
            return Err(BinsparseError::NodeKindMismatch {
                key: path.display().to_string(),
                expected: "a group",
            });
        }
        Ok(Self { path, capability })
    }

    /// Directory backing this group
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn child_path(&self, segments: &[&str]) -> Result<PathBuf> {
        let mut path = self.path.clone();
        for segment in segments {
            if matches!(*segment, ATTRIBUTES_FILE | ARRAY_FILE | DATA_FILE) {
                return Err(BinsparseError::InvalidKey {
                    key: segments.join("/"),
                    reason: "segment collides with a store file name",
                });
            }
            path.push(segment);
        }
        Ok(path)
    }

    fn child(&self, path: PathBuf) -> Self {
        Self {
            path,
            capability: self.capability,
        }
    }

    /// Walk to the group at `segments`, creating directories if asked
    fn descend(&self, segments: &[&str], create: bool) -> Result<Self> {
        let mut path = self.path.clone();
        for (depth, segment) in segments.iter().enumerate() {
            path = self.child_path(&segments[..=depth])?;
            if path.is_dir() {
                if is_array_dir(&path) {
                    return Err(BinsparseError::NodeKindMismatch {
                        key: path.display().to_string(),
                        expected: "a group",
                    });
                }
            } else if create {
                fs::create_dir(&path).map_err(|e| BinsparseError::io(&path, e))?;
                trace!(path = %path.display(), segment, "created group directory");
            } else {
                return Err(BinsparseError::NodeNotFound {
                    key: path.display().to_string(),
                });
            }
        }
        Ok(self.child(path))
    }

    fn array_dir(&self, key: &str) -> Result<PathBuf> {
        let path = self.child_path(&split_key(key)?)?;
        if !path.is_dir() {
            return Err(BinsparseError::NodeNotFound {
                key: path.display().to_string(),
            });
        }
        if !is_array_dir(&path) {
            return Err(BinsparseError::NodeKindMismatch {
                key: path.display().to_string(),
                expected: "an array",
            });
        }
        Ok(path)
    }

    fn read_descriptor(dir: &Path) -> Result<ArrayDescriptor> {
        let path = dir.join(ARRAY_FILE);
        let text = fs::read_to_string(&path).map_err(|e| BinsparseError::io(&path, e))?;
        Ok(serde_json::from_str(&text)?)
    }

    fn load_attributes(&self) -> Result<Map<String, Value>> {
        let path = self.path.join(ATTRIBUTES_FILE);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(BinsparseError::io(&path, e)),
        }
    }

    fn store_attributes(&self, attributes: &Map<String, Value>) -> Result<()> {
        let path = self.path.join(ATTRIBUTES_FILE);
        let text = serde_json::to_string_pretty(attributes)?;
        fs::write(&path, text).map_err(|e| BinsparseError::io(&path, e))
    }
}

fn is_array_dir(path: &Path) -> bool {
    path.join(ARRAY_FILE).is_file()
}

/// Map `path` read-only and decode it as `length` elements of `dtype`
fn read_data(path: &Path, dtype: Dtype, length: usize) -> Result<TypedArray> {
    let file = File::open(path).map_err(|e| BinsparseError::io(path, e))?;
    let size = file
        .metadata()
        .map_err(|e| BinsparseError::io(path, e))?
        .len();
    let expected = length
        .checked_mul(dtype.size_bytes())
        .ok_or_else(|| BinsparseError::CorruptArray {
            dtype,
            reason: format!("length {length} overflows"),
        })?;
    if size != expected as u64 {
        return Err(BinsparseError::CorruptArray {
            dtype,
            reason: format!("{} holds {size} bytes, descriptor implies {expected}", path.display()),
        });
    }
    // Mapping a zero-length file fails on some platforms
    if size == 0 {
        return Ok(TypedArray::empty(dtype));
    }

    // SAFETY: read-only mapping; the bytes are copied into an owned array
    // before the map is dropped
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| BinsparseError::io(path, e))?;
    TypedArray::from_le_bytes(dtype, &mmap)
}

impl AttributeBackend for DirectoryStore {
    fn capability(&self) -> AttributeCapability {
        self.capability
    }

    fn set_attribute(&self, key: &str, value: RawAttribute) -> Result<()> {
        let value = match (self.capability, value) {
            (_, RawAttribute::Text(text)) => Value::String(text),
            (AttributeCapability::Structured, RawAttribute::Structured(value)) => value,
            (AttributeCapability::TextOnly, RawAttribute::Structured(_)) => {
                return Err(BinsparseError::UnsupportedAttributeValue {
                    key: key.to_string(),
                })
            }
        };
        let mut attributes = self.load_attributes()?;
        attributes.insert(key.to_string(), value);
        self.store_attributes(&attributes)?;
        trace!(path = %self.path.display(), key, "wrote attribute");
        Ok(())
    }

    fn get_attribute(&self, key: &str) -> Result<Option<RawAttribute>> {
        let value = self.load_attributes()?.remove(key);
        Ok(value.map(|value| match (self.capability, value) {
            (AttributeCapability::TextOnly, Value::String(text)) => RawAttribute::Text(text),
            (_, value) => RawAttribute::Structured(value),
        }))
    }

    fn node_path(&self) -> String {
        self.path.display().to_string()
    }
}

impl Group for DirectoryStore {
    fn require_group(&self, key: &str) -> Result<Self> {
        self.descend(&split_key(key)?, true)
    }

    fn group(&self, key: &str) -> Result<Self> {
        self.descend(&split_key(key)?, false)
    }

    fn create_array(&self, key: &str, data: &TypedArray, options: &CreationOptions) -> Result<()> {
        let (parents, name) = split_leaf(key)?;
        let parent = self.descend(&parents, true)?;
        let dir = parent.child_path(&[name])?;
        if dir.is_dir() && !is_array_dir(&dir) {
            return Err(BinsparseError::NodeKindMismatch {
                key: dir.display().to_string(),
                expected: "an array",
            });
        }
        fs::create_dir_all(&dir).map_err(|e| BinsparseError::io(&dir, e))?;

        let data_path = dir.join(DATA_FILE);
        fs::write(&data_path, data.to_le_bytes()).map_err(|e| BinsparseError::io(&data_path, e))?;

        let descriptor = ArrayDescriptor {
            typestr: data.dtype().typestr(),
            length: data.len(),
            options: options.clone(),
        };
        let descriptor_path = dir.join(ARRAY_FILE);
        fs::write(&descriptor_path, serde_json::to_string_pretty(&descriptor)?)
            .map_err(|e| BinsparseError::io(&descriptor_path, e))?;

        trace!(
            path = %dir.display(),
            typestr = %descriptor.typestr,
            len = descriptor.length,
            "wrote array"
        );
        Ok(())
    }

    fn read_array(&self, key: &str) -> Result<TypedArray> {
        let dir = self.array_dir(key)?;
        let descriptor = Self::read_descriptor(&dir)?;
        let dtype = Dtype::from_typestr(&descriptor.typestr)?;
        read_data(&dir.join(DATA_FILE), dtype, descriptor.length)
    }

    fn array_options(&self, key: &str) -> Result<CreationOptions> {
        let dir = self.array_dir(key)?;
        Ok(Self::read_descriptor(&dir)?.options)
    }

    fn contains(&self, key: &str) -> bool {
        match split_key(key).and_then(|segments| self.child_path(&segments)) {
            Ok(path) => path != self.path && path.is_dir(),
            Err(_) => false,
        }
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let (parents, name) = split_leaf(key)?;
        let mut segments = parents;
        segments.push(name);
        let path = self.child_path(&segments)?;
        if !path.is_dir() {
            return Ok(false);
        }
        fs::remove_dir_all(&path).map_err(|e| BinsparseError::io(&path, e))?;
        trace!(path = %path.display(), "removed node");
        Ok(true)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.path).map_err(|e| BinsparseError::io(&self.path, e))?;
        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BinsparseError::io(&self.path, e))?;
            if entry.path().is_dir() {
                keys.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(capability: AttributeCapability) -> (tempfile::TempDir, DirectoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::create(dir.path().join("root"), capability).unwrap();
        (dir, store)
    }

    #[test]
    fn test_array_files() {
        let (_dir, root) = store(AttributeCapability::Structured);
        let options = CreationOptions::new().with_compression("gzip");
        root.create_array("m/indices_1", &TypedArray::from(vec![3i32, 1]), &options)
            .unwrap();

        let array_dir = root.path().join("m").join("indices_1");
        let descriptor: Value =
            serde_json::from_str(&fs::read_to_string(array_dir.join(ARRAY_FILE)).unwrap()).unwrap();
        assert_eq!(
            descriptor,
            json!({"typestr": "<i4", "length": 2, "options": {"compression": "gzip"}})
        );
        assert_eq!(fs::read(array_dir.join(DATA_FILE)).unwrap().len(), 8);

        assert_eq!(
            root.read_array("m/indices_1").unwrap(),
            TypedArray::from(vec![3i32, 1])
        );
        assert_eq!(root.array_options("m/indices_1").unwrap(), options);
        assert_eq!(root.group("m").unwrap().keys().unwrap(), vec!["indices_1"]);
    }

    #[test]
    fn test_empty_array() {
        let (_dir, root) = store(AttributeCapability::Structured);
        root.create_array("e", &TypedArray::empty(Dtype::Bool), &CreationOptions::new())
            .unwrap();
        assert_eq!(root.read_array("e").unwrap(), TypedArray::empty(Dtype::Bool));
    }

    #[test]
    fn test_truncated_data() {
        let (_dir, root) = store(AttributeCapability::Structured);
        root.create_array("v", &TypedArray::from(vec![1.0f64, 2.0]), &CreationOptions::new())
            .unwrap();
        fs::write(root.path().join("v").join(DATA_FILE), [0u8; 12]).unwrap();
        assert!(matches!(
            root.read_array("v"),
            Err(BinsparseError::CorruptArray { dtype: Dtype::Float64, .. })
        ));
    }

    #[test]
    fn test_unsupported_typestr() {
        let (_dir, root) = store(AttributeCapability::Structured);
        root.create_array("c", &TypedArray::from(vec![1.0f32]), &CreationOptions::new())
            .unwrap();
        fs::write(
            root.path().join("c").join(ARRAY_FILE),
            r#"{"typestr": "<c8", "length": 1}"#,
        )
        .unwrap();
        assert!(matches!(
            root.read_array("c"),
            Err(BinsparseError::UnsupportedDtype { .. })
        ));
    }

    #[test]
    fn test_text_only_attributes_are_strings() {
        let (_dir, root) = store(AttributeCapability::TextOnly);
        root.set_attribute("binsparse", RawAttribute::Text("{\"a\":1}".into()))
            .unwrap();
        let on_disk: Value =
            serde_json::from_str(&fs::read_to_string(root.path().join(ATTRIBUTES_FILE)).unwrap())
                .unwrap();
        assert_eq!(on_disk, json!({"binsparse": "{\"a\":1}"}));
        assert!(matches!(
            root.set_attribute("x", RawAttribute::Structured(json!([1]))),
            Err(BinsparseError::UnsupportedAttributeValue { .. })
        ));
    }

    #[test]
    fn test_reopen_sees_nested_groups() {
        let (dir, root) = store(AttributeCapability::Structured);
        root.require_group("a/b")
            .unwrap()
            .set_attribute("k", RawAttribute::Structured(json!({"n": [1, 2]})))
            .unwrap();

        let reopened = DirectoryStore::open(dir.path().join("root"), AttributeCapability::Structured)
            .unwrap();
        assert!(reopened.contains("a/b"));
        assert_eq!(
            reopened.group("a/b").unwrap().get_attribute("k").unwrap(),
            Some(RawAttribute::Structured(json!({"n": [1, 2]})))
        );
        assert!(reopened.remove("a").unwrap());
        assert!(!reopened.contains("a"));
    }

    #[test]
    fn test_reserved_names_rejected() {
        let (_dir, root) = store(AttributeCapability::Structured);
        assert!(matches!(
            root.require_group("attributes.json"),
            Err(BinsparseError::InvalidKey { .. })
        ));
    }
}
