//! The binsparse metadata record
//!
//! Stored under the `"binsparse"` attribute of the group holding a matrix:
//!
//! ```text
//! {
//!   "format": "CSR" | "CSC" | "COO",
//!   "shape": [rows, cols],
//!   "data_types": { "<role_name>": "<dtype_tag>", ... }
//! }
//! ```

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::MatrixFormat;
use crate::dtype::{dtype_of, Dtype};
use crate::error::{BinsparseError, Result};

/// Validated metadata for one stored matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinsparseMetadata {
    /// Declared storage format
    pub format: MatrixFormat,
    /// `(rows, cols)`
    pub shape: (usize, usize),
    /// Dtype per array role, in the format's role order
    pub data_types: Vec<(&'static str, Dtype)>,
}

/// Wire shape of the record, before validation (`format` is read separately)
#[derive(Debug, Deserialize)]
struct WireMetadata {
    shape: Vec<u64>,
    data_types: Map<String, Value>,
}

impl BinsparseMetadata {
    /// Build a record, checking that `data_types` covers exactly the
    /// format's role set
    pub fn new(
        format: MatrixFormat,
        shape: (usize, usize),
        data_types: Vec<(&'static str, Dtype)>,
    ) -> Result<Self> {
        let metadata = Self {
            format,
            shape,
            data_types,
        };
        metadata.check_roles()?;
        Ok(metadata)
    }

    /// Dtype declared for `role`
    pub fn dtype_for(&self, role: &str) -> Option<Dtype> {
        self.data_types
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, dtype)| *dtype)
    }

    /// Structured attribute value for this record
    pub fn to_value(&self) -> Value {
        let data_types: Map<String, Value> = self
            .data_types
            .iter()
            .map(|(role, dtype)| (role.to_string(), Value::from(dtype.tag())))
            .collect();
        json!({
            "format": self.format.tag(),
            "shape": [self.shape.0, self.shape.1],
            "data_types": data_types,
        })
    }

    /// Parse and validate a record read from a storage node
    ///
    /// The format tag is checked first, so metadata written for a layout this
    /// codec does not know fails with `UnrecognizedFormat` rather than a
    /// schema error.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| BinsparseError::invalid_metadata("metadata is not a mapping"))?;

        let format = object
            .get("format")
            .and_then(Value::as_str)
            .ok_or_else(|| BinsparseError::invalid_metadata("missing string field 'format'"))?
            .parse::<MatrixFormat>()?;

        let wire: WireMetadata = serde_json::from_value(value.clone())
            .map_err(|e| BinsparseError::invalid_metadata(e.to_string()))?;

        let shape = match wire.shape.as_slice() {
            [rows, cols] => (to_usize(*rows)?, to_usize(*cols)?),
            other => {
                return Err(BinsparseError::invalid_metadata(format!(
                    "shape must have 2 entries, found {}",
                    other.len()
                )))
            }
        };

        let mut data_types = Vec::with_capacity(3);
        for role in format.roles() {
            let tag = wire.data_types.get(role).ok_or_else(|| {
                BinsparseError::invalid_metadata(format!(
                    "{format} metadata has no data type for role '{role}'"
                ))
            })?;
            let tag = tag.as_str().ok_or_else(|| {
                BinsparseError::invalid_metadata(format!("data type for '{role}' is not a string"))
            })?;
            data_types.push((role, dtype_of(role, tag)?));
        }

        Self::new(format, shape, data_types).and_then(|metadata| {
            match wire
                .data_types
                .keys()
                .find(|key| metadata.dtype_for(key).is_none())
            {
                Some(extra) => Err(BinsparseError::invalid_metadata(format!(
                    "unexpected role '{extra}' for {format}"
                ))),
                None => Ok(metadata),
            }
        })
    }

    fn check_roles(&self) -> Result<()> {
        let expected = self.format.roles();
        if self.data_types.len() != expected.len() {
            return Err(BinsparseError::invalid_metadata(format!(
                "{} expects {} data types, found {}",
                self.format,
                expected.len(),
                self.data_types.len()
            )));
        }
        for role in expected {
            if self.dtype_for(role).is_none() {
                return Err(BinsparseError::invalid_metadata(format!(
                    "{} metadata has no data type for role '{role}'",
                    self.format
                )));
            }
        }
        Ok(())
    }
}

fn to_usize(dim: u64) -> Result<usize> {
    usize::try_from(dim)
        .map_err(|_| BinsparseError::invalid_metadata(format!("dimension {dim} overflows usize")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csr_metadata() -> BinsparseMetadata {
        BinsparseMetadata::new(
            MatrixFormat::Csr,
            (100, 100),
            vec![
                ("pointers_to_1", Dtype::Int32),
                ("indices_1", Dtype::Int32),
                ("values", Dtype::Float64),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_to_value_layout() {
        let value = csr_metadata().to_value();
        assert_eq!(
            value,
            json!({
                "format": "CSR",
                "shape": [100, 100],
                "data_types": {
                    "pointers_to_1": "int32",
                    "indices_1": "int32",
                    "values": "float64"
                }
            })
        );
    }

    #[test]
    fn test_from_value() {
        let metadata = csr_metadata();
        assert_eq!(
            BinsparseMetadata::from_value(&metadata.to_value()).unwrap(),
            metadata
        );
    }

    #[test]
    fn test_unrecognized_format_wins() {
        let value = json!({"format": "DIA", "shape": [3, 3], "data_types": {"offsets": "int64"}});
        assert!(matches!(
            BinsparseMetadata::from_value(&value),
            Err(BinsparseError::UnrecognizedFormat { format }) if format == "DIA"
        ));
    }

    #[test]
    fn test_missing_role() {
        let value = json!({
            "format": "COO",
            "shape": [3, 3],
            "data_types": {"indices_0": "int64", "values": "float32"}
        });
        assert!(matches!(
            BinsparseMetadata::from_value(&value),
            Err(BinsparseError::InvalidMetadata { .. })
        ));
    }

    #[test]
    fn test_extra_role() {
        let value = json!({
            "format": "COO",
            "shape": [3, 3],
            "data_types": {
                "indices_0": "int64",
                "indices_1": "int64",
                "values": "float32",
                "pointers_to_1": "int64"
            }
        });
        assert!(matches!(
            BinsparseMetadata::from_value(&value),
            Err(BinsparseError::InvalidMetadata { .. })
        ));
    }

    #[test]
    fn test_unknown_dtype_tag() {
        let value = json!({
            "format": "CSC",
            "shape": [3, 3],
            "data_types": {
                "pointers_to_1": "int64",
                "indices_1": "int64",
                "values": "complex64"
            }
        });
        assert!(matches!(
            BinsparseMetadata::from_value(&value),
            Err(BinsparseError::UnknownDtypeTag { role, .. }) if role == "values"
        ));
    }

    #[test]
    fn test_bad_shape() {
        for shape in [json!([3]), json!([3, -1]), json!([1, 2, 3]), json!("3x3")] {
            let value = json!({
                "format": "CSR",
                "shape": shape,
                "data_types": {
                    "pointers_to_1": "int64",
                    "indices_1": "int64",
                    "values": "int8"
                }
            });
            assert!(matches!(
                BinsparseMetadata::from_value(&value),
                Err(BinsparseError::InvalidMetadata { .. })
            ));
        }
    }

    #[test]
    fn test_empty_shape_allowed() {
        let metadata = BinsparseMetadata::new(
            MatrixFormat::Coo,
            (0, 0),
            vec![
                ("indices_0", Dtype::Int64),
                ("indices_1", Dtype::Int64),
                ("values", Dtype::Bool),
            ],
        )
        .unwrap();
        let parsed = BinsparseMetadata::from_value(&metadata.to_value()).unwrap();
        assert_eq!(parsed.shape, (0, 0));
        assert_eq!(parsed.dtype_for("values"), Some(Dtype::Bool));
    }

    #[test]
    fn test_not_a_mapping() {
        assert!(matches!(
            BinsparseMetadata::from_value(&json!("{\"format\": \"CSR\"}")),
            Err(BinsparseError::InvalidMetadata { .. })
        ));
    }
}
