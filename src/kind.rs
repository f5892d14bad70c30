//! Structural Type Tags
//!
//! Collapses runtime value kinds into the categories that matter for
//! reusing a generated type. Nested records and lists of nested records
//! are widened to one generic tag each; scalars keep their exact kind.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::hashing::stable_hash64;
use crate::value::DynamicValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeKind {
    /// Untyped slot: null values and nested records.
    Object,
    /// List of nested records, whatever their own shapes.
    ObjectList,
    Bool,
    Int32,
    Int64,
    UInt64,
    Float64,
    Text,
    DateTime,
    Guid,
    Bytes,
    /// Ordered collection that is not a list of records.
    List,
}

impl TypeKind {
    /// Classify a property value.
    pub fn of(value: &DynamicValue) -> Self {
        match value {
            DynamicValue::Null | DynamicValue::Record(_) => Self::Object,
            DynamicValue::RecordList(_) => Self::ObjectList,
            DynamicValue::Bool(_) => Self::Bool,
            DynamicValue::Int32(_) => Self::Int32,
            DynamicValue::Int64(_) => Self::Int64,
            DynamicValue::UInt64(_) => Self::UInt64,
            DynamicValue::Float64(_) => Self::Float64,
            DynamicValue::Text(_) => Self::Text,
            DynamicValue::DateTime(_) => Self::DateTime,
            DynamicValue::Guid(_) => Self::Guid,
            DynamicValue::Bytes(_) => Self::Bytes,
            DynamicValue::List(_) => Self::List,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::ObjectList => "list<object>",
            Self::Bool => "bool",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            Self::UInt64 => "u64",
            Self::Float64 => "f64",
            Self::Text => "string",
            Self::DateTime => "datetime",
            Self::Guid => "guid",
            Self::Bytes => "bytes",
            Self::List => "list",
        }
    }

    /// Process-independent hash of the tag.
    pub fn stable_hash(self) -> u64 {
        stable_hash64(self.name().as_bytes())
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TypeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DynamicRecord;

    #[test]
    fn test_null_and_record_are_object() {
        assert_eq!(TypeKind::of(&DynamicValue::Null), TypeKind::Object);
        let nested = DynamicValue::Record(DynamicRecord::new().with("x", 1));
        assert_eq!(TypeKind::of(&nested), TypeKind::Object);
    }

    #[test]
    fn test_record_list_ignores_element_shape() {
        let a = DynamicValue::RecordList(vec![DynamicRecord::new().with("x", 1)]);
        let b = DynamicValue::RecordList(vec![DynamicRecord::new().with("y", "z")]);
        assert_eq!(TypeKind::of(&a), TypeKind::ObjectList);
        assert_eq!(TypeKind::of(&a), TypeKind::of(&b));
    }

    #[test]
    fn test_scalars_keep_exact_kind() {
        assert_eq!(TypeKind::of(&1i32.into()), TypeKind::Int32);
        assert_eq!(TypeKind::of(&1i64.into()), TypeKind::Int64);
        assert_ne!(TypeKind::of(&1i32.into()), TypeKind::of(&1i64.into()));
        assert_eq!(TypeKind::of(&"a".into()), TypeKind::Text);
        assert_eq!(TypeKind::of(&uuid::Uuid::new_v4().into()), TypeKind::Guid);
        assert_eq!(TypeKind::of(&chrono::Utc::now().into()), TypeKind::DateTime);
        assert_eq!(TypeKind::of(&DynamicValue::List(vec![])), TypeKind::List);
    }

    #[test]
    fn test_stable_hash_distinct() {
        assert_eq!(TypeKind::Text.stable_hash(), TypeKind::Text.stable_hash());
        assert_ne!(TypeKind::Text.stable_hash(), TypeKind::Object.stable_hash());
    }

    #[test]
    fn test_serializes_as_tag() {
        assert_eq!(serde_json::to_string(&TypeKind::ObjectList).unwrap(), r#""list<object>""#);
    }
}
