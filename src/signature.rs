//! Shape Signatures - Cache Keys for Generated Types
//!
//! A signature is the ordered list of [`PropertyDescriptor`]s of one record
//! plus a hash computed once at construction.
//!
//! # Hash vs. equality
//!
//! The hash is an XOR fold of `name_hash ^ kind_hash` over all descriptors,
//! so it ignores property order. Equality is positional. Two signatures that
//! differ only in property order are NOT equal but usually share a hash, so
//! any map keyed by signatures must confirm a hash match with `==`
//! (`HashMap` does).

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::config::ExtractOptions;
use crate::descriptor::PropertyDescriptor;
use crate::error::Result;
use crate::hashing::{name_hash, sha256_hex};
use crate::kind::TypeKind;
use crate::record::{DynamicRecord, PropertySource};

#[derive(Debug, Clone)]
pub struct ShapeSignature {
    properties: Box<[PropertyDescriptor]>,
    hash: u64,
}

impl ShapeSignature {
    /// Build from already-classified descriptors.
    pub fn new(properties: impl IntoIterator<Item = PropertyDescriptor>) -> Self {
        let properties: Box<[PropertyDescriptor]> = properties.into_iter().collect();
        let hash = properties
            .iter()
            .fold(0u64, |acc, p| acc ^ name_hash(p.name()) ^ p.kind().stable_hash());
        Self { properties, hash }
    }

    /// Walk a record's properties in native order and classify each value.
    pub fn extract<S: PropertySource + ?Sized>(source: &S) -> Result<Self> {
        let properties = source
            .properties()
            .map(|(name, value)| PropertyDescriptor::new(name, TypeKind::of(value)))
            .collect::<Result<Vec<_>>>()?;
        let signature = Self::new(properties);
        debug!(
            properties = signature.len(),
            hash = signature.hash,
            "extracted shape signature"
        );
        Ok(signature)
    }

    /// Extract from a JSON object. Any other JSON value is `InvalidArgument`.
    pub fn from_json(value: &Value) -> Result<Self> {
        Self::from_json_with(value, &ExtractOptions::default())
    }

    pub fn from_json_with(value: &Value, options: &ExtractOptions) -> Result<Self> {
        let record = DynamicRecord::from_json_with(value, options)?;
        Self::extract(&record)
    }

    /// Read-only view in source order.
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// The precomputed, order-independent hash.
    pub fn hash_value(&self) -> u64 {
        self.hash
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Order-sensitive SHA-256 hex digest of the descriptor list.
    ///
    /// Unlike [`hash_value`](Self::hash_value) this agrees with equality in
    /// both directions (up to SHA-256 collisions), so it is usable as a
    /// stable name seed for generated types.
    pub fn fingerprint(&self) -> String {
        let mut buf = Vec::new();
        for p in self.properties.iter() {
            buf.extend_from_slice(&(p.name().len() as u64).to_le_bytes());
            buf.extend_from_slice(p.name().as_bytes());
            buf.extend_from_slice(p.kind().name().as_bytes());
            buf.push(0);
        }
        sha256_hex(&buf)
    }
}

impl PartialEq for ShapeSignature {
    fn eq(&self, other: &Self) -> bool {
        // Slice equality: same length, then descriptor-by-descriptor.
        self.properties[..] == other.properties[..]
    }
}

impl Eq for ShapeSignature {}

impl Hash for ShapeSignature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Display for ShapeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, p) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", p.name(), p.kind())?;
        }
        f.write_str(")")
    }
}

impl Serialize for ShapeSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ShapeSignature", 3)?;
        state.serialize_field("fingerprint", &self.fingerprint())?;
        state.serialize_field("hash", &self.hash)?;
        state.serialize_field("properties", &self.properties)?;
        state.end()
    }
}

/// Shape of a dynamic record.
pub fn extract_signature<S: PropertySource + ?Sized>(source: &S) -> Result<ShapeSignature> {
    ShapeSignature::extract(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::DynamicValue;
    use std::collections::HashMap;

    fn descriptor(name: &str, kind: TypeKind) -> PropertyDescriptor {
        PropertyDescriptor::new(name, kind).unwrap()
    }

    #[test]
    fn test_empty_signature() {
        let sig = ShapeSignature::new(Vec::new());
        assert!(sig.is_empty());
        assert_eq!(sig.hash_value(), 0);
        assert_eq!(sig, ShapeSignature::extract(&DynamicRecord::new()).unwrap());
    }

    #[test]
    fn test_hash_is_xor_fold() {
        let sig = ShapeSignature::new(vec![
            descriptor("id", TypeKind::Int32),
            descriptor("name", TypeKind::Text),
        ]);
        let expected = name_hash("id")
            ^ TypeKind::Int32.stable_hash()
            ^ name_hash("name")
            ^ TypeKind::Text.stable_hash();
        assert_eq!(sig.hash_value(), expected);
    }

    #[test]
    fn test_extract_matches_new() {
        let record = DynamicRecord::new().with("id", 1).with("child", DynamicRecord::new());
        let extracted = ShapeSignature::extract(&record).unwrap();
        let built = ShapeSignature::new(vec![
            descriptor("id", TypeKind::Int32),
            descriptor("child", TypeKind::Object),
        ]);
        assert_eq!(extracted, built);
        assert_eq!(extracted.hash_value(), built.hash_value());
    }

    #[test]
    fn test_extract_rejects_empty_name() {
        let record = DynamicRecord::new().with("", 1);
        assert!(ShapeSignature::extract(&record).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_different_length_not_equal() {
        let a = ShapeSignature::new(vec![descriptor("id", TypeKind::Int32)]);
        let b = ShapeSignature::new(vec![
            descriptor("id", TypeKind::Int32),
            descriptor("x", TypeKind::Object),
        ]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_is_order_sensitive() {
        let a = ShapeSignature::new(vec![descriptor("a", TypeKind::Int32), descriptor("b", TypeKind::Text)]);
        let b = ShapeSignature::new(vec![descriptor("b", TypeKind::Text), descriptor("a", TypeKind::Int32)]);
        assert_eq!(a.hash_value(), b.hash_value());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
    }

    #[test]
    fn test_hash_map_separates_reordered_keys() {
        let a = ShapeSignature::new(vec![descriptor("a", TypeKind::Int32), descriptor("b", TypeKind::Text)]);
        let b = ShapeSignature::new(vec![descriptor("b", TypeKind::Text), descriptor("a", TypeKind::Int32)]);
        let mut map = HashMap::new();
        map.insert(a, 1);
        map.insert(b, 2);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_display() {
        let record = DynamicRecord::new().with("id", 1i64).with("tags", DynamicValue::Null);
        let sig = extract_signature(&record).unwrap();
        assert_eq!(sig.to_string(), "(id: i64, tags: object)");
    }

    #[test]
    fn test_serialize_shape() {
        let sig = ShapeSignature::new(vec![descriptor("id", TypeKind::Int32)]);
        let v = serde_json::to_value(&sig).unwrap();
        assert_eq!(v["properties"][0]["name"], "id");
        assert_eq!(v["properties"][0]["kind"], "i32");
        assert_eq!(v["fingerprint"], sig.fingerprint());
    }

    #[test]
    fn test_from_json_non_object() {
        let err = ShapeSignature::from_json(&serde_json::json!(42)).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
