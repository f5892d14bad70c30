//! ShapeSig Core - Structural Signatures for Dynamic Records
//!
//! # Contract
//! 1. A signature is the ordered list of `(name, kind)` of a record's properties
//! 2. Nested records and null classify as `object`; lists of records as `list<object>`
//! 3. Equality is positional; the hash is an order-independent XOR fold
//! 4. Equal signatures always hash equal; equal hashes prove nothing
//! 5. Signatures are immutable and safe to share across threads

pub mod error;
pub mod config;
pub mod value;
pub mod record;
pub mod kind;
pub mod descriptor;
pub mod hashing;
pub mod signature;
pub mod cache;

pub use error::ShapeError;
pub use config::{EmptyArrayPolicy, ExtractOptions};
pub use value::DynamicValue;
pub use record::{DynamicRecord, PropertySource};
pub use kind::TypeKind;
pub use descriptor::PropertyDescriptor;
pub use hashing::{name_hash, sha256_hex};
pub use signature::{extract_signature, ShapeSignature};
pub use cache::{CacheStats, TypeCache, TypeGenerator};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
