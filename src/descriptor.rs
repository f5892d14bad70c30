//! Property Descriptors
//!
//! One property's name plus its structural type tag.

use serde::Serialize;

use crate::error::{Result, ShapeError};
use crate::kind::TypeKind;

/// Immutable `(name, kind)` pair.
///
/// Two descriptors are equal when the names match and the kinds match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PropertyDescriptor {
    name: String,
    kind: TypeKind,
}

impl PropertyDescriptor {
    /// Fails with `InvalidArgument` on an empty name.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ShapeError::invalid("property name must not be empty"));
        }
        Ok(Self { name, kind })
    }

    /// Same as [`new`](Self::new) for callers holding optional parts.
    pub fn from_parts(name: Option<&str>, kind: Option<TypeKind>) -> Result<Self> {
        let name = name.ok_or_else(|| ShapeError::invalid("property name is missing"))?;
        let kind = kind.ok_or_else(|| {
            ShapeError::invalid(format!("property '{}' has no kind", name))
        })?;
        Self::new(name, kind)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }
}
