//! Merchandise
//!
//! Product variant identifiers and their canonical merchandise identifier form.

use std::{fmt, num::NonZeroU64, str::FromStr};

use thiserror::Error;

/// Prefix of a canonical product variant merchandise identifier.
pub const VARIANT_GID_PREFIX: &str = "gid://shopify/ProductVariant/";

/// Errors raised while parsing a variant identifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VariantIdError {
    /// The value was empty (or only whitespace).
    #[error("variant id is empty")]
    Empty,

    /// The value was not a base-10 integer.
    #[error("variant id {0:?} is not a base-10 integer")]
    NotAnInteger(String),

    /// The value parsed, but was zero or negative.
    #[error("variant id {0:?} is not positive")]
    NotPositive(String),

    /// The value does not fit in 64 bits.
    #[error("variant id {0:?} is out of range")]
    OutOfRange(String),
}

/// A positive product variant identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantId(NonZeroU64);

impl VariantId {
    /// Create a variant id from a raw integer, returning `None` for zero.
    pub const fn new(id: u64) -> Option<Self> {
        match NonZeroU64::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Returns the raw integer id.
    pub const fn get(self) -> u64 {
        self.0.get()
    }

    /// Returns the canonical merchandise identifier for this variant.
    pub fn gid(self) -> MerchandiseId {
        MerchandiseId(format!("{VARIANT_GID_PREFIX}{}", self.0))
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for VariantId {
    type Err = VariantIdError;

    /// Parses either a bare base-10 id (`"9001"`) or a canonical variant gid
    /// (`"gid://shopify/ProductVariant/9001"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(VariantIdError::Empty);
        }

        let digits = trimmed.strip_prefix(VARIANT_GID_PREFIX).unwrap_or(trimmed);

        let id: i128 = digits
            .parse()
            .map_err(|_err| VariantIdError::NotAnInteger(trimmed.to_string()))?;

        if id <= 0 {
            return Err(VariantIdError::NotPositive(trimmed.to_string()));
        }

        u64::try_from(id)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| VariantIdError::OutOfRange(trimmed.to_string()))
    }
}

/// Opaque merchandise identifier as it appears on a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MerchandiseId(String);

impl MerchandiseId {
    /// Wrap a raw merchandise identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MerchandiseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MerchandiseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MerchandiseId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
