//! Fixtures
//!
//! Evaluation scenarios described in YAML: raw promotion settings, a cart and
//! the expected decision.

use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::{CartError, CartSnapshot},
    config::{PromotionConfig, RawPromotionConfig, resolve},
    discounts::DiscountDecision,
    fixtures::cart::CartFixture,
};

pub mod cart;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Invalid cart definition
    #[error("Invalid cart: {0}")]
    Cart(#[from] CartError),
}

/// Expected discount in YAML
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExpectedDiscount {
    /// Discounted line id
    pub line: String,

    /// Discounted units
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
struct ScenarioFixture {
    #[serde(default)]
    description: String,

    #[serde(default)]
    config: RawPromotionConfig,

    cart: CartFixture,

    #[serde(default)]
    expected: Option<ExpectedDiscount>,
}

/// A loaded evaluation scenario
#[derive(Debug)]
pub struct Scenario {
    /// Scenario name (file stem)
    pub name: String,

    /// What the scenario exercises
    pub description: String,

    /// Raw settings, as stored
    pub raw_config: RawPromotionConfig,

    /// Resolved settings
    pub config: PromotionConfig,

    /// Cart snapshot
    pub cart: CartSnapshot,

    /// Expected discount, `None` when no discount should apply
    pub expected: Option<ExpectedDiscount>,
}

impl Scenario {
    /// Default directory holding scenario files.
    pub fn default_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join("scenarios")
    }

    /// Load a named scenario from the default directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::load(Self::default_dir(), name)
    }

    /// Load `<dir>/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or describes an invalid cart.
    pub fn load(dir: impl AsRef<Path>, name: &str) -> Result<Self, FixtureError> {
        let file_path = dir.as_ref().join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Self::parse(name, &contents)
    }

    /// Parse a scenario from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or describes an invalid cart.
    pub fn parse(name: &str, contents: &str) -> Result<Self, FixtureError> {
        let fixture: ScenarioFixture = serde_norway::from_str(contents)?;

        Ok(Self {
            name: name.to_string(),
            description: fixture.description,
            config: resolve(&fixture.config),
            raw_config: fixture.config,
            cart: fixture.cart.try_into()?,
            expected: fixture.expected,
        })
    }

    /// Names of every scenario in `dir`, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn names(dir: impl AsRef<Path>) -> Result<Vec<String>, FixtureError> {
        let mut names = Vec::new();

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            if !path.extension().is_some_and(|ext| ext == "yml") {
                continue;
            }

            if let Some(stem) = path.file_stem().and_then(OsStr::to_str) {
                names.push(stem.to_string());
            }
        }

        names.sort();

        Ok(names)
    }

    /// Whether `decision` is the decision this scenario expects.
    pub fn is_expected(&self, decision: &DiscountDecision<'_>) -> bool {
        match (decision.free_gift(), &self.expected) {
            (None, None) => true,
            (Some(gift), Some(expected)) => {
                gift.line_id() == expected.line && gift.quantity().get() == expected.quantity
            }
            _ => false,
        }
    }
}
