//! Promotion Configuration
//!
//! Resolves the raw, stringly-typed shop settings into a [`PromotionConfig`].
//!
//! Resolution never fails. Anything that cannot be interpreted is recorded as a
//! [`ConfigIssue`] and leaves the configuration inactive, so a bad setting can
//! only ever switch the promotion off.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::{
    amounts::parse_decimal,
    merchandise::{VariantId, VariantIdError},
};

/// Settings key holding the gift product variant id.
pub const GIFT_VARIANT_ID_KEY: &str = "gift_variant_id";

/// Settings key holding the spending threshold.
pub const THRESHOLD_KEY: &str = "threshold";

/// Settings key holding the optional enabled flag.
pub const ENABLED_KEY: &str = "enabled";

/// Raw promotion settings, as read from the settings store.
///
/// Keys map to string values, or to nothing when a setting exists but is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RawPromotionConfig(FxHashMap<String, Option<String>>);

impl RawPromotionConfig {
    /// Create an empty set of raw settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning the updated settings.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a value.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        self.0.insert(key.into(), value.map(Into::into));
    }

    /// Returns the value for `key`, treating unset and missing alike.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Option::as_deref)
    }

    /// Whether no settings are present at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for RawPromotionConfig
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.map(Into::into)))
                .collect(),
        )
    }
}

/// Problems found while resolving raw settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    /// No gift variant id was configured.
    #[error("gift variant id is not set")]
    MissingGiftVariant,

    /// The gift variant id could not be interpreted.
    #[error("invalid gift variant id: {0}")]
    InvalidGiftVariant(#[from] VariantIdError),

    /// No threshold was configured.
    #[error("threshold is not set")]
    MissingThreshold,

    /// The threshold is not a decimal number.
    #[error("threshold {0:?} is not a decimal number")]
    InvalidThreshold(String),

    /// The threshold is below zero.
    #[error("threshold {0} is negative")]
    NegativeThreshold(Decimal),

    /// The enabled flag is not a recognised boolean.
    #[error("enabled flag {0:?} is not a recognised boolean")]
    InvalidEnabled(String),
}

/// Spending threshold a cart subtotal must reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// A valid, non-negative amount.
    Amount(Decimal),

    /// The configured threshold could not be used.
    Invalid,
}

impl Threshold {
    /// Create a threshold from an amount, rejecting negative values.
    pub fn new(amount: Decimal) -> Self {
        if amount.is_sign_negative() && !amount.is_zero() {
            Threshold::Invalid
        } else {
            Threshold::Amount(amount)
        }
    }

    /// Returns the amount, if valid.
    pub fn amount(self) -> Option<Decimal> {
        match self {
            Threshold::Amount(amount) => Some(amount),
            Threshold::Invalid => None,
        }
    }

    /// Whether `subtotal` reaches this threshold. The boundary is inclusive.
    pub fn is_met_by(self, subtotal: Decimal) -> bool {
        match self {
            Threshold::Amount(amount) => subtotal >= amount,
            Threshold::Invalid => false,
        }
    }
}

/// Decision-ready promotion configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionConfig {
    gift_variant: Option<VariantId>,
    threshold: Threshold,
    enabled: bool,
    issues: SmallVec<[ConfigIssue; 2]>,
}

impl PromotionConfig {
    /// Create an enabled configuration from already-typed values.
    pub fn new(gift_variant: VariantId, amount: Decimal) -> Self {
        let threshold = Threshold::new(amount);

        let mut issues = SmallVec::new();

        if threshold == Threshold::Invalid {
            issues.push(ConfigIssue::NegativeThreshold(amount));
        }

        Self {
            gift_variant: Some(gift_variant),
            threshold,
            enabled: true,
            issues,
        }
    }

    /// Set the enabled flag, returning the updated configuration.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The configured gift variant, if one could be resolved.
    pub fn gift_variant(&self) -> Option<VariantId> {
        self.gift_variant
    }

    /// The configured spending threshold.
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Whether the merchant has the promotion switched on.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Problems found while resolving this configuration.
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }

    /// Returns the gift variant and threshold amount when the promotion is
    /// enabled and fully configured.
    pub fn active(&self) -> Option<(VariantId, Decimal)> {
        if !self.enabled {
            return None;
        }

        Some((self.gift_variant?, self.threshold.amount()?))
    }

    /// Whether the promotion is enabled and fully configured.
    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }
}

/// Resolve raw settings into a [`PromotionConfig`].
#[instrument(level = "debug", skip_all)]
pub fn resolve(raw: &RawPromotionConfig) -> PromotionConfig {
    let mut issues = SmallVec::new();

    let gift_variant = match non_blank(raw.get(GIFT_VARIANT_ID_KEY)) {
        None => {
            issues.push(ConfigIssue::MissingGiftVariant);
            None
        }
        Some(value) => match value.parse::<VariantId>() {
            Ok(id) => Some(id),
            Err(err) => {
                issues.push(ConfigIssue::from(err));
                None
            }
        },
    };

    let threshold = match non_blank(raw.get(THRESHOLD_KEY)) {
        None => {
            issues.push(ConfigIssue::MissingThreshold);
            Threshold::Invalid
        }
        Some(value) => match parse_decimal(value) {
            None => {
                issues.push(ConfigIssue::InvalidThreshold(value.to_string()));
                Threshold::Invalid
            }
            Some(amount) => {
                let threshold = Threshold::new(amount);

                if threshold == Threshold::Invalid {
                    issues.push(ConfigIssue::NegativeThreshold(amount));
                }

                threshold
            }
        },
    };

    let enabled = match non_blank(raw.get(ENABLED_KEY)) {
        None => true,
        Some(value) => parse_flag(value).unwrap_or_else(|| {
            issues.push(ConfigIssue::InvalidEnabled(value.to_string()));
            false
        }),
    };

    for issue in &issues {
        warn!(%issue, "free gift promotion is misconfigured");
    }

    let config = PromotionConfig {
        gift_variant,
        threshold,
        enabled,
        issues,
    };

    debug!(
        gift_variant = ?config.gift_variant,
        threshold = ?config.threshold,
        enabled = config.enabled,
        active = config.is_active(),
        "resolved free gift promotion"
    );

    config
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
