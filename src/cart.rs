//! Cart

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::merchandise::MerchandiseId;

/// Errors related to cart construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// A line was given a quantity of zero (line id).
    #[error("cart line {0} has a quantity of zero")]
    ZeroQuantity(String),
}

/// A single line of a cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    id: String,
    merchandise_id: Option<MerchandiseId>,
    quantity: NonZeroU32,
}

impl CartLine {
    /// Create a new cart line.
    ///
    /// Lines for custom merchandise carry no merchandise id and never match a variant.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `quantity` is zero.
    pub fn new(
        id: impl Into<String>,
        merchandise_id: Option<MerchandiseId>,
        quantity: u32,
    ) -> Result<Self, CartError> {
        let id = id.into();

        let Some(quantity) = NonZeroU32::new(quantity) else {
            return Err(CartError::ZeroQuantity(id));
        };

        Ok(Self {
            id,
            merchandise_id,
            quantity,
        })
    }

    /// Returns the line id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the merchandise id, if the line references one
    pub fn merchandise_id(&self) -> Option<&MerchandiseId> {
        self.merchandise_id.as_ref()
    }

    /// Returns the line quantity
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    /// Whether this line references the given merchandise.
    pub fn is_merchandise(&self, merchandise_id: &MerchandiseId) -> bool {
        self.merchandise_id.as_ref() == Some(merchandise_id)
    }
}

/// Read-only snapshot of a cart at evaluation time
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    subtotal: Decimal,
    currency: Option<&'static Currency>,
    lines: SmallVec<[CartLine; 8]>,
}

impl CartSnapshot {
    /// Create a new cart snapshot with the given subtotal and lines.
    pub fn new(subtotal: Decimal, lines: impl IntoIterator<Item = CartLine>) -> Self {
        Self {
            subtotal,
            currency: None,
            lines: lines.into_iter().collect(),
        }
    }

    /// Attach the cart's currency. Only used for display.
    #[must_use]
    pub fn with_currency(mut self, currency: &'static Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    /// The pre-discount subtotal, in the cart's native currency.
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// The cart's currency, when known.
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }

    /// The subtotal as money, when the currency is known.
    pub fn subtotal_money(&self) -> Option<Money<'static, Currency>> {
        self.currency
            .map(|currency| Money::from_decimal(self.subtotal, currency))
    }

    /// Cart lines, in input order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Iterate over the cart lines in input order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Returns the first line (in input order) that references the given merchandise.
    pub fn first_line_for(&self, merchandise_id: &MerchandiseId) -> Option<&CartLine> {
        self.iter().find(|line| line.is_merchandise(merchandise_id))
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
