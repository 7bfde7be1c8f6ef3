//! Discounts

use std::num::NonZeroU32;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;

/// Message attached to every free gift discount.
pub const FREE_GIFT_LABEL: &str = "FREE GIFT";

/// Number of units discounted on the gift line.
pub const FREE_GIFT_QUANTITY: NonZeroU32 = NonZeroU32::MIN;

/// A 100%-off adjustment on one unit of a single cart line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeGift<'a> {
    line_id: &'a str,
    quantity: NonZeroU32,
    percentage: Percentage,
    label: &'static str,
}

impl<'a> FreeGift<'a> {
    /// Create a free gift discount targeting the given cart line.
    pub fn new(line_id: &'a str) -> Self {
        Self {
            line_id,
            quantity: FREE_GIFT_QUANTITY,
            percentage: Percentage::from(Decimal::ONE),
            label: FREE_GIFT_LABEL,
        }
    }

    /// The targeted cart line id
    pub fn line_id(&self) -> &'a str {
        self.line_id
    }

    /// Units of the line discounted. Always one, whatever the line quantity.
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    /// Percentage taken off the discounted units.
    pub fn percentage(&self) -> Percentage {
        self.percentage
    }

    /// Message shown alongside the discount.
    pub fn label(&self) -> &'static str {
        self.label
    }
}

/// Outcome of evaluating the promotion against a cart
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiscountDecision<'a> {
    /// The cart does not get the gift for free.
    NoDiscount,

    /// Discount one unit of the gift line.
    ApplyDiscount(FreeGift<'a>),
}

impl<'a> DiscountDecision<'a> {
    /// Returns the free gift discount, if one applies.
    pub fn free_gift(&self) -> Option<&FreeGift<'a>> {
        match self {
            DiscountDecision::ApplyDiscount(gift) => Some(gift),
            DiscountDecision::NoDiscount => None,
        }
    }

    /// Whether a discount applies.
    pub fn is_discount(&self) -> bool {
        self.free_gift().is_some()
    }
}

impl<'a> From<Option<FreeGift<'a>>> for DiscountDecision<'a> {
    fn from(gift: Option<FreeGift<'a>>) -> Self {
        gift.map_or(DiscountDecision::NoDiscount, DiscountDecision::ApplyDiscount)
    }
}

/// Converts a percentage into percentage points (`1.0` becomes `100`).
pub fn percent_points(percentage: Percentage) -> Decimal {
    (percentage * Decimal::ONE) * Decimal::ONE_HUNDRED
}
