//! Free Gift Evaluation
//!
//! Decides, for one cart snapshot, whether the configured gift is free and
//! which line carries the discount. Checks run in order and stop at the first
//! miss:
//!
//! 1. the promotion is enabled and fully configured,
//! 2. the subtotal reaches the threshold (inclusive),
//! 3. the gift variant is already on a cart line.
//!
//! The first matching line wins when the gift appears on several lines. Only
//! one unit of that line is discounted.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    cart::CartSnapshot,
    config::PromotionConfig,
    discounts::{DiscountDecision, FreeGift},
    merchandise::MerchandiseId,
};

/// Why a cart does not qualify for the free gift.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Ineligible {
    /// The promotion is switched off or not fully configured.
    #[error("promotion is disabled or not fully configured")]
    Inactive,

    /// The cart subtotal is below the spending threshold.
    #[error("subtotal {subtotal} is below the threshold of {threshold}")]
    BelowThreshold {
        /// Cart subtotal
        subtotal: Decimal,
        /// Configured threshold
        threshold: Decimal,
    },

    /// No cart line references the gift variant.
    #[error("gift merchandise {0} is not in the cart")]
    GiftNotInCart(MerchandiseId),
}

/// Qualify a cart for the free gift, returning the reason when it misses.
///
/// # Errors
///
/// Returns the first [`Ineligible`] condition met, in evaluation order.
pub fn qualify<'a>(
    cart: &'a CartSnapshot,
    config: &PromotionConfig,
) -> Result<FreeGift<'a>, Ineligible> {
    let (gift_variant, threshold) = config.active().ok_or(Ineligible::Inactive)?;

    let subtotal = cart.subtotal();

    if subtotal < threshold {
        return Err(Ineligible::BelowThreshold {
            subtotal,
            threshold,
        });
    }

    let gift_gid = gift_variant.gid();

    let line = cart
        .first_line_for(&gift_gid)
        .ok_or(Ineligible::GiftNotInCart(gift_gid))?;

    Ok(FreeGift::new(line.id()))
}

/// Evaluate the free gift promotion against a cart.
///
/// Never fails: every miss, including a misconfigured promotion, is
/// [`DiscountDecision::NoDiscount`].
#[instrument(level = "debug", skip_all, fields(subtotal = %cart.subtotal(), lines = cart.len()))]
pub fn evaluate<'a>(cart: &'a CartSnapshot, config: &PromotionConfig) -> DiscountDecision<'a> {
    match qualify(cart, config) {
        Ok(gift) => {
            debug!(line_id = gift.line_id(), "free gift applies");

            DiscountDecision::ApplyDiscount(gift)
        }
        Err(reason) => {
            debug!(%reason, "free gift does not apply");

            DiscountDecision::NoDiscount
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        cart::{CartError, CartLine},
        config::{RawPromotionConfig, resolve},
        merchandise::VariantId,
    };

    use super::*;

    const GIFT: &str = "gid://shopify/ProductVariant/9001";
    const OTHER: &str = "gid://shopify/ProductVariant/1234";

    fn gift_config() -> PromotionConfig {
        let Some(variant) = VariantId::new(9001) else {
            unreachable!("9001 is non-zero")
        };

        PromotionConfig::new(variant, Decimal::new(50_00, 2))
    }

    fn line(id: &str, merchandise: &str, quantity: u32) -> Result<CartLine, CartError> {
        CartLine::new(id, Some(merchandise.into()), quantity)
    }

    fn cart(subtotal: Decimal, lines: Vec<CartLine>) -> CartSnapshot {
        CartSnapshot::new(subtotal, lines)
    }

    #[test]
    fn subtotal_equal_to_threshold_applies() -> TestResult {
        let cart = cart(Decimal::new(50_00, 2), vec![line("L1", GIFT, 2)?]);

        let decision = evaluate(&cart, &gift_config());

        let Some(gift) = decision.free_gift() else {
            panic!("expected a free gift, got {decision:?}");
        };

        assert_eq!(gift.line_id(), "L1");
        assert_eq!(gift.quantity().get(), 1);
        assert_eq!(
            crate::discounts::percent_points(gift.percentage()),
            Decimal::ONE_HUNDRED
        );

        Ok(())
    }

    #[test]
    fn subtotal_below_threshold_misses() -> TestResult {
        let cart = cart(Decimal::new(49_99, 2), vec![line("L1", GIFT, 1)?]);

        assert_eq!(
            qualify(&cart, &gift_config()),
            Err(Ineligible::BelowThreshold {
                subtotal: Decimal::new(49_99, 2),
                threshold: Decimal::new(50_00, 2),
            })
        );
        assert_eq!(
            evaluate(&cart, &gift_config()),
            DiscountDecision::NoDiscount
        );

        Ok(())
    }

    #[test]
    fn missing_gift_line_misses() -> TestResult {
        let cart = cart(
            Decimal::new(60_00, 2),
            vec![line("L1", OTHER, 1)?, CartLine::new("L2", None, 1)?],
        );

        assert_eq!(
            qualify(&cart, &gift_config()),
            Err(Ineligible::GiftNotInCart(GIFT.into()))
        );

        Ok(())
    }

    #[test]
    fn empty_cart_misses() {
        let cart = cart(Decimal::new(100_00, 2), vec![]);

        assert_eq!(
            evaluate(&cart, &gift_config()),
            DiscountDecision::NoDiscount
        );
    }

    #[test]
    fn disabled_config_never_applies() -> TestResult {
        let config = gift_config().with_enabled(false);

        let carts = [
            cart(Decimal::ZERO, vec![]),
            cart(Decimal::new(50_00, 2), vec![line("L1", GIFT, 1)?]),
            cart(Decimal::MAX, vec![line("L1", GIFT, 5)?, line("L2", GIFT, 1)?]),
        ];

        for cart in &carts {
            assert_eq!(qualify(cart, &config), Err(Ineligible::Inactive));
        }

        Ok(())
    }

    #[test]
    fn unparseable_gift_variant_never_applies() -> TestResult {
        let config = resolve(
            &RawPromotionConfig::new()
                .with("gift_variant_id", Some(""))
                .with("threshold", Some("50.00")),
        );

        let cart = cart(Decimal::new(500_00, 2), vec![line("L1", GIFT, 1)?]);

        assert_eq!(qualify(&cart, &config), Err(Ineligible::Inactive));

        Ok(())
    }

    #[test]
    fn first_matching_line_wins() -> TestResult {
        let cart = cart(
            Decimal::new(75_00, 2),
            vec![
                line("L0", OTHER, 1)?,
                line("L1", GIFT, 1)?,
                line("L2", GIFT, 1)?,
            ],
        );

        let decision = evaluate(&cart, &gift_config());

        assert_eq!(
            decision.free_gift().map(FreeGift::line_id),
            Some("L1"),
            "only the first gift line is discounted"
        );

        Ok(())
    }

    #[test]
    fn zero_threshold_applies_to_empty_subtotal() -> TestResult {
        let Some(variant) = VariantId::new(9001) else {
            unreachable!("9001 is non-zero")
        };

        let config = PromotionConfig::new(variant, Decimal::ZERO);
        let cart = cart(Decimal::ZERO, vec![line("L1", GIFT, 1)?]);

        assert!(evaluate(&cart, &config).is_discount());

        Ok(())
    }

    #[test]
    fn evaluation_is_idempotent() -> TestResult {
        let cart = cart(
            Decimal::new(50_00, 2),
            vec![line("L1", GIFT, 3)?, line("L2", GIFT, 1)?],
        );
        let config = gift_config();

        assert_eq!(evaluate(&cart, &config), evaluate(&cart, &config));

        Ok(())
    }

    #[test]
    fn ineligible_reasons_display() {
        assert_eq!(
            Ineligible::BelowThreshold {
                subtotal: Decimal::new(49_99, 2),
                threshold: Decimal::new(50_00, 2),
            }
            .to_string(),
            "subtotal 49.99 is below the threshold of 50.00"
        );
        assert_eq!(
            Ineligible::GiftNotInCart(GIFT.into()).to_string(),
            "gift merchandise gid://shopify/ProductVariant/9001 is not in the cart"
        );
    }
}
