//! Discount Function
//!
//! Input and output documents exchanged with the checkout platform, and the
//! [`run`] entry point tying configuration, cart and evaluation together.

use rust_decimal::Decimal;
use rusty_money::iso;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::{
    amounts::deserialize_decimal,
    cart::{CartError, CartLine, CartSnapshot},
    config::{ENABLED_KEY, GIFT_VARIANT_ID_KEY, RawPromotionConfig, THRESHOLD_KEY, resolve},
    discounts::{DiscountDecision, FreeGift, percent_points},
    evaluator::evaluate,
    merchandise::MerchandiseId,
};

/// Function input document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInput {
    /// Cart being checked out
    pub cart: CartInput,

    /// Promotion settings attached to the discount
    #[serde(default)]
    pub discount_node: DiscountNodeInput,
}

/// Cart as provided by the platform.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartInput {
    /// Cart costs
    pub cost: CartCostInput,

    /// Cart lines, in cart order
    #[serde(default)]
    pub lines: Vec<CartLineInput>,
}

/// Cart costs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCostInput {
    /// Pre-discount subtotal
    pub subtotal_amount: MoneyInput,
}

/// An amount with an optional ISO currency code.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyInput {
    /// Decimal amount
    #[serde(deserialize_with = "deserialize_decimal")]
    pub amount: Decimal,

    /// ISO 4217 currency code
    #[serde(default)]
    pub currency_code: Option<String>,
}

/// A cart line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Line id
    pub id: String,

    /// Line quantity
    pub quantity: u32,

    /// Merchandise on the line
    #[serde(default)]
    pub merchandise: Option<MerchandiseInput>,
}

/// Merchandise referenced by a cart line. Custom products carry no id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MerchandiseInput {
    /// Merchandise id
    #[serde(default)]
    pub id: Option<String>,
}

/// Settings metafields exposed on the discount node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountNodeInput {
    /// Gift variant id setting
    #[serde(default)]
    pub gift_variant_id: Option<MetafieldInput>,

    /// Threshold setting
    #[serde(default)]
    pub threshold: Option<MetafieldInput>,

    /// Enabled flag setting
    #[serde(default)]
    pub enabled: Option<MetafieldInput>,
}

/// A single settings metafield.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetafieldInput {
    /// Stored value
    #[serde(default)]
    pub value: Option<String>,
}

impl DiscountNodeInput {
    /// Collect the metafields into raw promotion settings.
    pub fn to_raw(&self) -> RawPromotionConfig {
        [
            (GIFT_VARIANT_ID_KEY, &self.gift_variant_id),
            (THRESHOLD_KEY, &self.threshold),
            (ENABLED_KEY, &self.enabled),
        ]
        .into_iter()
        .filter_map(|(key, field)| {
            field
                .as_ref()
                .map(|field| (key, field.value.as_deref()))
        })
        .collect()
    }
}

impl TryFrom<&CartInput> for CartSnapshot {
    type Error = CartError;

    fn try_from(cart: &CartInput) -> Result<Self, Self::Error> {
        let lines = cart
            .lines
            .iter()
            .map(|line| {
                let merchandise_id = line
                    .merchandise
                    .as_ref()
                    .and_then(|merchandise| merchandise.id.as_deref())
                    .map(MerchandiseId::from);

                CartLine::new(line.id.as_str(), merchandise_id, line.quantity)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let subtotal = &cart.cost.subtotal_amount;
        let snapshot = CartSnapshot::new(subtotal.amount, lines);

        // Currency is display-only; unknown codes are dropped.
        Ok(
            match subtotal.currency_code.as_deref().and_then(iso::find) {
                Some(currency) => snapshot.with_currency(currency),
                None => snapshot,
            },
        )
    }
}

/// How the platform combines the returned discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountApplicationStrategy {
    /// Apply only the first discount.
    First,
}

/// Function output document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResult {
    /// Combination strategy
    pub discount_application_strategy: DiscountApplicationStrategy,

    /// Discounts to apply
    pub discounts: Vec<DiscountOutput>,
}

/// A discount to apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountOutput {
    /// Lines targeted by the discount
    pub targets: Vec<TargetOutput>,

    /// Discount value
    pub value: ValueOutput,

    /// Message shown to the shopper
    pub message: String,
}

/// A discount target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetOutput {
    /// Units of a single cart line
    CartLine(CartLineTarget),
}

/// Units of a single cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineTarget {
    /// Line id
    pub id: String,

    /// Number of units discounted
    pub quantity: u32,
}

/// A discount value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueOutput {
    /// Percentage off
    Percentage(PercentageValue),
}

/// Percentage off, in percentage points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentageValue {
    /// Percentage points (`100.0` for free)
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

impl FunctionResult {
    /// A result applying no discounts.
    pub fn empty() -> Self {
        Self {
            discount_application_strategy: DiscountApplicationStrategy::First,
            discounts: Vec::new(),
        }
    }
}

impl From<&FreeGift<'_>> for DiscountOutput {
    fn from(gift: &FreeGift<'_>) -> Self {
        Self {
            targets: vec![TargetOutput::CartLine(CartLineTarget {
                id: gift.line_id().to_string(),
                quantity: gift.quantity().get(),
            })],
            value: ValueOutput::Percentage(PercentageValue {
                value: percent_points(gift.percentage()),
            }),
            message: gift.label().to_string(),
        }
    }
}

impl From<DiscountDecision<'_>> for FunctionResult {
    fn from(decision: DiscountDecision<'_>) -> Self {
        Self {
            discounts: decision
                .free_gift()
                .map(DiscountOutput::from)
                .into_iter()
                .collect(),
            ..Self::empty()
        }
    }
}

/// Run the free gift discount function over a platform input document.
///
/// Never fails. A cart the platform should never send (a zero-quantity line)
/// is logged and gets no discount.
#[instrument(level = "debug", skip_all)]
pub fn run(input: &FunctionInput) -> FunctionResult {
    let config = resolve(&input.discount_node.to_raw());

    let cart = match CartSnapshot::try_from(&input.cart) {
        Ok(cart) => cart,
        Err(err) => {
            warn!(%err, "ignoring malformed cart");

            return FunctionResult::empty();
        }
    };

    FunctionResult::from(evaluate(&cart, &config))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn input(value: serde_json::Value) -> Result<FunctionInput, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn discount_node_to_raw_keeps_unset_values() -> TestResult {
        let input = input(json!({
            "cart": { "cost": { "subtotalAmount": { "amount": "1.0" } } },
            "discountNode": {
                "giftVariantId": { "value": "9001" },
                "threshold": { "value": null },
                "enabled": null
            }
        }))?;

        let raw = input.discount_node.to_raw();

        assert_eq!(raw.get(GIFT_VARIANT_ID_KEY), Some("9001"));
        assert_eq!(raw.get(THRESHOLD_KEY), None);
        assert_eq!(raw.get(ENABLED_KEY), None);

        Ok(())
    }

    #[test]
    fn cart_conversion_reads_lines_and_currency() -> TestResult {
        let input = input(json!({
            "cart": {
                "cost": { "subtotalAmount": { "amount": "12.50", "currencyCode": "EUR" } },
                "lines": [
                    { "id": "L1", "quantity": 2, "merchandise": { "__typename": "ProductVariant", "id": "gid://shopify/ProductVariant/1" } },
                    { "id": "L2", "quantity": 1, "merchandise": { "__typename": "CustomProduct" } },
                    { "id": "L3", "quantity": 1 }
                ]
            }
        }))?;

        let cart = CartSnapshot::try_from(&input.cart)?;

        assert_eq!(cart.subtotal(), Decimal::new(12_50, 2));
        assert_eq!(cart.currency(), Some(iso::EUR));
        assert_eq!(cart.len(), 3);
        assert_eq!(
            cart.lines()
                .iter()
                .map(|line| line.merchandise_id().map(MerchandiseId::as_str))
                .collect::<Vec<_>>(),
            vec![Some("gid://shopify/ProductVariant/1"), None, None]
        );

        Ok(())
    }

    #[test]
    fn unknown_currency_is_ignored() -> TestResult {
        let input = input(json!({
            "cart": { "cost": { "subtotalAmount": { "amount": "1", "currencyCode": "XYZ" } } }
        }))?;

        let cart = CartSnapshot::try_from(&input.cart)?;

        assert_eq!(cart.currency(), None);

        Ok(())
    }

    #[test]
    fn empty_result_serializes_without_discounts() -> TestResult {
        let value = serde_json::to_value(FunctionResult::empty())?;

        assert_eq!(
            value,
            json!({ "discountApplicationStrategy": "FIRST", "discounts": [] })
        );

        Ok(())
    }

    #[test]
    fn free_gift_serializes_as_one_hundred_percent_off_one_unit() -> TestResult {
        let result = FunctionResult::from(DiscountDecision::ApplyDiscount(FreeGift::new("L1")));

        assert_eq!(
            serde_json::to_value(result)?,
            json!({
                "discountApplicationStrategy": "FIRST",
                "discounts": [{
                    "targets": [{ "cartLine": { "id": "L1", "quantity": 1 } }],
                    "value": { "percentage": { "value": 100.0 } },
                    "message": "FREE GIFT"
                }]
            })
        );

        Ok(())
    }

    #[test]
    fn run_applies_free_gift() -> TestResult {
        let input = input(json!({
            "cart": {
                "cost": { "subtotalAmount": { "amount": "50.0", "currencyCode": "USD" } },
                "lines": [
                    { "id": "gid://shopify/CartLine/1", "quantity": 2, "merchandise": { "id": "gid://shopify/ProductVariant/9001" } }
                ]
            },
            "discountNode": {
                "giftVariantId": { "value": "9001" },
                "threshold": { "value": "50" }
            }
        }))?;

        let result = run(&input);

        assert_eq!(result.discounts.len(), 1);
        assert_eq!(
            result.discounts.first().and_then(|d| d.targets.first()),
            Some(&TargetOutput::CartLine(CartLineTarget {
                id: "gid://shopify/CartLine/1".to_string(),
                quantity: 1,
            }))
        );

        Ok(())
    }

    #[test]
    fn run_without_settings_is_empty() -> TestResult {
        let input = input(json!({
            "cart": {
                "cost": { "subtotalAmount": { "amount": "500.0" } },
                "lines": [
                    { "id": "L1", "quantity": 1, "merchandise": { "id": "gid://shopify/ProductVariant/9001" } }
                ]
            }
        }))?;

        assert_eq!(run(&input), FunctionResult::empty());

        Ok(())
    }

    #[test]
    fn run_with_zero_quantity_line_is_empty() -> TestResult {
        let input = input(json!({
            "cart": {
                "cost": { "subtotalAmount": { "amount": "500.0" } },
                "lines": [
                    { "id": "L1", "quantity": 0, "merchandise": { "id": "gid://shopify/ProductVariant/9001" } }
                ]
            },
            "discountNode": {
                "giftVariantId": { "value": "9001" },
                "threshold": { "value": "0" }
            }
        }))?;

        assert_eq!(run(&input), FunctionResult::empty());

        Ok(())
    }
}
