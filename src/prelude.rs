//! Prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartError, CartLine, CartSnapshot},
    config::{
        ConfigIssue, ENABLED_KEY, GIFT_VARIANT_ID_KEY, PromotionConfig, RawPromotionConfig,
        THRESHOLD_KEY, Threshold, resolve,
    },
    discounts::{DiscountDecision, FREE_GIFT_LABEL, FreeGift},
    evaluator::{Ineligible, evaluate, qualify},
    function::{FunctionInput, FunctionResult, run},
    merchandise::{MerchandiseId, VariantId, VariantIdError},
    report::{Report, ReportError},
};
