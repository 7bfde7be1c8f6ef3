//! Free gift with purchase
//!
//! Decides whether a cart earns a merchant's free gift: once the subtotal
//! reaches the configured threshold, one unit of the gift line already in the
//! cart is discounted by 100%.
//!
//! ```
//! use gwp::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let config = resolve(
//!     &RawPromotionConfig::new()
//!         .with(GIFT_VARIANT_ID_KEY, Some("9001"))
//!         .with(THRESHOLD_KEY, Some("50.00")),
//! );
//!
//! let cart = CartSnapshot::new(
//!     Decimal::new(50_00, 2),
//!     [CartLine::new("L1", Some("gid://shopify/ProductVariant/9001".into()), 2)?],
//! );
//!
//! let decision = evaluate(&cart, &config);
//!
//! assert_eq!(decision.free_gift().map(FreeGift::line_id), Some("L1"));
//! # Ok::<(), CartError>(())
//! ```

pub mod amounts;
pub mod cart;
pub mod config;
pub mod discounts;
pub mod evaluator;
pub mod fixtures;
pub mod function;
pub mod merchandise;
pub mod prelude;
pub mod report;
