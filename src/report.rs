//! Report
//!
//! Human-readable rendering of a cart and the free gift decision made for it.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartSnapshot,
    config::{PromotionConfig, Threshold},
    discounts::FreeGift,
    evaluator::{Ineligible, qualify},
};

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing to the output failed.
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// A cart alongside the outcome of evaluating the promotion against it.
#[derive(Debug)]
pub struct Report<'a> {
    cart: &'a CartSnapshot,
    config: &'a PromotionConfig,
    outcome: Result<FreeGift<'a>, Ineligible>,
}

impl<'a> Report<'a> {
    /// Evaluate the promotion and capture the outcome for display.
    pub fn new(cart: &'a CartSnapshot, config: &'a PromotionConfig) -> Self {
        Self {
            cart,
            config,
            outcome: qualify(cart, config),
        }
    }

    /// The captured outcome.
    pub fn outcome(&self) -> &Result<FreeGift<'a>, Ineligible> {
        &self.outcome
    }

    /// Write the line table and the summary.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        let mut builder = Builder::default();

        builder.push_record(["Line", "Merchandise", "Qty", "Free", "Full Price"]);

        let gift = self.outcome.as_ref().ok();

        for line in self.cart.iter() {
            let quantity = line.quantity().get();

            let free = gift
                .filter(|gift| gift.line_id() == line.id())
                .map_or(0, |gift| gift.quantity().get().min(quantity));

            builder.push_record([
                line.id().to_string(),
                line.merchandise_id()
                    .map_or_else(|| "-".to_string(), ToString::to_string),
                quantity.to_string(),
                free.to_string(),
                (quantity - free).to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "\n{table}")?;

        self.write_summary(&mut out)?;

        Ok(())
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        let currency = self.cart.currency();

        writeln!(
            out,
            "\nSubtotal:  {}",
            display_amount(self.cart.subtotal(), currency)
        )?;

        let threshold = match self.config.threshold() {
            Threshold::Amount(amount) => display_amount(amount, currency),
            Threshold::Invalid => "invalid".to_string(),
        };

        writeln!(out, "Threshold: {threshold}")?;

        match &self.outcome {
            Ok(gift) => writeln!(
                out,
                "Decision:  {} on {} unit of line {}",
                gift.label(),
                gift.quantity(),
                gift.line_id()
            )?,
            Err(reason) => writeln!(out, "Decision:  no discount ({reason})")?,
        }

        for issue in self.config.issues() {
            writeln!(out, "Config:    {issue}")?;
        }

        Ok(())
    }
}

fn display_amount(amount: Decimal, currency: Option<&'static Currency>) -> String {
    currency.map_or_else(
        || amount.to_string(),
        |currency| Money::from_decimal(amount, currency).to_string(),
    )
}
