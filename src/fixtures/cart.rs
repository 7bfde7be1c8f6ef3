//! Cart Fixtures

use rust_decimal::Decimal;
use rusty_money::iso;
use serde::Deserialize;

use crate::{
    amounts::deserialize_decimal,
    cart::{CartLine, CartSnapshot},
    fixtures::FixtureError,
    merchandise::MerchandiseId,
};

/// Cart definition in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Pre-discount subtotal
    #[serde(deserialize_with = "deserialize_decimal")]
    pub subtotal: Decimal,

    /// ISO 4217 currency code
    #[serde(default)]
    pub currency: Option<String>,

    /// Cart lines, in cart order
    #[serde(default)]
    pub lines: Vec<CartLineFixture>,
}

/// Cart line definition in YAML
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Line id
    pub id: String,

    /// Merchandise id, omitted for custom merchandise
    #[serde(default)]
    pub merchandise: Option<String>,

    /// Line quantity
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl TryFrom<CartFixture> for CartSnapshot {
    type Error = FixtureError;

    fn try_from(fixture: CartFixture) -> Result<Self, Self::Error> {
        let lines = fixture
            .lines
            .into_iter()
            .map(|line| {
                CartLine::new(line.id, line.merchandise.map(MerchandiseId::from), line.quantity)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cart = CartSnapshot::new(fixture.subtotal, lines);

        match fixture.currency {
            None => Ok(cart),
            Some(code) => iso::find(&code)
                .map(|currency| cart.with_currency(currency))
                .ok_or(FixtureError::UnknownCurrency(code)),
        }
    }
}
