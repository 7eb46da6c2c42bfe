//! Pending order record pushed by the trade feed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::trade::TradeSide;

/// Kind of a pending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    #[serde(alias = "market")]
    Market,
    #[serde(alias = "limit")]
    Limit,
    #[serde(alias = "stop")]
    Stop,
    #[serde(alias = "stop_limit")]
    StopLimit,
}

/// Open pending order on one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(alias = "ticket")]
    pub order_id: i64,

    pub symbol: String,

    pub side: TradeSide,

    #[serde(alias = "type", alias = "order_type")]
    pub kind: OrderKind,

    /// Unsigned order size in lots
    #[serde(alias = "volume", alias = "lots")]
    pub quantity: Decimal,

    /// Trigger or limit price
    #[serde(default)]
    pub price: Decimal,
}

impl Order {
    #[cfg(test)]
    pub fn new(
        order_id: i64,
        symbol: impl Into<String>,
        side: TradeSide,
        kind: OrderKind,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            order_id,
            symbol: symbol.into(),
            side,
            kind,
            quantity,
            price,
        }
    }

    pub fn signed_quantity(&self) -> Decimal {
        self.side.signed(self.quantity)
    }
}
