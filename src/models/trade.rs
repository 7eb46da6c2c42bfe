//! Open position record pushed by the trade feed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a position or order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    #[serde(alias = "LONG", alias = "Long", alias = "buy", alias = "BUY", alias = "Buy")]
    Long,
    #[serde(alias = "SHORT", alias = "Short", alias = "sell", alias = "SELL", alias = "Sell")]
    Short,
}

impl TradeSide {
    /// Apply the side's sign to an unsigned quantity.
    pub fn signed(&self, quantity: Decimal) -> Decimal {
        match self {
            TradeSide::Long => quantity,
            TradeSide::Short => -quantity,
        }
    }
}

/// Open position on one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Ticket of the order that opened the position
    #[serde(alias = "ticket")]
    pub order_id: i64,

    /// Instrument symbol (e.g., "EURUSD")
    pub symbol: String,

    pub side: TradeSide,

    /// Unsigned position size in lots
    #[serde(alias = "volume", alias = "lots")]
    pub quantity: Decimal,

    /// Price at which the position was opened
    #[serde(alias = "open_price")]
    pub entry_price: Decimal,

    /// Floating profit/loss in account currency
    #[serde(default, alias = "pnl")]
    pub profit: Decimal,

    #[serde(default)]
    pub stop_loss: Option<Decimal>,

    #[serde(default)]
    pub take_profit: Option<Decimal>,

    #[serde(default)]
    pub swap: Decimal,

    #[serde(default)]
    pub commission: Decimal,

    #[serde(default)]
    pub open_time: Option<DateTime<Utc>>,
}

impl Trade {
    #[cfg(test)]
    pub fn new(
        order_id: i64,
        symbol: impl Into<String>,
        side: TradeSide,
        quantity: Decimal,
        entry_price: Decimal,
    ) -> Self {
        Self {
            order_id,
            symbol: symbol.into(),
            side,
            quantity,
            entry_price,
            profit: Decimal::ZERO,
            stop_loss: None,
            take_profit: None,
            swap: Decimal::ZERO,
            commission: Decimal::ZERO,
            open_time: None,
        }
    }

    /// Quantity signed by side: positive long, negative short.
    pub fn signed_quantity(&self) -> Decimal {
        self.side.signed(self.quantity)
    }
}
