//! Complete open trade/order state of one account.

use serde::{Deserialize, Serialize};

use super::order::Order;
use super::trade::Trade;

/// Open trades and orders for exactly one account.
///
/// A snapshot is replaced wholesale on every push and never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveTradeSnapshot {
    #[serde(default, rename = "open_trades")]
    pub trades: Vec<Trade>,

    #[serde(default, rename = "open_orders")]
    pub orders: Vec<Order>,
}

impl LiveTradeSnapshot {
    #[cfg(test)]
    pub fn new(trades: Vec<Trade>, orders: Vec<Order>) -> Self {
        Self { trades, orders }
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty() && self.orders.is_empty()
    }

    /// Trades on the given symbol.
    pub fn trades_on<'a>(&'a self, symbol: &'a str) -> impl Iterator<Item = &'a Trade> + 'a {
        self.trades.iter().filter(move |t| t.symbol == symbol)
    }

    /// Orders on the given symbol.
    pub fn orders_on<'a>(&'a self, symbol: &'a str) -> impl Iterator<Item = &'a Order> + 'a {
        self.orders.iter().filter(move |o| o.symbol == symbol)
    }
}
