//! Host-facing records and numeric codes of the charting broker contract.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side codes.
pub const SIDE_BUY: i32 = 1;
pub const SIDE_SELL: i32 = -1;

/// Order type codes.
pub const ORDER_TYPE_LIMIT: i32 = 1;
pub const ORDER_TYPE_MARKET: i32 = 2;
pub const ORDER_TYPE_STOP: i32 = 3;

/// Order status code for a working (pending) order.
pub const ORDER_STATUS_WORKING: i32 = 6;

/// Open position as reported to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerPosition {
    pub id: String,
    pub symbol: String,

    /// Signed quantity: positive long, negative short
    #[serde(with = "rust_decimal::serde::float")]
    pub qty: Decimal,

    pub side: i32,

    #[serde(with = "rust_decimal::serde::float")]
    pub avg_price: Decimal,

    /// Same as the entry price; no live mark is streamed
    #[serde(with = "rust_decimal::serde::float")]
    pub last: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub pl: Decimal,
}

/// Pending order as reported to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerOrder {
    pub id: String,
    pub symbol: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub qty: Decimal,

    pub side: i32,

    #[serde(rename = "type")]
    pub order_type: i32,

    pub status: i32,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub limit_price: Option<Decimal>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub stop_price: Option<Decimal>,
}

/// Account descriptor shown in the host's account manager panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountManagerInfo {
    pub account_title: String,

    #[serde(default)]
    pub currency: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Entry in the chart context menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMenuAction {
    pub text: String,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_json_omits_unset_prices() {
        let order = BrokerOrder {
            id: "5".to_string(),
            symbol: "EURUSD".to_string(),
            qty: dec!(-1),
            side: SIDE_SELL,
            order_type: ORDER_TYPE_STOP,
            status: ORDER_STATUS_WORKING,
            limit_price: None,
            stop_price: Some(dec!(1.2345)),
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["type"], 3);
        assert_eq!(json["qty"], -1.0);
        assert!((json["stopPrice"].as_f64().unwrap() - 1.2345).abs() < 1e-9);
        assert!(json.get("limitPrice").is_none());
    }
}
