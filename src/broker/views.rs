//! Projection of a live snapshot into host records for one instrument.

use crate::models::{LiveTradeSnapshot, Order, OrderKind, Trade, TradeSide};

use super::types::*;

/// Read-only view of a snapshot filtered to one symbol.
pub struct SymbolScopedView<'a> {
    snapshot: &'a LiveTradeSnapshot,
    symbol: &'a str,
}

impl<'a> SymbolScopedView<'a> {
    pub fn new(snapshot: &'a LiveTradeSnapshot, symbol: &'a str) -> Self {
        Self { snapshot, symbol }
    }

    /// Open positions on the symbol.
    pub fn positions(&self) -> Vec<BrokerPosition> {
        self.snapshot
            .trades_on(self.symbol)
            .map(BrokerPosition::from)
            .collect()
    }

    /// Pending orders on the symbol, all reported as working.
    pub fn orders(&self) -> Vec<BrokerOrder> {
        self.snapshot
            .orders_on(self.symbol)
            .map(BrokerOrder::from)
            .collect()
    }
}

fn side_code(side: TradeSide) -> i32 {
    match side {
        TradeSide::Long => SIDE_BUY,
        TradeSide::Short => SIDE_SELL,
    }
}

fn order_type_code(kind: OrderKind) -> i32 {
    match kind {
        OrderKind::Limit => ORDER_TYPE_LIMIT,
        OrderKind::Stop => ORDER_TYPE_STOP,
        // Stop-limit has no dedicated code on this host and reports as market.
        OrderKind::Market | OrderKind::StopLimit => ORDER_TYPE_MARKET,
    }
}

impl From<&Trade> for BrokerPosition {
    fn from(trade: &Trade) -> Self {
        Self {
            id: trade.order_id.to_string(),
            symbol: trade.symbol.clone(),
            qty: trade.signed_quantity(),
            side: side_code(trade.side),
            avg_price: trade.entry_price,
            last: trade.entry_price,
            pl: trade.profit,
        }
    }
}

impl From<&Order> for BrokerOrder {
    fn from(order: &Order) -> Self {
        Self {
            id: order.order_id.to_string(),
            symbol: order.symbol.clone(),
            qty: order.signed_quantity(),
            side: side_code(order.side),
            order_type: order_type_code(order.kind),
            status: ORDER_STATUS_WORKING,
            limit_price: (order.kind == OrderKind::Limit).then_some(order.price),
            stop_price: (order.kind == OrderKind::Stop).then_some(order.price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot() -> LiveTradeSnapshot {
        let mut eur = Trade::new(1, "EURUSD", TradeSide::Long, dec!(2), dec!(1.0850));
        eur.profit = dec!(14.2);
        let gbp = Trade::new(2, "GBPUSD", TradeSide::Short, dec!(1), dec!(1.2710));

        let orders = vec![
            Order::new(10, "EURUSD", TradeSide::Short, OrderKind::Stop, dec!(0.5), dec!(1.2345)),
            Order::new(11, "EURUSD", TradeSide::Long, OrderKind::Limit, dec!(1), dec!(1.0800)),
            Order::new(12, "EURUSD", TradeSide::Long, OrderKind::StopLimit, dec!(1), dec!(1.0900)),
            Order::new(13, "EURUSD", TradeSide::Long, OrderKind::Market, dec!(3), dec!(0)),
            Order::new(14, "GBPUSD", TradeSide::Long, OrderKind::Limit, dec!(1), dec!(1.2)),
        ];

        LiveTradeSnapshot::new(vec![eur, gbp], orders)
    }

    #[test]
    fn test_positions_filtered_by_symbol() {
        let snapshot = snapshot();
        let positions = SymbolScopedView::new(&snapshot, "EURUSD").positions();

        assert_eq!(positions.len(), 1);
        let pos = &positions[0];
        assert_eq!(pos.symbol, "EURUSD");
        assert_eq!(pos.qty, dec!(2));
        assert_eq!(pos.side, SIDE_BUY);
        assert_eq!(pos.avg_price, dec!(1.0850));
        assert_eq!(pos.last, pos.avg_price);
        assert_eq!(pos.pl, dec!(14.2));
    }

    #[test]
    fn test_short_position_is_negative() {
        let snapshot = snapshot();
        let positions = SymbolScopedView::new(&snapshot, "GBPUSD").positions();

        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].qty, dec!(-1));
        assert_eq!(positions[0].side, SIDE_SELL);
    }

    #[test]
    fn test_order_codes_and_prices() {
        let snapshot = snapshot();
        let orders = SymbolScopedView::new(&snapshot, "EURUSD").orders();
        assert_eq!(orders.len(), 4);

        let stop = &orders[0];
        assert_eq!(stop.order_type, ORDER_TYPE_STOP);
        assert_eq!(stop.stop_price, Some(dec!(1.2345)));
        assert_eq!(stop.limit_price, None);
        assert_eq!(stop.qty, dec!(-0.5));
        assert_eq!(stop.side, SIDE_SELL);

        let limit = &orders[1];
        assert_eq!(limit.order_type, ORDER_TYPE_LIMIT);
        assert_eq!(limit.limit_price, Some(dec!(1.0800)));
        assert_eq!(limit.stop_price, None);

        for other in &orders[2..] {
            assert_eq!(other.order_type, ORDER_TYPE_MARKET);
            assert_eq!(other.limit_price, None);
            assert_eq!(other.stop_price, None);
        }

        assert!(orders.iter().all(|o| o.status == ORDER_STATUS_WORKING));
    }

    #[test]
    fn test_unknown_symbol_is_empty() {
        let snapshot = snapshot();
        let view = SymbolScopedView::new(&snapshot, "USDJPY");
        assert!(view.positions().is_empty());
        assert!(view.orders().is_empty());
    }
}
