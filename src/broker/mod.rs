//! Broker adapter for the charting host: live snapshot store, symbol-scoped
//! views, and the host-facing facade.

mod facade;
mod store;
mod types;
mod views;

pub use facade::{BrokerAdapterFacade, ChartHost, FixedSymbolHost};
pub use store::LiveTradeStore;
pub use views::SymbolScopedView;
