mod price_handler;

pub use price_handler::{__path_list_prices, list_prices};
