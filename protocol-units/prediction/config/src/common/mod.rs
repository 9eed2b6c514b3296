pub mod contract;
pub mod eth_connection;
pub mod listener;
pub mod upload;
