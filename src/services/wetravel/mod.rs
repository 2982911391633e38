pub mod deposit;
pub mod interface;
pub mod models;
pub mod provider;
