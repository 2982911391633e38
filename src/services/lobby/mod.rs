pub mod client;
pub mod products;
