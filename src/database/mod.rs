pub mod achievements;
pub mod betting;
pub mod catalog;
pub mod connection;
pub mod coupons;
pub mod matches;
pub mod players;
pub mod setup;
pub mod standings;
pub mod tournaments;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
