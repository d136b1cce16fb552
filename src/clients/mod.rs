mod client;
pub use client::Client;

mod pool;
pub use pool::{Pool, PoolConfig, PoolStats, PooledClient};
