pub mod http_pool;

pub use http_pool::ConnectionPool;
