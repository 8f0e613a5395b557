pub mod config;
pub mod domain;
pub mod error;
pub mod formats;
pub mod header;
pub mod ncbi;
pub mod normalize;
pub mod notify;
pub mod output;
pub mod query;
pub mod rcsb;
pub mod transport;
