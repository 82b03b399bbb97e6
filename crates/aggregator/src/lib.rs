//! Aggregation core: cached, fault-tolerant orchestration over the
//! upstream resort API.

pub mod cache;
pub mod service;

pub use cache::TtlCache;
pub use service::ResortAggregator;
