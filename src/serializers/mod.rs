//! Entity to JSON:API resource mapping. Pure functions, no I/O.

pub mod app;
pub mod endpoint;
pub mod event_type;
pub mod filter;
pub mod level;

pub const APP: &str = "app";
pub const ENDPOINT: &str = "endpoint";
pub const EVENT_TYPE: &str = "event_type";
pub const FILTER: &str = "filter";
pub const LEVEL: &str = "level";
