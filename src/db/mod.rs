pub mod accounts;
pub mod apps;
pub mod endpoints;
pub mod event_types;
pub mod filters;
pub mod levels;
pub mod users;
