mod account;
mod app;
mod endpoint;
mod event_type;
mod filter;
mod level;
mod user;

pub use account::Account;
pub use app::App;
pub use endpoint::{Endpoint, EndpointChanges};
pub use event_type::EventType;
pub use filter::{AssociationCatalog, Filter, FilterWithAssociations, NewFilter};
pub use level::Level;
pub use user::{NewUser, User};
