pub mod extractor;
pub mod identity;
pub mod provision;
mod scope;

pub use extractor::CurrentUser;
pub use scope::AccountScope;
