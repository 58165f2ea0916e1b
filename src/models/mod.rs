//! Plain records built per request. Nothing here is persisted.

mod product;
mod user;

pub use product::Product;
pub use user::User;
