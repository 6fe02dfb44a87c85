pub mod place;
pub mod user;

pub use place::{Location, Place};
pub use user::{PublicUser, User};
