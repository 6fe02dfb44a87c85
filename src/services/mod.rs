pub mod place_service;
pub mod user_service;

pub use place_service::{NewPlace, PlaceService, UpdatePlace};
pub use user_service::{Signup, UserService};
