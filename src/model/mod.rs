pub mod clothes;
pub mod electronics;
pub mod entity;
pub mod grocery;
pub mod user;

pub use clothes::Clothes;
pub use electronics::Electronics;
pub use entity::{StoreEntity, Timestamps, UniquenessCheck};
pub use grocery::Grocery;
pub use user::User;
