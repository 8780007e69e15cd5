pub mod entity_handler;

pub use entity_handler::EntityState;
