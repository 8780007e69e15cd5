pub mod entity_router;

pub use entity_router::entity_router;
