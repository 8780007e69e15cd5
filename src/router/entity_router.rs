use axum::{routing::get, Router};

use crate::handler::entity_handler::{
    create_entity, delete_entity, get_entity, list_entities, update_entity, EntityState,
};
use crate::model::StoreEntity;

/// Routes for one entity kind, built from its descriptor. Thin and
/// mechanical; everything interesting happens in the handler layer.
pub fn entity_router<E: StoreEntity>(state: EntityState<E>) -> Router {
    Router::new()
        .route(
            &format!("/{}", E::SEGMENT),
            get(list_entities::<E>).post(create_entity::<E>),
        )
        .route(
            &format!("/{}/:id", E::SEGMENT),
            get(get_entity::<E>)
                .put(update_entity::<E>)
                .delete(delete_entity::<E>),
        )
        .with_state(state)
}
