use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::config::app_conf::AppConfig;
use crate::config::mongo_conf::MongoConfig;
use crate::handler::EntityState;
use crate::model::{Clothes, Electronics, Grocery, StoreEntity, User};
use crate::repository::{EntityRepository, MongoEntityRepository};
use crate::router::entity_router;

pub struct App {
    config: AppConfig,
    router: Router,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();
        let mongo_config = MongoConfig::from_env().expect("Mongo config error");

        // One client for the whole process; every repository shares it.
        let db = mongo_config.connect().await.expect("Mongo connection error");
        let expose_errors = config.expose_error_details();

        let router = Router::new()
            .merge(entity_router(mongo_state::<User>(&db, expose_errors)))
            .merge(entity_router(mongo_state::<Grocery>(&db, expose_errors)))
            .merge(entity_router(mongo_state::<Clothes>(&db, expose_errors)))
            .merge(entity_router(mongo_state::<Electronics>(&db, expose_errors)))
            .route("/", get(|| async { "Welcome!" }))
            .route("/health", get(|| async { "OK" }));

        App { config, router }
    }

    pub async fn start(self) {
        let addr = SocketAddr::new(
            self.config.host.parse().expect("Invalid host"),
            self.config.port,
        );
        info!("🚀 Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind address");
        axum::serve(listener, self.router)
            .await
            .expect("Failed to start server");
    }
}

fn mongo_state<E: StoreEntity>(db: &mongodb::Database, expose_errors: bool) -> EntityState<E> {
    let repo = Arc::new(MongoEntityRepository::<E>::new(db)) as Arc<dyn EntityRepository<E>>;
    EntityState::new(repo, expose_errors)
}
