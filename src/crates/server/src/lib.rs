pub mod error;
pub mod middleware;
pub mod native_api;
pub mod response;

use application::artist::ArtistService;
use infra::config::{AppConfigImpl, DatabaseConfig};
use infra::repository::postgres::artist::ArtistRepositoryImpl;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::sync::Arc;

pub struct AppState {
    pub app_cfg: AppConfigImpl,
    pub artist_service: ArtistService,
}

impl AppState {
    pub async fn init_db(cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
        use log::info;

        let mut opt = ConnectOptions::new(cfg.url.clone());
        opt.max_connections(cfg.max_connections)
            .min_connections(cfg.min_connections)
            .connect_timeout(cfg.connect_timeout)
            .acquire_timeout(cfg.acquire_timeout)
            .sqlx_logging(cfg.sqlx_logging)
            .sqlx_logging_level(log::LevelFilter::Info);

        let db = Database::connect(opt).await?;

        let backend = db.get_database_backend();
        db.execute(Statement::from_string(backend, "SELECT 1".to_owned()))
            .await?;

        info!("Database connection pool initialized successfully");
        Ok(db)
    }

    pub fn new(db: DatabaseConnection, app_cfg: AppConfigImpl) -> Self {
        let artist_repository = Arc::new(ArtistRepositoryImpl::new(db));
        Self {
            app_cfg,
            artist_service: ArtistService::new(artist_repository),
        }
    }
}
