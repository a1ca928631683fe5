use sqlx::PgPool;

use cache::ProductCache;
use config::Config;

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;

pub mod database;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub cache: ProductCache,
}
