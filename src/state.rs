use std::sync::Arc;

use sqlx::PgPool;

use schoolyard_config::{CorsConfig, GradingConfig, JwtConfig};
use schoolyard_db::init_db_pool;

use crate::clock::{Clock, SystemClock};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub grading_config: GradingConfig,
    pub clock: Arc<dyn Clock>,
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    Ok(AppState {
        db: init_db_pool().await?,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        grading_config: GradingConfig::from_env(),
        clock: Arc::new(SystemClock),
    })
}
