use anyhow::Result;
use tracing::{debug, error, info};

use super::initdb::prepare_database;
use super::serve::run_server;
use crate::config::initialize_app_state_with_url;
use crate::router::create_router;

pub async fn migrate_and_serve(database_url: &str, bind_address: &str) -> Result<()> {
    info!("Preparing database and starting server");
    debug!("Database URL: {}", database_url);

    let state = match initialize_app_state_with_url(database_url).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    prepare_database(&state.db).await?;

    run_server(create_router(state), bind_address).await
}
