mod app;
mod config;
mod error;
mod logging;
mod ui;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    let _log_guard = logging::init(&config)?;
    tracing::info!("starting registration form against {}", config.base_url);

    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}
