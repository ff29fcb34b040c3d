// src/main.rs
use actix_web::{App, HttpServer, middleware, web};
use anyhow::Context;
use log::info;
use skinsight::config::Config;
use skinsight::{AppState, configure};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting skinsight service...");

    let config = Config::from_env().context("loading configuration")?;
    let app_state = AppState::from_config(&config).context("building HTTP client")?;

    info!(
        "Using model {} with skin analysis at {}",
        config.chat_model, config.skin_analysis_api_url
    );
    info!("Starting HTTP server on {}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    Ok(())
}
