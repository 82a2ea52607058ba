use std::time::{Duration, Instant};

use actix_web::{web, HttpServer};
use anyhow::Context;
use log::{debug, info};

use pii_lens::config::Config;
use pii_lens::handlers::{self, AppState};

const PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    info!("Starting PII analyzer");

    let config = Config::from_env().context("invalid configuration")?;
    debug!("Configuration: {:?}", config);

    let state = web::Data::new(AppState::from_config(&config)?);

    let bind_address = config.bind_address();
    info!("Server listening on http://{}", bind_address);
    info!("Workers: {}", config.workers);
    info!(
        "Analysis service: {}/v1/analysis/{}",
        config.analysis.base_url, config.analysis.analysis_id
    );
    info!(
        "Max text length: {} chars, rate limit: {}/min per client",
        config.max_text_length, config.rate_limit_per_minute
    );

    // Forget clients whose window has expired
    let purge_state = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let removed = purge_state.limiter.purge_expired(Instant::now());
            if removed > 0 {
                debug!(
                    "Rate limiter purged {} clients, {} still tracked",
                    removed,
                    purge_state.limiter.tracked_clients()
                );
            }
        }
    });

    let static_dir = config.static_dir.clone();
    HttpServer::new(move || handlers::build_app(state.clone(), &static_dir))
        .workers(config.workers)
        .bind(&bind_address)
        .with_context(|| format!("cannot bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}
