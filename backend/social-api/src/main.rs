use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use db_pool::create_pool;
use social_api::config::Config;
use social_api::db::Storage;
use social_api::handlers;
use social_api::middleware::RequestTimeout;
use social_api::AppState;
use tracing::{error, info};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info,actix_web=info,sqlx=warn";

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.app.is_production());

    info!(
        env = %config.app.env,
        external_url = %config.app.external_url,
        query_timeout_secs = config.request.query_timeout.as_secs(),
        request_timeout_secs = config.request.request_timeout.as_secs(),
        feed_max_limit = config.feed.max_limit,
        self_follow = %config.self_follow,
        "Starting social-api"
    );

    config.database.log_config();
    let pool = create_pool(config.database.clone())
        .await
        .context("Failed to create database pool")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    let state = web::Data::new(AppState::new(
        Storage::postgres(pool.clone(), config.request.query_timeout),
        config.self_follow,
        config.feed,
        config.app.env.clone(),
    ));

    let request_timeout = config.request.request_timeout;
    let bind_addr = (config.app.host.clone(), config.app.port);
    info!("Listening on {}:{}", bind_addr.0, bind_addr.1);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(RequestTimeout::new(request_timeout))
            .wrap(TracingLogger::default())
            .configure(handlers::routes)
    })
    .bind(bind_addr)
    .context("Failed to bind HTTP server")?
    .disable_signals()
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        handle.stop(true).await;
    });

    server.await.context("HTTP server error")?;

    pool.close().await;
    info!("social-api stopped");
    Ok(())
}
