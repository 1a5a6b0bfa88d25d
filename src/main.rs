use anyhow::Result;
use petstore_api::{
    config, db,
    models::bucket::BucketKind,
    repositories::{BucketRepository, MongoBucketRepository},
    routes, shutdown,
    state::AppState,
};
use std::{io::ErrorKind, sync::Arc};
use tokio::{net::TcpListener, sync::Notify};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // --- Parse config + migrate flag ---
    let (cfg, migrate) = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting petstore-api with config: {:?}", cfg);

    // --- Relational store ---
    let pool = db::connect(&cfg).await?;
    db::run_migrations(&pool).await?;
    tracing::info!("Database migration complete.");

    // --- Handle migration mode ---
    if migrate {
        return Ok(()); // exit after migration
    }

    // --- Document store ---
    let documents = db::connect_document_store(&cfg.mongo).await?;
    let op_timeout = cfg.mongo.operation_timeout;
    let favorites = Arc::new(MongoBucketRepository::new(
        &documents,
        BucketKind::Favorites,
        op_timeout,
    ));
    let cart = Arc::new(MongoBucketRepository::new(
        &documents,
        BucketKind::Cart,
        op_timeout,
    ));
    match favorites.ping().await {
        Ok(()) => {
            tracing::info!("Connected to document store {}", cfg.mongo.database);
            for bucket in [&favorites, &cart] {
                if let Err(err) = bucket.ensure_indexes().await {
                    tracing::warn!("Failed to create bucket index: {}", err);
                }
            }
        }
        Err(err) => tracing::warn!(
            "Document store unavailable ({}); favorites and cart requests will fail until it is reachable",
            err
        ),
    }

    // --- Build router ---
    let state = AppState::new(pool.clone(), favorites, cart);
    let app = routes::routes::app(state);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    let stop = Arc::new(Notify::new());
    let server = axum::serve(listener, app).with_graceful_shutdown({
        let stop = stop.clone();
        async move { stop.notified().await }
    });
    let mut server = tokio::spawn(async move { server.await });

    tokio::select! {
        res = &mut server => {
            res??;
            return Ok(());
        }
        _ = shutdown::shutdown_signal() => {}
    }

    tracing::info!(
        "Shutting down; waiting up to {:?} for in-flight requests",
        cfg.shutdown_grace
    );
    stop.notify_one();
    shutdown::drain(server, cfg.shutdown_grace).await?;

    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}
