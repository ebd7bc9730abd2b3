use dotenvy::dotenv;
use schoolgate::router::init_router;
use schoolgate::state::init_app_state;
use schoolgate_config::ServerConfig;
use schoolgate_observability::{init_tracing, shutdown_tracer};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    if let Err(e) = serve().await {
        error!(error = %format!("{e:#}"), "Server failed");
        shutdown_tracer().await;
        std::process::exit(1);
    }

    shutdown_tracer().await;
}

async fn serve() -> anyhow::Result<()> {
    let state = init_app_state().await?;
    let store = state.store.clone();
    let app = init_router(state);

    let server_config = ServerConfig::from_env();
    let listener = tokio::net::TcpListener::bind(&server_config.addr).await?;

    info!(addr = %server_config.addr, backend = store.backend_name(), "Server running");
    info!("Swagger UI available at /swagger-ui, Scalar UI at /scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    info!("Flushing committed access configuration");
    store.flush().await?;
    Ok(())
}
