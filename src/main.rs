//src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;

/// Monta o router completo. Usado pelo `main` e pelos testes de handler.
pub(crate) fn app(app_state: AppState) -> Router {
    let manager_routes = Router::new()
        .route(
            "/",
            post(handlers::managers::create_manager)
                .get(handlers::managers::list_managers),
        )
        .route("/{external_id}", get(handlers::managers::get_manager));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/v1/managers", manager_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; padrão "info"
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let db_pool = config.connect().await?;

    sqlx::migrate!().run(&db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = app(AppState::new(db_pool));

    let listener = TcpListener::bind(config.server_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
