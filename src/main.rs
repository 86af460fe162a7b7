//src/main.rs

use anyhow::Context;
use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::handlers::{interessados, processos, sistema, unidades};
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; sem ele, "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados.")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {}", config.bind_addr))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .context("Erro no servidor Axum")?;

    Ok(())
}

fn router(app_state: AppState) -> Router {
    let processo_routes = Router::new()
        .route("/"
               ,get(processos::search)
               .post(processos::create)
        )
        .route("/origens/autocomplete", get(processos::autocomplete_origens))
        .route("/contar/vencendo-hoje", get(processos::contar_vencendo_hoje))
        .route("/contar/atrasados", get(processos::contar_atrasados))
        .route("/resposta-final", post(processos::create_resposta_final))
        .route("/numero-sei/{numero_sei}", get(processos::find_by_numero_sei))
        .route("/{id}"
               ,get(processos::find_by_id)
               .patch(processos::update)
               .delete(processos::remove)
        )
        .route("/{id}/unidades-resposta", get(processos::unidades_resposta))
        .route("/{id}/andamentos"
               ,get(processos::list_andamentos)
               .post(processos::create_andamento)
        );

    let unidade_routes = Router::new()
        .route("/"
               ,get(unidades::search)
               .post(unidades::create)
        )
        .route("/lista-completa", get(unidades::lista_completa))
        .route("/{id}"
               ,get(unidades::find_by_id)
               .patch(unidades::update)
               .delete(unidades::remove)
        )
        .route("/{id}/reativar", patch(unidades::reativar));

    let interessado_routes = Router::new()
        .route("/"
               ,get(interessados::lista_completa)
               .post(interessados::create)
        )
        .route("/lista-completa", get(interessados::lista_completa))
        .route("/autocomplete", get(interessados::autocomplete))
        .route("/{id}"
               ,get(interessados::find_by_id)
               .patch(interessados::update)
               .delete(interessados::remove)
        );

    // Tudo abaixo exige um JWT válido
    let protected_routes = Router::new()
        .nest("/processos", processo_routes)
        .nest("/unidades", unidade_routes)
        .nest("/interessados", interessado_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(sistema::health))
        .route("/api/docs/openapi.json", get(sistema::openapi_json))
        .nest("/api", protected_routes)
        .with_state(app_state)
}
