// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{PgInteressadoRepository, PgLogRepository, PgProcessoRepository, PgUnidadeRepository},
    services::{
        auth::AuthService, interessado_service::InteressadoService, log_service::LogService,
        processo_service::ProcessoService, unidade_service::UnidadeService,
    },
};

const BIND_ADDR_PADRAO: &str = "0.0.0.0:3000";
const MAX_CONEXOES_PADRAO: u32 = 5;
const ACQUIRE_TIMEOUT_PADRAO: u64 = 3;

/// Configuração lida das variáveis de ambiente (com `.env` opcional).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Sem .env tudo bem: em produção as variáveis vêm do ambiente
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| BIND_ADDR_PADRAO.to_string());

        let db_max_connections = opcional("DB_MAX_CONNECTIONS", MAX_CONEXOES_PADRAO)?;
        let acquire_timeout_secs = opcional("DB_ACQUIRE_TIMEOUT_SECS", ACQUIRE_TIMEOUT_PADRAO)?;

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            db_max_connections,
            db_acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        })
    }
}

// Variável numérica opcional: ausente usa o padrão, inválida é erro
fn opcional<T>(nome: &str, padrao: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(nome) {
        Ok(valor) => valor
            .trim()
            .parse()
            .with_context(|| format!("{} inválida: '{}'", nome, valor)),
        Err(_) => Ok(padrao),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub processo_service: ProcessoService,
    pub interessado_service: InteressadoService,
    pub unidade_service: UnidadeService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config.jwt_secret.clone()))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, jwt_secret: String) -> Self {
        let interessado_repo = Arc::new(PgInteressadoRepository::new(db_pool.clone()));
        let logs = LogService::new(Arc::new(PgLogRepository::new(db_pool.clone())));

        let processo_service = ProcessoService::new(
            Arc::new(PgProcessoRepository::new(db_pool.clone())),
            interessado_repo.clone(),
            logs.clone(),
        );
        let interessado_service = InteressadoService::new(interessado_repo, logs.clone());
        let unidade_service =
            UnidadeService::new(Arc::new(PgUnidadeRepository::new(db_pool.clone())), logs);

        Self {
            db_pool,
            auth_service: AuthService::new(jwt_secret),
            processo_service,
            interessado_service,
            unidade_service,
        }
    }
}
