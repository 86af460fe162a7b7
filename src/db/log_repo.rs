// src/db/log_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{common::error::AppError, models::log::RegistroLog};

#[async_trait]
pub trait LogStore: Send + Sync {
    async fn registrar(&self, registro: &RegistroLog) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgLogRepository {
    pool: PgPool,
}

impl PgLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogStore for PgLogRepository {
    async fn registrar(&self, registro: &RegistroLog) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO logs (acao, entidade, entidade_id, usuario_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(registro.acao.as_str())
        .bind(registro.entidade)
        .bind(registro.entidade_id)
        .bind(registro.usuario_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
