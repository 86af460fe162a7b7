// src/db/interessado_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::filtro::padrao_contem,
    models::{interessado::Interessado, situacao::Situacao},
};

#[async_trait]
pub trait InteressadoStore: Send + Sync {
    async fn list(&self, incluir_inativos: bool) -> Result<Vec<Interessado>, AppError>;

    async fn search_by_term(&self, termo: &str, limite: i64) -> Result<Vec<Interessado>, AppError>;

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Interessado>, AppError>;

    /// Interessado ativo com exatamente este valor, opcionalmente ignorando um id
    async fn find_active_by_valor(
        &self,
        valor: &str,
        exceto: Option<Uuid>,
    ) -> Result<Option<Interessado>, AppError>;

    async fn create(&self, valor: &str) -> Result<Interessado, AppError>;

    async fn update_valor(&self, id: Uuid, valor: &str) -> Result<Interessado, AppError>;

    /// Quantos processos ativos apontam para o interessado
    async fn count_processos_ativos(&self, id: Uuid) -> Result<i64, AppError>;

    async fn set_situacao(&self, id: Uuid, situacao: Situacao) -> Result<Interessado, AppError>;
}

const COLUNAS: &str = "id, valor, situacao, criado_em, atualizado_em";

#[derive(Clone)]
pub struct PgInteressadoRepository {
    pool: PgPool,
}

impl PgInteressadoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// O índice único parcial é a fonte da verdade contra duplicatas concorrentes
fn valor_duplicado(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::InteressadoAlreadyExists;
        }
    }
    e.into()
}

#[async_trait]
impl InteressadoStore for PgInteressadoRepository {
    async fn list(&self, incluir_inativos: bool) -> Result<Vec<Interessado>, AppError> {
        let interessados = sqlx::query_as::<_, Interessado>(&format!(
            "SELECT {COLUNAS} FROM interessados WHERE ($1 OR situacao = 'ATIVO') ORDER BY valor ASC"
        ))
        .bind(incluir_inativos)
        .fetch_all(&self.pool)
        .await?;

        Ok(interessados)
    }

    async fn search_by_term(&self, termo: &str, limite: i64) -> Result<Vec<Interessado>, AppError> {
        let interessados = sqlx::query_as::<_, Interessado>(&format!(
            r#"
            SELECT {COLUNAS} FROM interessados
            WHERE situacao = 'ATIVO' AND valor ILIKE $1
            ORDER BY valor ASC
            LIMIT $2
            "#
        ))
        .bind(padrao_contem(termo))
        .bind(limite)
        .fetch_all(&self.pool)
        .await?;

        Ok(interessados)
    }

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Interessado>, AppError> {
        let interessado = sqlx::query_as::<_, Interessado>(&format!(
            "SELECT {COLUNAS} FROM interessados WHERE id = $1 AND situacao = 'ATIVO'"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(interessado)
    }

    async fn find_active_by_valor(
        &self,
        valor: &str,
        exceto: Option<Uuid>,
    ) -> Result<Option<Interessado>, AppError> {
        let interessado = sqlx::query_as::<_, Interessado>(&format!(
            r#"
            SELECT {COLUNAS} FROM interessados
            WHERE valor = $1 AND situacao = 'ATIVO' AND ($2::uuid IS NULL OR id <> $2)
            LIMIT 1
            "#
        ))
        .bind(valor)
        .bind(exceto)
        .fetch_optional(&self.pool)
        .await?;

        Ok(interessado)
    }

    async fn create(&self, valor: &str) -> Result<Interessado, AppError> {
        sqlx::query_as::<_, Interessado>(&format!(
            "INSERT INTO interessados (valor) VALUES ($1) RETURNING {COLUNAS}"
        ))
        .bind(valor)
        .fetch_one(&self.pool)
        .await
        .map_err(valor_duplicado)
    }

    async fn update_valor(&self, id: Uuid, valor: &str) -> Result<Interessado, AppError> {
        sqlx::query_as::<_, Interessado>(&format!(
            "UPDATE interessados SET valor = $2, atualizado_em = NOW() WHERE id = $1 RETURNING {COLUNAS}"
        ))
        .bind(id)
        .bind(valor)
        .fetch_optional(&self.pool)
        .await
        .map_err(valor_duplicado)?
        .ok_or(AppError::InteressadoNotFound)
    }

    async fn count_processos_ativos(&self, id: Uuid) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM processos WHERE interessado_id = $1 AND situacao = 'ATIVO'",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn set_situacao(&self, id: Uuid, situacao: Situacao) -> Result<Interessado, AppError> {
        sqlx::query_as::<_, Interessado>(&format!(
            "UPDATE interessados SET situacao = $2, atualizado_em = NOW() WHERE id = $1 RETURNING {COLUNAS}"
        ))
        .bind(id)
        .bind(situacao)
        .fetch_optional(&self.pool)
        .await
        .map_err(valor_duplicado)?
        .ok_or(AppError::InteressadoNotFound)
    }
}
