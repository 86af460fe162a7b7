// src/db/unidade_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Paginacao},
    db::filtro::padrao_contem,
    models::{situacao::Situacao, unidade::Unidade},
};

#[async_trait]
pub trait UnidadeStore: Send + Sync {
    /// Página de unidades ativas (opcionalmente filtradas por nome) e o total
    async fn search(
        &self,
        busca: Option<&str>,
        paginacao: Paginacao,
    ) -> Result<(Vec<Unidade>, i64), AppError>;

    async fn list(&self, incluir_inativos: bool) -> Result<Vec<Unidade>, AppError>;

    /// Busca em qualquer situação (a reativação precisa enxergar as inativas)
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Unidade>, AppError>;

    async fn find_active_by_nome(
        &self,
        nome: &str,
        exceto: Option<Uuid>,
    ) -> Result<Option<Unidade>, AppError>;

    async fn create(&self, nome: &str) -> Result<Unidade, AppError>;

    async fn update_nome(&self, id: Uuid, nome: &str) -> Result<Unidade, AppError>;

    async fn set_situacao(&self, id: Uuid, situacao: Situacao) -> Result<Unidade, AppError>;

    /// Processos ativos que têm a unidade como remetente ou destino
    async fn count_processos_ativos(&self, nome: &str) -> Result<i64, AppError>;
}

const COLUNAS: &str = "id, nome, situacao, criado_em, atualizado_em";

#[derive(Clone)]
pub struct PgUnidadeRepository {
    pool: PgPool,
}

impl PgUnidadeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn nome_duplicado(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::UnidadeAlreadyExists;
        }
    }
    e.into()
}

#[async_trait]
impl UnidadeStore for PgUnidadeRepository {
    async fn search(
        &self,
        busca: Option<&str>,
        paginacao: Paginacao,
    ) -> Result<(Vec<Unidade>, i64), AppError> {
        let padrao = busca.map(padrao_contem);

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM unidades WHERE situacao = 'ATIVO' AND ($1::text IS NULL OR nome ILIKE $1)",
        )
        .bind(&padrao)
        .fetch_one(&self.pool)
        .await?;

        let unidades = sqlx::query_as::<_, Unidade>(&format!(
            r#"
            SELECT {COLUNAS} FROM unidades
            WHERE situacao = 'ATIVO' AND ($1::text IS NULL OR nome ILIKE $1)
            ORDER BY nome ASC, id ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(&padrao)
        .bind(paginacao.limit())
        .bind(paginacao.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((unidades, total))
    }

    async fn list(&self, incluir_inativos: bool) -> Result<Vec<Unidade>, AppError> {
        let unidades = sqlx::query_as::<_, Unidade>(&format!(
            "SELECT {COLUNAS} FROM unidades WHERE ($1 OR situacao = 'ATIVO') ORDER BY nome ASC"
        ))
        .bind(incluir_inativos)
        .fetch_all(&self.pool)
        .await?;

        Ok(unidades)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Unidade>, AppError> {
        let unidade = sqlx::query_as::<_, Unidade>(&format!(
            "SELECT {COLUNAS} FROM unidades WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unidade)
    }

    async fn find_active_by_nome(
        &self,
        nome: &str,
        exceto: Option<Uuid>,
    ) -> Result<Option<Unidade>, AppError> {
        let unidade = sqlx::query_as::<_, Unidade>(&format!(
            r#"
            SELECT {COLUNAS} FROM unidades
            WHERE nome = $1 AND situacao = 'ATIVO' AND ($2::uuid IS NULL OR id <> $2)
            LIMIT 1
            "#
        ))
        .bind(nome)
        .bind(exceto)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unidade)
    }

    async fn create(&self, nome: &str) -> Result<Unidade, AppError> {
        sqlx::query_as::<_, Unidade>(&format!(
            "INSERT INTO unidades (nome) VALUES ($1) RETURNING {COLUNAS}"
        ))
        .bind(nome)
        .fetch_one(&self.pool)
        .await
        .map_err(nome_duplicado)
    }

    async fn update_nome(&self, id: Uuid, nome: &str) -> Result<Unidade, AppError> {
        sqlx::query_as::<_, Unidade>(&format!(
            "UPDATE unidades SET nome = $2, atualizado_em = NOW() WHERE id = $1 RETURNING {COLUNAS}"
        ))
        .bind(id)
        .bind(nome)
        .fetch_optional(&self.pool)
        .await
        .map_err(nome_duplicado)?
        .ok_or(AppError::UnidadeNotFound)
    }

    async fn set_situacao(&self, id: Uuid, situacao: Situacao) -> Result<Unidade, AppError> {
        sqlx::query_as::<_, Unidade>(&format!(
            "UPDATE unidades SET situacao = $2, atualizado_em = NOW() WHERE id = $1 RETURNING {COLUNAS}"
        ))
        .bind(id)
        .bind(situacao)
        .fetch_optional(&self.pool)
        .await
        .map_err(nome_duplicado)?
        .ok_or(AppError::UnidadeNotFound)
    }

    async fn count_processos_ativos(&self, nome: &str) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM processos
            WHERE situacao = 'ATIVO' AND (unidade_remetente = $1 OR unidade_destino = $1)
            "#,
        )
        .bind(nome)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
