// src/db/processo_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Paginacao},
    db::filtro::{padrao_contem, push_predicado, Predicado},
    models::{
        processo::{AlteracoesProcesso, Andamento, NovoAndamento, NovoProcesso, ProcessoDetalhado, RespostaFinal},
        situacao::Situacao,
    },
};

/// Acesso aos processos e seus andamentos.
#[async_trait]
pub trait ProcessoStore: Send + Sync {
    /// Total de processos que atendem ao filtro (ignora paginação)
    async fn count(&self, filtro: &Predicado) -> Result<i64, AppError>;

    /// Uma página do resultado, do mais novo para o mais antigo
    async fn find_many(
        &self,
        filtro: &Predicado,
        paginacao: Paginacao,
    ) -> Result<Vec<ProcessoDetalhado>, AppError>;

    async fn find_first(&self, filtro: &Predicado) -> Result<Option<ProcessoDetalhado>, AppError>;

    async fn create(&self, novo: NovoProcesso) -> Result<Uuid, AppError>;

    async fn update(&self, id: Uuid, alteracoes: AlteracoesProcesso) -> Result<(), AppError>;

    async fn set_situacao(&self, id: Uuid, situacao: Situacao) -> Result<(), AppError>;

    /// Andamentos do processo, do mais antigo para o mais novo
    async fn list_andamentos(&self, processo_id: Uuid) -> Result<Vec<Andamento>, AppError>;

    async fn create_andamento(&self, novo: NovoAndamento) -> Result<Andamento, AppError>;

    /// Grava a resposta final e o andamento de conclusão, atomicamente
    async fn registrar_resposta_final(&self, resposta: RespostaFinal) -> Result<(), AppError>;

    async fn autocomplete_origens(&self, termo: &str, limite: i64) -> Result<Vec<String>, AppError>;
}

const SELECT_PROCESSO: &str = r#"
    SELECT
        p.id, p.numero_sei, p.assunto, p.origem, p.observacoes,
        p.interessado_id, i.valor AS interessado,
        p.unidade_remetente, p.unidade_destino,
        p.prazo, p.prorrogacao,
        p.resposta_final, p.unidade_resposta_final, p.data_resposta_final,
        p.situacao,
        EXISTS (
            SELECT 1 FROM andamentos a WHERE a.processo_id = p.id AND a.concluido
        ) AS concluido,
        p.criado_por, p.criado_em, p.atualizado_em
    FROM processos p
    LEFT JOIN interessados i ON i.id = p.interessado_id
    WHERE "#;

const COUNT_PROCESSO: &str = r#"
    SELECT COUNT(*)
    FROM processos p
    LEFT JOIN interessados i ON i.id = p.interessado_id
    WHERE "#;

const ORDEM_PADRAO: &str = " ORDER BY p.criado_em DESC, p.id DESC";

#[derive(Clone)]
pub struct PgProcessoRepository {
    pool: PgPool,
}

impl PgProcessoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Converte violação de chave única no erro de domínio
fn numero_sei_duplicado(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::NumeroSeiAlreadyExists;
        }
    }
    e.into()
}

pub(crate) fn build_find_many(filtro: &Predicado, paginacao: Paginacao) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(SELECT_PROCESSO);
    push_predicado(&mut qb, filtro);
    qb.push(ORDEM_PADRAO)
        .push(" LIMIT ")
        .push_bind(paginacao.limit())
        .push(" OFFSET ")
        .push_bind(paginacao.offset());
    qb
}

#[async_trait]
impl ProcessoStore for PgProcessoRepository {
    async fn count(&self, filtro: &Predicado) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(COUNT_PROCESSO);
        push_predicado(&mut qb, filtro);

        let total = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn find_many(
        &self,
        filtro: &Predicado,
        paginacao: Paginacao,
    ) -> Result<Vec<ProcessoDetalhado>, AppError> {
        let mut qb = build_find_many(filtro, paginacao);

        let processos = qb
            .build_query_as::<ProcessoDetalhado>()
            .fetch_all(&self.pool)
            .await?;
        Ok(processos)
    }

    async fn find_first(&self, filtro: &Predicado) -> Result<Option<ProcessoDetalhado>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_PROCESSO);
        push_predicado(&mut qb, filtro);
        qb.push(ORDEM_PADRAO).push(" LIMIT 1");

        let processo = qb
            .build_query_as::<ProcessoDetalhado>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(processo)
    }

    async fn create(&self, novo: NovoProcesso) -> Result<Uuid, AppError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO processos (
                numero_sei, assunto, origem, observacoes, interessado_id,
                unidade_remetente, unidade_destino, prazo, prorrogacao, criado_por
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&novo.numero_sei)
        .bind(&novo.assunto)
        .bind(&novo.origem)
        .bind(&novo.observacoes)
        .bind(novo.interessado_id)
        .bind(&novo.unidade_remetente)
        .bind(&novo.unidade_destino)
        .bind(novo.prazo)
        .bind(novo.prorrogacao)
        .bind(novo.criado_por)
        .fetch_one(&self.pool)
        .await
        .map_err(numero_sei_duplicado)?;

        Ok(id)
    }

    async fn update(&self, id: Uuid, alteracoes: AlteracoesProcesso) -> Result<(), AppError> {
        // COALESCE: parâmetro NULL mantém o valor atual
        sqlx::query(
            r#"
            UPDATE processos SET
                numero_sei = COALESCE($2, numero_sei),
                assunto = COALESCE($3, assunto),
                origem = COALESCE($4, origem),
                observacoes = COALESCE($5, observacoes),
                interessado_id = COALESCE($6, interessado_id),
                unidade_remetente = COALESCE($7, unidade_remetente),
                unidade_destino = COALESCE($8, unidade_destino),
                prazo = COALESCE($9, prazo),
                prorrogacao = COALESCE($10, prorrogacao),
                atualizado_em = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(alteracoes.numero_sei)
        .bind(alteracoes.assunto)
        .bind(alteracoes.origem)
        .bind(alteracoes.observacoes)
        .bind(alteracoes.interessado_id)
        .bind(alteracoes.unidade_remetente)
        .bind(alteracoes.unidade_destino)
        .bind(alteracoes.prazo)
        .bind(alteracoes.prorrogacao)
        .execute(&self.pool)
        .await
        .map_err(numero_sei_duplicado)?;

        Ok(())
    }

    async fn set_situacao(&self, id: Uuid, situacao: Situacao) -> Result<(), AppError> {
        sqlx::query("UPDATE processos SET situacao = $2, atualizado_em = NOW() WHERE id = $1")
            .bind(id)
            .bind(situacao)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_andamentos(&self, processo_id: Uuid) -> Result<Vec<Andamento>, AppError> {
        let andamentos = sqlx::query_as::<_, Andamento>(
            r#"
            SELECT id, processo_id, origem, destino, observacoes, concluido, criado_por, criado_em
            FROM andamentos
            WHERE processo_id = $1
            ORDER BY criado_em ASC, id ASC
            "#,
        )
        .bind(processo_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(andamentos)
    }

    async fn create_andamento(&self, novo: NovoAndamento) -> Result<Andamento, AppError> {
        let andamento = sqlx::query_as::<_, Andamento>(
            r#"
            INSERT INTO andamentos (processo_id, origem, destino, observacoes, concluido, criado_por)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, processo_id, origem, destino, observacoes, concluido, criado_por, criado_em
            "#,
        )
        .bind(novo.processo_id)
        .bind(&novo.origem)
        .bind(&novo.destino)
        .bind(&novo.observacoes)
        .bind(novo.concluido)
        .bind(novo.criado_por)
        .fetch_one(&self.pool)
        .await?;

        Ok(andamento)
    }

    async fn registrar_resposta_final(&self, resposta: RespostaFinal) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let remetente = sqlx::query_scalar::<_, String>(
            r#"
            UPDATE processos SET
                resposta_final = $2,
                unidade_resposta_final = $3,
                data_resposta_final = $4,
                atualizado_em = NOW()
            WHERE id = $1 AND situacao = 'ATIVO'
            RETURNING unidade_remetente
            "#,
        )
        .bind(resposta.processo_id)
        .bind(&resposta.texto)
        .bind(&resposta.unidade)
        .bind(resposta.data_resposta)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::ProcessoNotFound)?; // Sem commit: o drop do tx faz rollback

        // O andamento de conclusão volta da unidade respondida para a remetente
        sqlx::query(
            r#"
            INSERT INTO andamentos (processo_id, origem, destino, observacoes, concluido, criado_por)
            VALUES ($1, $2, $3, 'Resposta final', TRUE, $4)
            "#,
        )
        .bind(resposta.processo_id)
        .bind(&resposta.unidade)
        .bind(&remetente)
        .bind(resposta.usuario_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn autocomplete_origens(&self, termo: &str, limite: i64) -> Result<Vec<String>, AppError> {
        let origens = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT origem
            FROM processos
            WHERE situacao = 'ATIVO' AND origem ILIKE $1
            ORDER BY origem ASC
            LIMIT $2
            "#,
        )
        .bind(padrao_contem(termo))
        .bind(limite)
        .fetch_all(&self.pool)
        .await?;

        Ok(origens)
    }
}
