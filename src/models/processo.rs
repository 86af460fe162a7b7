// src/models/processo.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::pagination::Paginacao;
use crate::models::situacao::Situacao;

// --- PROCESSO (como sai do banco, já com o JOIN do interessado) ---

#[derive(Debug, Clone, FromRow)]
pub struct ProcessoDetalhado {
    pub id: Uuid,
    pub numero_sei: String,
    pub assunto: String,
    pub origem: String,
    pub observacoes: Option<String>,
    pub interessado_id: Option<Uuid>,
    // Nome do interessado vinculado (LEFT JOIN)
    pub interessado: Option<String>,
    pub unidade_remetente: String,
    pub unidade_destino: Option<String>,
    pub prazo: Option<NaiveDate>,
    pub prorrogacao: Option<NaiveDate>,
    pub resposta_final: Option<String>,
    pub unidade_resposta_final: Option<String>,
    pub data_resposta_final: Option<NaiveDate>,
    pub situacao: Situacao,
    // Calculado: existe ao menos um andamento concluído
    pub concluido: bool,
    pub criado_por: Uuid,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

// --- ANDAMENTO ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Andamento {
    pub id: Uuid,
    pub processo_id: Uuid,
    #[schema(example = "COJUR")]
    pub origem: String,
    #[schema(example = "SMDU")]
    pub destino: String,
    pub observacoes: Option<String>,
    pub concluido: bool,
    pub criado_por: Uuid,
    pub criado_em: DateTime<Utc>,
}

// --- PROJEÇÃO DE RESPOSTA ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessoResponse {
    pub id: Uuid,
    #[serde(rename = "numero_sei")]
    #[schema(example = "6016.2024/0001234-5")]
    pub numero_sei: String,
    pub assunto: String,
    pub origem: String,
    pub observacoes: Option<String>,
    pub interessado_id: Option<Uuid>,
    #[schema(example = "João Silva")]
    pub interessado: Option<String>,
    pub unidade_remetente: String,
    pub unidade_destino: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2026-10-18")]
    pub prazo: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub prorrogacao: Option<NaiveDate>,
    pub concluido: bool,
    pub resposta_final: Option<String>,
    pub unidade_resposta_final: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub data_resposta_final: Option<NaiveDate>,
    pub criado_por: Uuid,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

impl From<ProcessoDetalhado> for ProcessoResponse {
    fn from(p: ProcessoDetalhado) -> Self {
        Self {
            id: p.id,
            numero_sei: p.numero_sei,
            assunto: p.assunto,
            origem: p.origem,
            observacoes: p.observacoes,
            interessado_id: p.interessado_id,
            interessado: p.interessado,
            unidade_remetente: p.unidade_remetente,
            unidade_destino: p.unidade_destino,
            prazo: p.prazo,
            prorrogacao: p.prorrogacao,
            concluido: p.concluido,
            resposta_final: p.resposta_final,
            unidade_resposta_final: p.unidade_resposta_final,
            data_resposta_final: p.data_resposta_final,
            criado_por: p.criado_por,
            criado_em: p.criado_em,
            atualizado_em: p.atualizado_em,
        }
    }
}

// --- ENTRADAS DE REPOSITÓRIO ---

#[derive(Debug, Clone)]
pub struct NovoProcesso {
    pub numero_sei: String,
    pub assunto: String,
    pub origem: String,
    pub observacoes: Option<String>,
    pub interessado_id: Option<Uuid>,
    pub unidade_remetente: String,
    pub unidade_destino: Option<String>,
    pub prazo: Option<NaiveDate>,
    pub prorrogacao: Option<NaiveDate>,
    pub criado_por: Uuid,
}

// Campos ausentes (None) ficam inalterados
#[derive(Debug, Clone, Default)]
pub struct AlteracoesProcesso {
    pub numero_sei: Option<String>,
    pub assunto: Option<String>,
    pub origem: Option<String>,
    pub observacoes: Option<String>,
    pub interessado_id: Option<Uuid>,
    pub unidade_remetente: Option<String>,
    pub unidade_destino: Option<String>,
    pub prazo: Option<NaiveDate>,
    pub prorrogacao: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NovoAndamento {
    pub processo_id: Uuid,
    pub origem: String,
    pub destino: String,
    pub observacoes: Option<String>,
    pub concluido: bool,
    pub criado_por: Uuid,
}

#[derive(Debug, Clone)]
pub struct RespostaFinal {
    pub processo_id: Uuid,
    pub unidade: String,
    pub texto: String,
    pub data_resposta: NaiveDate,
    pub usuario_id: Uuid,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProcessoPayload {
    #[serde(rename = "numero_sei")]
    #[validate(length(min = 1, max = 64, message = "O número SEI é obrigatório."))]
    #[schema(example = "6016.2024/0001234-5")]
    pub numero_sei: String,

    #[validate(length(min = 1, message = "O assunto é obrigatório."))]
    #[schema(example = "Licença de obra")]
    pub assunto: String,

    #[validate(length(min = 1, message = "A origem é obrigatória."))]
    #[schema(example = "Ministério Público")]
    pub origem: String,

    pub observacoes: Option<String>,

    pub interessado_id: Option<Uuid>,

    #[validate(length(min = 1, message = "A unidade remetente é obrigatória."))]
    #[schema(example = "COJUR")]
    pub unidade_remetente: String,

    pub unidade_destino: Option<String>,

    #[schema(value_type = Option<String>, format = Date, example = "2026-10-30")]
    pub prazo: Option<NaiveDate>,

    #[schema(value_type = Option<String>, format = Date)]
    pub prorrogacao: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProcessoPayload {
    #[serde(rename = "numero_sei")]
    #[validate(length(min = 1, max = 64, message = "O número SEI não pode ser vazio."))]
    pub numero_sei: Option<String>,
    #[validate(length(min = 1, message = "O assunto não pode ser vazio."))]
    pub assunto: Option<String>,
    #[validate(length(min = 1, message = "A origem não pode ser vazia."))]
    pub origem: Option<String>,
    pub observacoes: Option<String>,
    pub interessado_id: Option<Uuid>,
    #[validate(length(min = 1, message = "A unidade remetente não pode ser vazia."))]
    pub unidade_remetente: Option<String>,
    pub unidade_destino: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub prazo: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub prorrogacao: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAndamentoPayload {
    #[validate(length(min = 1, message = "A unidade de origem é obrigatória."))]
    pub origem: String,
    #[validate(length(min = 1, message = "A unidade de destino é obrigatória."))]
    pub destino: String,
    pub observacoes: Option<String>,
    #[serde(default)]
    pub concluido: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRespostaFinalPayload {
    pub processo_id: Uuid,
    #[validate(length(min = 1, message = "A unidade respondida é obrigatória."))]
    #[schema(example = "SMDU")]
    pub unidade: String,
    #[validate(length(min = 1, message = "O texto da resposta é obrigatório."))]
    pub resposta: String,
    // Quando ausente, usa a data de hoje
    #[schema(value_type = Option<String>, format = Date)]
    pub data_resposta: Option<NaiveDate>,
}

// --- FILTROS DE BUSCA ---

/// Parâmetros crus da query string de `GET /processos`.
///
/// Tudo chega como texto: a conversão tolerante (números inválidos viram o
/// padrão, booleanos só valem com o literal `true`) fica em [`FiltrosProcesso`].
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BuscarProcessoQuery {
    /// Número da página (padrão 1)
    pub pagina: Option<String>,
    /// Itens por página (padrão 10)
    pub limite: Option<String>,
    /// Termo de busca geral (número SEI, assunto, origem, observações, interessado, unidades e andamentos)
    pub busca: Option<String>,
    pub interessado: Option<String>,
    pub unidade_remetente: Option<String>,
    pub unidade_destino: Option<String>,
    /// Prazo ou prorrogação vence hoje
    pub vencendo_hoje: Option<String>,
    /// Prazo ou prorrogação já venceu e o processo não foi concluído
    pub atrasados: Option<String>,
    /// Processos com andamento concluído
    pub concluidos: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FiltrosProcesso {
    pub paginacao: Paginacao,
    pub busca: Option<String>,
    pub interessado: Option<String>,
    pub unidade_remetente: Option<String>,
    pub unidade_destino: Option<String>,
    pub vencendo_hoje: bool,
    pub atrasados: bool,
    pub concluidos: bool,
}

impl From<BuscarProcessoQuery> for FiltrosProcesso {
    fn from(q: BuscarProcessoQuery) -> Self {
        Self {
            paginacao: Paginacao::from_raw(q.pagina.as_deref(), q.limite.as_deref()),
            busca: termo(q.busca),
            interessado: termo(q.interessado),
            unidade_remetente: termo(q.unidade_remetente),
            unidade_destino: termo(q.unidade_destino),
            vencendo_hoje: flag(q.vencendo_hoje.as_deref()),
            atrasados: flag(q.atrasados.as_deref()),
            concluidos: flag(q.concluidos.as_deref()),
        }
    }
}

// Termo vazio (ou só espaços) é o mesmo que ausente
fn termo(valor: Option<String>) -> Option<String> {
    valor
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn flag(valor: Option<&str>) -> bool {
    valor == Some("true")
}
