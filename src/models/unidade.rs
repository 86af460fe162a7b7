// src/models/unidade.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::situacao::Situacao;

#[derive(Debug, Clone, FromRow)]
pub struct Unidade {
    pub id: Uuid,
    pub nome: String,
    pub situacao: Situacao,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnidadeResponse {
    pub id: Uuid,
    #[schema(example = "COJUR")]
    pub nome: String,
    pub situacao: Situacao,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

impl From<Unidade> for UnidadeResponse {
    fn from(u: Unidade) -> Self {
        Self {
            id: u.id,
            nome: u.nome,
            situacao: u.situacao,
            criado_em: u.criado_em,
            atualizado_em: u.atualizado_em,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnidadePayload {
    #[validate(length(min = 1, max = 255, message = "O nome da unidade é obrigatório."))]
    #[schema(example = "COJUR")]
    pub nome: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnidadePayload {
    #[validate(length(min = 1, max = 255, message = "O nome da unidade não pode ser vazio."))]
    pub nome: Option<String>,
}
