// src/models/interessado.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::situacao::Situacao;

#[derive(Debug, Clone, FromRow)]
pub struct Interessado {
    pub id: Uuid,
    pub valor: String,
    pub situacao: Situacao,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

// O que sai para o Frontend
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InteressadoResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "João Silva")]
    pub valor: String,
    pub situacao: Situacao,
    pub criado_em: DateTime<Utc>,
}

impl From<Interessado> for InteressadoResponse {
    fn from(i: Interessado) -> Self {
        Self {
            id: i.id,
            valor: i.valor,
            situacao: i.situacao,
            criado_em: i.criado_em,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInteressadoPayload {
    #[validate(length(min = 1, max = 255, message = "O nome do interessado é obrigatório."))]
    #[schema(example = "João Silva")]
    pub valor: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInteressadoPayload {
    #[validate(length(min = 1, max = 255, message = "O nome do interessado não pode ser vazio."))]
    pub valor: Option<String>,
}
