// src/models/resposta.rs

// Corpos de resposta pequenos, compartilhados pelos handlers
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct RemovidoResponse {
    #[schema(example = true)]
    pub removido: bool,
}

impl RemovidoResponse {
    pub fn ok() -> Self {
        Self { removido: true }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TotalResponse {
    #[schema(example = 3)]
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnidadesRespostaResponse {
    #[schema(example = json!(["COJUR", "SMDU"]))]
    pub unidades: Vec<String>,
}
