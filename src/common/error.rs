// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Erros de domínio. A mensagem do `#[error]` é a usada nos logs;
// a mensagem para o cliente sai de `to_api_error`, no idioma pedido.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Processo não encontrado")]
    ProcessoNotFound,

    #[error("Interessado não encontrado")]
    InteressadoNotFound,

    #[error("Unidade não encontrada")]
    UnidadeNotFound,

    #[error("Número SEI duplicado")]
    NumeroSeiAlreadyExists,

    #[error("Interessado duplicado")]
    InteressadoAlreadyExists,

    #[error("Unidade duplicada")]
    UnidadeAlreadyExists,

    #[error("Interessado vinculado a {0} processo(s) ativo(s)")]
    InteressadoInUse(i64),

    #[error("Unidade vinculada a {0} processo(s) ativo(s)")]
    UnidadeInUse(i64),

    #[error("Unidade já está ativa")]
    UnidadeAlreadyActive,

    #[error("Processo sem andamentos")]
    ProcessoSemAndamentos,

    #[error("Unidade '{0}' não pode responder este processo")]
    UnidadeRespostaInvalida(String),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

/// Erro pronto para ser devolvido ao cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    /// Erro de validação para um único campo, no mesmo formato do `validator`.
    pub fn campo_invalido(campo: &'static str, mensagem: &'static str) -> Self {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new("invalid");
        err.message = Some(mensagem.into());
        errors.add(campo, err);
        AppError::ValidationError(errors)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::UnidadeAlreadyActive
            | AppError::ProcessoSemAndamentos
            | AppError::UnidadeRespostaInvalida(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::ProcessoNotFound
            | AppError::InteressadoNotFound
            | AppError::UnidadeNotFound => StatusCode::NOT_FOUND,
            AppError::NumeroSeiAlreadyExists
            | AppError::InteressadoAlreadyExists
            | AppError::UnidadeAlreadyExists
            | AppError::InteressadoInUse(_)
            | AppError::UnidadeInUse(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Mensagem legível para o cliente, em português (padrão) ou inglês.
    pub fn message(&self, locale: &Locale) -> String {
        let en = locale.is_english();
        match self {
            AppError::ValidationError(_) if en => "One or more fields are invalid.".into(),
            AppError::ValidationError(_) => "Um ou mais campos são inválidos.".into(),
            AppError::ProcessoNotFound if en => "Case file not found.".into(),
            AppError::ProcessoNotFound => "Processo não encontrado.".into(),
            AppError::InteressadoNotFound if en => "Stakeholder not found.".into(),
            AppError::InteressadoNotFound => "Interessado não encontrado.".into(),
            AppError::UnidadeNotFound if en => "Unit not found.".into(),
            AppError::UnidadeNotFound => "Unidade não encontrada.".into(),
            AppError::NumeroSeiAlreadyExists if en => {
                "A case file with this SEI number already exists.".into()
            }
            AppError::NumeroSeiAlreadyExists => "Já existe um processo com este número SEI.".into(),
            AppError::InteressadoAlreadyExists if en => {
                "An active stakeholder with this name already exists.".into()
            }
            AppError::InteressadoAlreadyExists => "Já existe um interessado com este nome.".into(),
            AppError::UnidadeAlreadyExists if en => "An active unit with this name already exists.".into(),
            AppError::UnidadeAlreadyExists => "Já existe uma unidade ativa com este nome.".into(),
            AppError::InteressadoInUse(n) if en => format!(
                "This stakeholder cannot be removed because {} active case file(s) reference it.",
                n
            ),
            AppError::InteressadoInUse(n) => format!(
                "Não é possível remover este interessado pois existem {} processo(s) ativo(s) vinculado(s).",
                n
            ),
            AppError::UnidadeInUse(n) if en => format!(
                "This unit cannot be removed because {} active case file(s) reference it.",
                n
            ),
            AppError::UnidadeInUse(n) => format!(
                "Não é possível remover esta unidade pois existem {} processo(s) ativo(s) vinculado(s).",
                n
            ),
            AppError::UnidadeAlreadyActive if en => "Unit is already active.".into(),
            AppError::UnidadeAlreadyActive => "Unidade já está ativa.".into(),
            AppError::ProcessoSemAndamentos if en => "Case file has no progress entries.".into(),
            AppError::ProcessoSemAndamentos => "O processo não possui andamentos.".into(),
            AppError::UnidadeRespostaInvalida(u) if en => {
                format!("Unit '{}' is not eligible to answer this case file.", u)
            }
            AppError::UnidadeRespostaInvalida(u) => {
                format!("A unidade '{}' não está disponível para resposta deste processo.", u)
            }
            AppError::InvalidToken if en => "Invalid or missing authentication token.".into(),
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.".into(),
            AppError::Forbidden if en => "You are not allowed to perform this action.".into(),
            AppError::Forbidden => "Você não tem permissão para realizar esta ação.".into(),
            AppError::DatabaseError(_) | AppError::InternalServerError(_) if en => {
                "An unexpected error occurred.".into()
            }
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                "Ocorreu um erro inesperado.".into()
            }
        }
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica só no log, nunca vai para o cliente
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            _ => None,
        };

        ApiError {
            status,
            error: self.message(locale),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}
