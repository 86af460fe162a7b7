// src/models/situacao.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Estado de ciclo de vida de um registro (soft delete).
///
/// Mapeia o `CREATE TYPE situacao_registro` do banco. Registros nunca são
/// apagados fisicamente: a remoção apenas leva o registro para `Inativo`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "situacao_registro", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Situacao {
    #[default]
    Ativo,
    Inativo,
}

impl Situacao {
    pub fn is_ativo(self) -> bool {
        self == Situacao::Ativo
    }
}
