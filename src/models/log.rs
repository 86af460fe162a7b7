// src/models/log.rs

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acao {
    Criar,
    Atualizar,
    Remover,
    Reativar,
    RespostaFinal,
    CriarAndamento,
}

impl Acao {
    pub fn as_str(self) -> &'static str {
        match self {
            Acao::Criar => "CRIAR",
            Acao::Atualizar => "ATUALIZAR",
            Acao::Remover => "REMOVER",
            Acao::Reativar => "REATIVAR",
            Acao::RespostaFinal => "RESPOSTA_FINAL",
            Acao::CriarAndamento => "CRIAR_ANDAMENTO",
        }
    }
}

/// Registro de uma ação feita por um usuário sobre uma entidade.
#[derive(Debug, Clone)]
pub struct RegistroLog {
    pub acao: Acao,
    pub entidade: &'static str,
    pub entidade_id: Option<Uuid>,
    pub usuario_id: Option<Uuid>,
}
