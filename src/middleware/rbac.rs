// src/middleware/rbac.rs

use crate::models::auth::Perfil;

/// Operações protegidas expostas pela API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operacao {
    ProcessoLer,
    ProcessoCriar,
    ProcessoAtualizar,
    ProcessoRemover,
    AndamentoCriar,
    RespostaFinalCriar,
    UnidadeLer,
    UnidadeEscrever,
    InteressadoLer,
    InteressadoEscrever,
    InteressadoRemover,
}

/// Tabela única de autorização: o perfil pode executar a operação?
pub fn permitido(perfil: Perfil, operacao: Operacao) -> bool {
    use Operacao::*;
    use Perfil::*;

    match operacao {
        // Leituras: qualquer perfil
        ProcessoLer | UnidadeLer | InteressadoLer => true,
        // Resposta final: qualquer usuário autenticado
        RespostaFinalCriar => true,
        ProcessoCriar | ProcessoAtualizar | AndamentoCriar | InteressadoEscrever => {
            matches!(perfil, Adm | Tec)
        }
        ProcessoRemover | UnidadeEscrever | InteressadoRemover => perfil == Adm,
    }
}
