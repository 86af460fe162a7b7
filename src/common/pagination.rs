// src/common/pagination.rs

use serde::Serialize;
use utoipa::ToSchema;

pub const PAGINA_PADRAO: u32 = 1;
pub const LIMITE_PADRAO: u32 = 10;
pub const LIMITE_MAXIMO: u32 = 100;

/// Página solicitada, já normalizada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginacao {
    pub pagina: u32,
    pub limite: u32,
}

impl Default for Paginacao {
    fn default() -> Self {
        Self {
            pagina: PAGINA_PADRAO,
            limite: LIMITE_PADRAO,
        }
    }
}

impl Paginacao {
    /// Converte os valores crus da query string.
    ///
    /// Valores ausentes, não numéricos ou menores que 1 caem no padrão;
    /// o limite é travado em [`LIMITE_MAXIMO`].
    pub fn from_raw(pagina: Option<&str>, limite: Option<&str>) -> Self {
        let pagina = parse_positivo(pagina).unwrap_or(PAGINA_PADRAO);
        let limite = parse_positivo(limite)
            .unwrap_or(LIMITE_PADRAO)
            .min(LIMITE_MAXIMO);
        Self { pagina, limite }
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.pagina) - 1) * i64::from(self.limite)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limite)
    }
}

fn parse_positivo(valor: Option<&str>) -> Option<u32> {
    valor
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v >= 1)
}

/// Resposta paginada, reaproveitada por todas as listagens.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginado<T> {
    pub dados: Vec<T>,
    pub total: i64,
    pub pagina: u32,
    pub limite: u32,
    pub total_paginas: i64,
}

impl<T> Paginado<T> {
    pub fn new(dados: Vec<T>, paginacao: Paginacao, total: i64) -> Self {
        let limite = i64::from(paginacao.limite);
        let total_paginas = if limite > 0 { (total + limite - 1) / limite } else { 0 };

        Self {
            dados,
            total,
            pagina: paginacao.pagina,
            limite: paginacao.limite,
            total_paginas,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginado<U> {
        Paginado {
            dados: self.dados.into_iter().map(f).collect(),
            total: self.total,
            pagina: self.pagina,
            limite: self.limite,
            total_paginas: self.total_paginas,
        }
    }
}
