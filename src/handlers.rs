pub mod interessados;
pub mod processos;
pub mod sistema;
pub mod unidades;

use serde::Deserialize;
use utoipa::IntoParams;

/// `?includeInactive=true` das listas completas.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListaCompletaQuery {
    /// Inclui registros inativos (padrão: false)
    pub include_inactive: Option<String>,
}

impl ListaCompletaQuery {
    // Só o literal "true" liga a opção
    pub fn incluir_inativos(&self) -> bool {
        self.include_inactive.as_deref() == Some("true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inativos_so_com_true_literal() {
        let query = |v: Option<&str>| ListaCompletaQuery {
            include_inactive: v.map(str::to_string),
        };

        assert!(query(Some("true")).incluir_inativos());
        assert!(!query(Some("1")).incluir_inativos());
        assert!(!query(None).incluir_inativos());
    }
}
