// src/db/filtro.rs

//! Árvore de predicados sobre processos.
//!
//! Os serviços montam a árvore a partir dos filtros da requisição; cada
//! repositório decide como avaliá-la. No PostgreSQL ela vira uma cláusula
//! WHERE com parâmetros vinculados (`push_predicado`).

use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::situacao::Situacao;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampoTexto {
    NumeroSei,
    Assunto,
    Origem,
    Observacoes,
    // Nome do interessado vinculado
    Interessado,
    UnidadeRemetente,
    UnidadeDestino,
}

impl CampoTexto {
    pub fn coluna(self) -> &'static str {
        match self {
            CampoTexto::NumeroSei => "p.numero_sei",
            CampoTexto::Assunto => "p.assunto",
            CampoTexto::Origem => "p.origem",
            CampoTexto::Observacoes => "p.observacoes",
            CampoTexto::Interessado => "i.valor",
            CampoTexto::UnidadeRemetente => "p.unidade_remetente",
            CampoTexto::UnidadeDestino => "p.unidade_destino",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampoData {
    Prazo,
    Prorrogacao,
}

impl CampoData {
    pub fn coluna(self) -> &'static str {
        match self {
            CampoData::Prazo => "p.prazo",
            CampoData::Prorrogacao => "p.prorrogacao",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparacao {
    Igual,
    Antes,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicado {
    /// Situação do processo
    Situacao(Situacao),
    IdIgual(Uuid),
    /// Igualdade exata (sensível a maiúsculas)
    Igual(CampoTexto, String),
    /// "Contém", sem diferenciar maiúsculas
    Contem(CampoTexto, String),
    Data(CampoData, Comparacao, NaiveDate),
    /// Algum andamento contém o termo na origem, destino ou observações
    AndamentoContem(String),
    /// Existe ao menos um andamento concluído
    AndamentoConcluido,
    E(Vec<Predicado>),
    Ou(Vec<Predicado>),
    Nao(Box<Predicado>),
}

impl Predicado {
    pub fn ativo() -> Self {
        Predicado::Situacao(Situacao::Ativo)
    }

    pub fn nao(p: Predicado) -> Self {
        Predicado::Nao(Box::new(p))
    }
}

/// Escapa os curingas do LIKE e envolve o termo em `%`.
pub fn padrao_contem(termo: &str) -> String {
    let mut escapado = String::with_capacity(termo.len() + 2);
    escapado.push('%');
    for c in termo.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escapado.push('\\');
        }
        escapado.push(c);
    }
    escapado.push('%');
    escapado
}

/// Escreve o predicado no builder. Todo valor do usuário entra como bind.
pub fn push_predicado(qb: &mut QueryBuilder<'_, Postgres>, predicado: &Predicado) {
    match predicado {
        Predicado::Situacao(situacao) => {
            qb.push("p.situacao = ").push_bind(*situacao);
        }
        Predicado::IdIgual(id) => {
            qb.push("p.id = ").push_bind(*id);
        }
        Predicado::Igual(campo, valor) => {
            qb.push(campo.coluna()).push(" = ").push_bind(valor.clone());
        }
        Predicado::Contem(campo, termo) => {
            qb.push(campo.coluna())
                .push(" ILIKE ")
                .push_bind(padrao_contem(termo));
        }
        Predicado::Data(campo, comparacao, data) => {
            let operador = match comparacao {
                Comparacao::Igual => " = ",
                Comparacao::Antes => " < ",
            };
            qb.push(campo.coluna()).push(operador).push_bind(*data);
        }
        Predicado::AndamentoContem(termo) => {
            let padrao = padrao_contem(termo);
            qb.push("EXISTS (SELECT 1 FROM andamentos a WHERE a.processo_id = p.id AND (a.origem ILIKE ")
                .push_bind(padrao.clone())
                .push(" OR a.destino ILIKE ")
                .push_bind(padrao.clone())
                .push(" OR a.observacoes ILIKE ")
                .push_bind(padrao)
                .push("))");
        }
        Predicado::AndamentoConcluido => {
            qb.push("EXISTS (SELECT 1 FROM andamentos a WHERE a.processo_id = p.id AND a.concluido)");
        }
        Predicado::E(itens) => push_grupo(qb, itens, " AND ", "TRUE"),
        Predicado::Ou(itens) => push_grupo(qb, itens, " OR ", "FALSE"),
        Predicado::Nao(interno) => {
            qb.push("NOT (");
            push_predicado(qb, interno);
            qb.push(")");
        }
    }
}

// Grupo vazio vira a identidade do operador
fn push_grupo(
    qb: &mut QueryBuilder<'_, Postgres>,
    itens: &[Predicado],
    separador: &str,
    vazio: &str,
) {
    if itens.is_empty() {
        qb.push(vazio);
        return;
    }
    qb.push("(");
    for (i, item) in itens.iter().enumerate() {
        if i > 0 {
            qb.push(separador);
        }
        push_predicado(qb, item);
    }
    qb.push(")");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(p: &Predicado) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("");
        push_predicado(&mut qb, p);
        qb.sql().to_string()
    }

    #[test]
    fn escapa_curingas_do_like() {
        assert_eq!(padrao_contem("50%_a\\b"), "%50\\%\\_a\\\\b%");
        assert_eq!(padrao_contem("obra"), "%obra%");
    }

    #[test]
    fn renderiza_grupos_com_parametros_numerados() {
        let p = Predicado::E(vec![
            Predicado::ativo(),
            Predicado::Ou(vec![
                Predicado::Contem(CampoTexto::NumeroSei, "123".into()),
                Predicado::Contem(CampoTexto::Interessado, "123".into()),
            ]),
        ]);

        assert_eq!(
            render(&p),
            "(p.situacao = $1 AND (p.numero_sei ILIKE $2 OR i.valor ILIKE $3))"
        );
    }

    #[test]
    fn renderiza_datas_e_negacao_de_andamento_concluido() {
        let hoje = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let p = Predicado::E(vec![
            Predicado::Data(CampoData::Prazo, Comparacao::Antes, hoje),
            Predicado::nao(Predicado::AndamentoConcluido),
        ]);

        assert_eq!(
            render(&p),
            "(p.prazo < $1 AND NOT (EXISTS (SELECT 1 FROM andamentos a WHERE a.processo_id = p.id AND a.concluido)))"
        );
    }

    #[test]
    fn grupos_vazios_viram_identidade() {
        assert_eq!(render(&Predicado::E(vec![])), "TRUE");
        assert_eq!(render(&Predicado::Ou(vec![])), "FALSE");
    }

    #[test]
    fn busca_em_andamentos_usa_tres_parametros() {
        let sql = render(&Predicado::AndamentoContem("cojur".into()));
        assert!(sql.contains("a.origem ILIKE $1"));
        assert!(sql.contains("a.destino ILIKE $2"));
        assert!(sql.contains("a.observacoes ILIKE $3"));
    }
}
