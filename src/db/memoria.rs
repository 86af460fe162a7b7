// src/db/memoria.rs

//! Repositório em memória usado pelos testes dos serviços.
//!
//! Implementa os mesmos traits do PostgreSQL e avalia a árvore de
//! predicados diretamente sobre os registros.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Paginacao},
    db::{
        filtro::{CampoData, CampoTexto, Comparacao, Predicado},
        interessado_repo::InteressadoStore,
        log_repo::LogStore,
        processo_repo::ProcessoStore,
        unidade_repo::UnidadeStore,
    },
    models::{
        interessado::Interessado,
        log::RegistroLog,
        processo::{AlteracoesProcesso, Andamento, NovoAndamento, NovoProcesso, ProcessoDetalhado, RespostaFinal},
        situacao::Situacao,
        unidade::Unidade,
    },
};

#[derive(Default)]
pub struct Dados {
    pub processos: Vec<ProcessoDetalhado>,
    pub andamentos: Vec<Andamento>,
    pub interessados: Vec<Interessado>,
    pub unidades: Vec<Unidade>,
    pub logs: Vec<RegistroLog>,
    pub falhar_logs: bool,
    sequencia: i64,
}

impl Dados {
    // Carimbos estritamente crescentes, para a ordenação ser determinística
    fn agora(&mut self) -> chrono::DateTime<Utc> {
        self.sequencia += 1;
        Utc::now() + Duration::microseconds(self.sequencia)
    }

    fn hidratar(&self, p: &ProcessoDetalhado) -> ProcessoDetalhado {
        let mut p = p.clone();
        p.interessado = p.interessado_id.and_then(|id| {
            self.interessados
                .iter()
                .find(|i| i.id == id)
                .map(|i| i.valor.clone())
        });
        p.concluido = self
            .andamentos
            .iter()
            .any(|a| a.processo_id == p.id && a.concluido);
        p
    }

    fn filtrar(&self, filtro: &Predicado) -> Vec<ProcessoDetalhado> {
        let mut encontrados: Vec<ProcessoDetalhado> = self
            .processos
            .iter()
            .map(|p| self.hidratar(p))
            .filter(|p| avalia(filtro, p, &self.andamentos))
            .collect();
        encontrados.sort_by(|a, b| b.criado_em.cmp(&a.criado_em).then(b.id.cmp(&a.id)));
        encontrados
    }
}

fn contem(valor: Option<&str>, termo: &str) -> bool {
    valor.is_some_and(|v| v.to_lowercase().contains(&termo.to_lowercase()))
}

fn texto(p: &ProcessoDetalhado, campo: CampoTexto) -> Option<&str> {
    match campo {
        CampoTexto::NumeroSei => Some(p.numero_sei.as_str()),
        CampoTexto::Assunto => Some(p.assunto.as_str()),
        CampoTexto::Origem => Some(p.origem.as_str()),
        CampoTexto::Observacoes => p.observacoes.as_deref(),
        CampoTexto::Interessado => p.interessado.as_deref(),
        CampoTexto::UnidadeRemetente => Some(p.unidade_remetente.as_str()),
        CampoTexto::UnidadeDestino => p.unidade_destino.as_deref(),
    }
}

/// Avalia o predicado com a mesma semântica da cláusula SQL.
pub fn avalia(filtro: &Predicado, p: &ProcessoDetalhado, andamentos: &[Andamento]) -> bool {
    let do_processo = || andamentos.iter().filter(move |a| a.processo_id == p.id);

    match filtro {
        Predicado::Situacao(s) => p.situacao == *s,
        Predicado::IdIgual(id) => p.id == *id,
        Predicado::Igual(campo, valor) => texto(p, *campo) == Some(valor.as_str()),
        Predicado::Contem(campo, termo) => contem(texto(p, *campo), termo),
        Predicado::Data(campo, comparacao, data) => {
            let valor = match campo {
                CampoData::Prazo => p.prazo,
                CampoData::Prorrogacao => p.prorrogacao,
            };
            match (valor, comparacao) {
                (Some(v), Comparacao::Igual) => v == *data,
                (Some(v), Comparacao::Antes) => v < *data,
                (None, _) => false,
            }
        }
        Predicado::AndamentoContem(termo) => do_processo().any(|a| {
            contem(Some(a.origem.as_str()), termo)
                || contem(Some(a.destino.as_str()), termo)
                || contem(a.observacoes.as_deref(), termo)
        }),
        Predicado::AndamentoConcluido => do_processo().any(|a| a.concluido),
        Predicado::E(itens) => itens.iter().all(|i| avalia(i, p, andamentos)),
        Predicado::Ou(itens) => itens.iter().any(|i| avalia(i, p, andamentos)),
        Predicado::Nao(interno) => !avalia(interno, p, andamentos),
    }
}

#[derive(Clone, Default)]
pub struct MemoriaStore {
    dados: Arc<Mutex<Dados>>,
}

impl MemoriaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dados(&self) -> MutexGuard<'_, Dados> {
        self.dados.lock().expect("mutex envenenado")
    }
}

#[async_trait]
impl ProcessoStore for MemoriaStore {
    async fn count(&self, filtro: &Predicado) -> Result<i64, AppError> {
        Ok(self.dados().filtrar(filtro).len() as i64)
    }

    async fn find_many(
        &self,
        filtro: &Predicado,
        paginacao: Paginacao,
    ) -> Result<Vec<ProcessoDetalhado>, AppError> {
        Ok(self
            .dados()
            .filtrar(filtro)
            .into_iter()
            .skip(paginacao.offset() as usize)
            .take(paginacao.limit() as usize)
            .collect())
    }

    async fn find_first(&self, filtro: &Predicado) -> Result<Option<ProcessoDetalhado>, AppError> {
        Ok(self.dados().filtrar(filtro).into_iter().next())
    }

    async fn create(&self, novo: NovoProcesso) -> Result<Uuid, AppError> {
        let mut dados = self.dados();
        if dados.processos.iter().any(|p| p.numero_sei == novo.numero_sei) {
            return Err(AppError::NumeroSeiAlreadyExists);
        }
        let agora = dados.agora();
        let id = Uuid::new_v4();
        dados.processos.push(ProcessoDetalhado {
            id,
            numero_sei: novo.numero_sei,
            assunto: novo.assunto,
            origem: novo.origem,
            observacoes: novo.observacoes,
            interessado_id: novo.interessado_id,
            interessado: None,
            unidade_remetente: novo.unidade_remetente,
            unidade_destino: novo.unidade_destino,
            prazo: novo.prazo,
            prorrogacao: novo.prorrogacao,
            resposta_final: None,
            unidade_resposta_final: None,
            data_resposta_final: None,
            situacao: Situacao::Ativo,
            concluido: false,
            criado_por: novo.criado_por,
            criado_em: agora,
            atualizado_em: agora,
        });
        Ok(id)
    }

    async fn update(&self, id: Uuid, alteracoes: AlteracoesProcesso) -> Result<(), AppError> {
        let mut dados = self.dados();
        if let Some(numero) = &alteracoes.numero_sei {
            if dados.processos.iter().any(|p| p.id != id && &p.numero_sei == numero) {
                return Err(AppError::NumeroSeiAlreadyExists);
            }
        }
        let agora = dados.agora();
        let p = dados
            .processos
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::ProcessoNotFound)?;

        if let Some(v) = alteracoes.numero_sei { p.numero_sei = v; }
        if let Some(v) = alteracoes.assunto { p.assunto = v; }
        if let Some(v) = alteracoes.origem { p.origem = v; }
        if let Some(v) = alteracoes.observacoes { p.observacoes = Some(v); }
        if let Some(v) = alteracoes.interessado_id { p.interessado_id = Some(v); }
        if let Some(v) = alteracoes.unidade_remetente { p.unidade_remetente = v; }
        if let Some(v) = alteracoes.unidade_destino { p.unidade_destino = Some(v); }
        if let Some(v) = alteracoes.prazo { p.prazo = Some(v); }
        if let Some(v) = alteracoes.prorrogacao { p.prorrogacao = Some(v); }
        p.atualizado_em = agora;
        Ok(())
    }

    async fn set_situacao(&self, id: Uuid, situacao: Situacao) -> Result<(), AppError> {
        let mut dados = self.dados();
        let p = dados
            .processos
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::ProcessoNotFound)?;
        p.situacao = situacao;
        Ok(())
    }

    async fn list_andamentos(&self, processo_id: Uuid) -> Result<Vec<Andamento>, AppError> {
        Ok(self
            .dados()
            .andamentos
            .iter()
            .filter(|a| a.processo_id == processo_id)
            .cloned()
            .collect())
    }

    async fn create_andamento(&self, novo: NovoAndamento) -> Result<Andamento, AppError> {
        let mut dados = self.dados();
        let andamento = Andamento {
            id: Uuid::new_v4(),
            processo_id: novo.processo_id,
            origem: novo.origem,
            destino: novo.destino,
            observacoes: novo.observacoes,
            concluido: novo.concluido,
            criado_por: novo.criado_por,
            criado_em: dados.agora(),
        };
        dados.andamentos.push(andamento.clone());
        Ok(andamento)
    }

    async fn registrar_resposta_final(&self, resposta: RespostaFinal) -> Result<(), AppError> {
        let mut dados = self.dados();
        let agora = dados.agora();
        let p = dados
            .processos
            .iter_mut()
            .find(|p| p.id == resposta.processo_id)
            .ok_or(AppError::ProcessoNotFound)?;
        p.resposta_final = Some(resposta.texto);
        p.unidade_resposta_final = Some(resposta.unidade.clone());
        p.data_resposta_final = Some(resposta.data_resposta);
        p.atualizado_em = agora;
        let remetente = p.unidade_remetente.clone();

        dados.andamentos.push(Andamento {
            id: Uuid::new_v4(),
            processo_id: resposta.processo_id,
            origem: resposta.unidade,
            destino: remetente,
            observacoes: Some("Resposta final".into()),
            concluido: true,
            criado_por: resposta.usuario_id,
            criado_em: agora,
        });
        Ok(())
    }

    async fn autocomplete_origens(&self, termo: &str, limite: i64) -> Result<Vec<String>, AppError> {
        let dados = self.dados();
        let mut origens: Vec<String> = dados
            .processos
            .iter()
            .filter(|p| p.situacao.is_ativo() && contem(Some(p.origem.as_str()), termo))
            .map(|p| p.origem.clone())
            .collect();
        origens.sort();
        origens.dedup();
        origens.truncate(limite as usize);
        Ok(origens)
    }
}

#[async_trait]
impl InteressadoStore for MemoriaStore {
    async fn list(&self, incluir_inativos: bool) -> Result<Vec<Interessado>, AppError> {
        let mut lista: Vec<Interessado> = self
            .dados()
            .interessados
            .iter()
            .filter(|i| incluir_inativos || i.situacao.is_ativo())
            .cloned()
            .collect();
        lista.sort_by(|a, b| a.valor.cmp(&b.valor));
        Ok(lista)
    }

    async fn search_by_term(&self, termo: &str, limite: i64) -> Result<Vec<Interessado>, AppError> {
        let mut lista = InteressadoStore::list(self, false).await?;
        lista.retain(|i| contem(Some(i.valor.as_str()), termo));
        lista.truncate(limite as usize);
        Ok(lista)
    }

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Interessado>, AppError> {
        Ok(self
            .dados()
            .interessados
            .iter()
            .find(|i| i.id == id && i.situacao.is_ativo())
            .cloned())
    }

    async fn find_active_by_valor(
        &self,
        valor: &str,
        exceto: Option<Uuid>,
    ) -> Result<Option<Interessado>, AppError> {
        Ok(self
            .dados()
            .interessados
            .iter()
            .find(|i| i.valor == valor && i.situacao.is_ativo() && Some(i.id) != exceto)
            .cloned())
    }

    async fn create(&self, valor: &str) -> Result<Interessado, AppError> {
        let mut dados = self.dados();
        let agora = dados.agora();
        let interessado = Interessado {
            id: Uuid::new_v4(),
            valor: valor.to_string(),
            situacao: Situacao::Ativo,
            criado_em: agora,
            atualizado_em: agora,
        };
        dados.interessados.push(interessado.clone());
        Ok(interessado)
    }

    async fn update_valor(&self, id: Uuid, valor: &str) -> Result<Interessado, AppError> {
        let mut dados = self.dados();
        let agora = dados.agora();
        let i = dados
            .interessados
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(AppError::InteressadoNotFound)?;
        i.valor = valor.to_string();
        i.atualizado_em = agora;
        Ok(i.clone())
    }

    async fn count_processos_ativos(&self, id: Uuid) -> Result<i64, AppError> {
        Ok(self
            .dados()
            .processos
            .iter()
            .filter(|p| p.interessado_id == Some(id) && p.situacao.is_ativo())
            .count() as i64)
    }

    async fn set_situacao(&self, id: Uuid, situacao: Situacao) -> Result<Interessado, AppError> {
        let mut dados = self.dados();
        let i = dados
            .interessados
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(AppError::InteressadoNotFound)?;
        i.situacao = situacao;
        Ok(i.clone())
    }
}

#[async_trait]
impl UnidadeStore for MemoriaStore {
    async fn search(
        &self,
        busca: Option<&str>,
        paginacao: Paginacao,
    ) -> Result<(Vec<Unidade>, i64), AppError> {
        let mut ativas = UnidadeStore::list(self, false).await?;
        if let Some(termo) = busca {
            ativas.retain(|u| contem(Some(u.nome.as_str()), termo));
        }
        let total = ativas.len() as i64;
        let pagina = ativas
            .into_iter()
            .skip(paginacao.offset() as usize)
            .take(paginacao.limit() as usize)
            .collect();
        Ok((pagina, total))
    }

    async fn list(&self, incluir_inativos: bool) -> Result<Vec<Unidade>, AppError> {
        let mut lista: Vec<Unidade> = self
            .dados()
            .unidades
            .iter()
            .filter(|u| incluir_inativos || u.situacao.is_ativo())
            .cloned()
            .collect();
        lista.sort_by(|a, b| a.nome.cmp(&b.nome));
        Ok(lista)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Unidade>, AppError> {
        Ok(self.dados().unidades.iter().find(|u| u.id == id).cloned())
    }

    async fn find_active_by_nome(
        &self,
        nome: &str,
        exceto: Option<Uuid>,
    ) -> Result<Option<Unidade>, AppError> {
        Ok(self
            .dados()
            .unidades
            .iter()
            .find(|u| u.nome == nome && u.situacao.is_ativo() && Some(u.id) != exceto)
            .cloned())
    }

    async fn create(&self, nome: &str) -> Result<Unidade, AppError> {
        let mut dados = self.dados();
        let agora = dados.agora();
        let unidade = Unidade {
            id: Uuid::new_v4(),
            nome: nome.to_string(),
            situacao: Situacao::Ativo,
            criado_em: agora,
            atualizado_em: agora,
        };
        dados.unidades.push(unidade.clone());
        Ok(unidade)
    }

    async fn update_nome(&self, id: Uuid, nome: &str) -> Result<Unidade, AppError> {
        let mut dados = self.dados();
        let agora = dados.agora();
        let u = dados
            .unidades
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::UnidadeNotFound)?;
        u.nome = nome.to_string();
        u.atualizado_em = agora;
        Ok(u.clone())
    }

    async fn set_situacao(&self, id: Uuid, situacao: Situacao) -> Result<Unidade, AppError> {
        let mut dados = self.dados();
        let agora = dados.agora();
        let u = dados
            .unidades
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::UnidadeNotFound)?;
        u.situacao = situacao;
        u.atualizado_em = agora;
        Ok(u.clone())
    }

    async fn count_processos_ativos(&self, nome: &str) -> Result<i64, AppError> {
        Ok(self
            .dados()
            .processos
            .iter()
            .filter(|p| {
                p.situacao.is_ativo()
                    && (p.unidade_remetente == nome || p.unidade_destino.as_deref() == Some(nome))
            })
            .count() as i64)
    }
}

#[async_trait]
impl LogStore for MemoriaStore {
    async fn registrar(&self, registro: &RegistroLog) -> Result<(), AppError> {
        let mut dados = self.dados();
        if dados.falhar_logs {
            return Err(AppError::InternalServerError(anyhow::anyhow!("tabela de logs indisponível")));
        }
        dados.logs.push(registro.clone());
        Ok(())
    }
}
