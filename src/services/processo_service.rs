// src/services/processo_service.rs

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Paginado},
    db::{
        filtro::{CampoData, CampoTexto, Comparacao, Predicado},
        InteressadoStore, ProcessoStore,
    },
    models::{
        log::Acao,
        processo::{
            AlteracoesProcesso, Andamento, CreateAndamentoPayload, CreateProcessoPayload,
            CreateRespostaFinalPayload, FiltrosProcesso, NovoAndamento, NovoProcesso,
            ProcessoDetalhado, ProcessoResponse, RespostaFinal, UpdateProcessoPayload,
        },
        situacao::Situacao,
    },
    services::log_service::LogService,
};

const ENTIDADE: &str = "processo";
const LIMITE_AUTOCOMPLETE: i64 = 10;

// Campos cobertos pela busca geral (além dos andamentos)
const CAMPOS_BUSCA_GERAL: [CampoTexto; 7] = [
    CampoTexto::NumeroSei,
    CampoTexto::Assunto,
    CampoTexto::Origem,
    CampoTexto::Observacoes,
    CampoTexto::Interessado,
    CampoTexto::UnidadeRemetente,
    CampoTexto::UnidadeDestino,
];

/// Data do calendário local, usada nos filtros de prazo.
pub fn hoje_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Prazo ou prorrogação vence exatamente hoje.
pub fn predicado_vencendo_hoje(hoje: NaiveDate) -> Predicado {
    Predicado::Ou(vec![
        Predicado::Data(CampoData::Prazo, Comparacao::Igual, hoje),
        Predicado::Data(CampoData::Prorrogacao, Comparacao::Igual, hoje),
    ])
}

/// Prazo ou prorrogação anterior a hoje, sem andamento concluído.
pub fn predicado_atrasados(hoje: NaiveDate) -> Predicado {
    Predicado::E(vec![
        Predicado::Ou(vec![
            Predicado::Data(CampoData::Prazo, Comparacao::Antes, hoje),
            Predicado::Data(CampoData::Prorrogacao, Comparacao::Antes, hoje),
        ]),
        Predicado::nao(Predicado::AndamentoConcluido),
    ])
}

/// Traduz os filtros da listagem na árvore de predicados.
///
/// Todos os filtros são combinados com AND, sempre junto com `ativo`.
pub fn montar_predicado(filtros: &FiltrosProcesso, hoje: NaiveDate) -> Predicado {
    let mut condicoes = vec![Predicado::ativo()];

    if let Some(termo) = &filtros.busca {
        let mut alternativas: Vec<Predicado> = CAMPOS_BUSCA_GERAL
            .iter()
            .map(|campo| Predicado::Contem(*campo, termo.clone()))
            .collect();
        alternativas.push(Predicado::AndamentoContem(termo.clone()));
        condicoes.push(Predicado::Ou(alternativas));
    }
    if let Some(termo) = &filtros.interessado {
        condicoes.push(Predicado::Contem(CampoTexto::Interessado, termo.clone()));
    }
    if let Some(termo) = &filtros.unidade_remetente {
        condicoes.push(Predicado::Contem(CampoTexto::UnidadeRemetente, termo.clone()));
    }
    if let Some(termo) = &filtros.unidade_destino {
        condicoes.push(Predicado::Contem(CampoTexto::UnidadeDestino, termo.clone()));
    }
    if filtros.vencendo_hoje {
        condicoes.push(predicado_vencendo_hoje(hoje));
    }
    if filtros.atrasados {
        condicoes.push(predicado_atrasados(hoje));
    }
    if filtros.concluidos {
        condicoes.push(Predicado::AndamentoConcluido);
    }

    Predicado::E(condicoes)
}

fn ativo_com_id(id: Uuid) -> Predicado {
    Predicado::E(vec![Predicado::ativo(), Predicado::IdIgual(id)])
}

// Texto opcional: espaços são removidos e vazio vira None
fn opcional(valor: Option<String>) -> Option<String> {
    valor.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn obrigatorio(campo: &'static str, valor: &str, mensagem: &'static str) -> Result<String, AppError> {
    let valor = valor.trim();
    if valor.is_empty() {
        return Err(AppError::campo_invalido(campo, mensagem));
    }
    Ok(valor.to_string())
}

#[derive(Clone)]
pub struct ProcessoService {
    store: Arc<dyn ProcessoStore>,
    interessados: Arc<dyn InteressadoStore>,
    logs: LogService,
    relogio: fn() -> NaiveDate,
}

impl ProcessoService {
    pub fn new(
        store: Arc<dyn ProcessoStore>,
        interessados: Arc<dyn InteressadoStore>,
        logs: LogService,
    ) -> Self {
        Self {
            store,
            interessados,
            logs,
            relogio: hoje_local,
        }
    }

    /// Troca a fonte da data corrente (testes usam uma data fixa).
    pub fn with_relogio(mut self, relogio: fn() -> NaiveDate) -> Self {
        self.relogio = relogio;
        self
    }

    // =========================================================================
    //  BUSCA
    // =========================================================================

    /// Listagem paginada com busca geral, buscas específicas e filtros rápidos.
    ///
    /// `usuario_id` ainda não restringe o resultado; é aceito para permitir
    /// escopo por usuário no futuro.
    pub async fn search(
        &self,
        filtros: FiltrosProcesso,
        usuario_id: Option<Uuid>,
    ) -> Result<Paginado<ProcessoResponse>, AppError> {
        let predicado = montar_predicado(&filtros, (self.relogio)());
        tracing::debug!(?usuario_id, ?predicado, "Buscando processos");

        let total = self.store.count(&predicado).await?;
        let processos = self.store.find_many(&predicado, filtros.paginacao).await?;

        Ok(Paginado::new(processos, filtros.paginacao, total).map(ProcessoResponse::from))
    }

    pub async fn contar_vencendo_hoje(&self, usuario_id: Option<Uuid>) -> Result<i64, AppError> {
        tracing::debug!(?usuario_id, "Contando processos vencendo hoje");
        let predicado = Predicado::E(vec![
            Predicado::ativo(),
            predicado_vencendo_hoje((self.relogio)()),
        ]);
        self.store.count(&predicado).await
    }

    pub async fn contar_atrasados(&self, usuario_id: Option<Uuid>) -> Result<i64, AppError> {
        tracing::debug!(?usuario_id, "Contando processos atrasados");
        let predicado = Predicado::E(vec![
            Predicado::ativo(),
            predicado_atrasados((self.relogio)()),
        ]);
        self.store.count(&predicado).await
    }

    pub async fn find_by_id(
        &self,
        id: Uuid,
        usuario_id: Option<Uuid>,
    ) -> Result<ProcessoResponse, AppError> {
        tracing::debug!(?usuario_id, %id, "Buscando processo por id");
        self.find_ativo(id).await.map(ProcessoResponse::from)
    }

    pub async fn find_by_numero_sei(
        &self,
        numero_sei: &str,
        usuario_id: Option<Uuid>,
    ) -> Result<ProcessoResponse, AppError> {
        tracing::debug!(?usuario_id, numero_sei, "Buscando processo por número SEI");
        let predicado = Predicado::E(vec![
            Predicado::ativo(),
            Predicado::Igual(CampoTexto::NumeroSei, numero_sei.trim().to_string()),
        ]);

        self.store
            .find_first(&predicado)
            .await?
            .map(ProcessoResponse::from)
            .ok_or(AppError::ProcessoNotFound)
    }

    pub async fn autocomplete_origens(&self, termo: &str) -> Result<Vec<String>, AppError> {
        let termo = termo.trim();
        if termo.is_empty() {
            return Ok(Vec::new());
        }
        self.store.autocomplete_origens(termo, LIMITE_AUTOCOMPLETE).await
    }

    // =========================================================================
    //  CICLO DE VIDA
    // =========================================================================

    pub async fn create(
        &self,
        payload: CreateProcessoPayload,
        usuario_id: Uuid,
    ) -> Result<ProcessoResponse, AppError> {
        let numero_sei = obrigatorio("numero_sei", &payload.numero_sei, "O número SEI é obrigatório.")?;
        self.garantir_numero_sei_livre(&numero_sei, None).await?;

        if let Some(interessado_id) = payload.interessado_id {
            self.garantir_interessado(interessado_id).await?;
        }

        let novo = NovoProcesso {
            numero_sei,
            assunto: obrigatorio("assunto", &payload.assunto, "O assunto é obrigatório.")?,
            origem: obrigatorio("origem", &payload.origem, "A origem é obrigatória.")?,
            observacoes: opcional(payload.observacoes),
            interessado_id: payload.interessado_id,
            unidade_remetente: obrigatorio(
                "unidadeRemetente",
                &payload.unidade_remetente,
                "A unidade remetente é obrigatória.",
            )?,
            unidade_destino: opcional(payload.unidade_destino),
            prazo: payload.prazo,
            prorrogacao: payload.prorrogacao,
            criado_por: usuario_id,
        };

        let id = self.store.create(novo).await?;
        tracing::info!("📁 Processo {} criado por {}", id, usuario_id);
        self.logs.registrar(Acao::Criar, ENTIDADE, Some(id), Some(usuario_id));

        self.find_ativo(id).await.map(ProcessoResponse::from)
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateProcessoPayload,
        usuario_id: Uuid,
    ) -> Result<ProcessoResponse, AppError> {
        let atual = self.find_ativo(id).await?;

        let numero_sei = match payload.numero_sei {
            Some(n) => Some(obrigatorio("numero_sei", &n, "O número SEI não pode ser vazio.")?),
            None => None,
        };
        if let Some(numero) = &numero_sei {
            if *numero != atual.numero_sei {
                self.garantir_numero_sei_livre(numero, Some(id)).await?;
            }
        }
        if let Some(interessado_id) = payload.interessado_id {
            if Some(interessado_id) != atual.interessado_id {
                self.garantir_interessado(interessado_id).await?;
            }
        }

        let alteracoes = AlteracoesProcesso {
            numero_sei,
            assunto: opcional(payload.assunto),
            origem: opcional(payload.origem),
            observacoes: opcional(payload.observacoes),
            interessado_id: payload.interessado_id,
            unidade_remetente: opcional(payload.unidade_remetente),
            unidade_destino: opcional(payload.unidade_destino),
            prazo: payload.prazo,
            prorrogacao: payload.prorrogacao,
        };

        self.store.update(id, alteracoes).await?;
        tracing::info!("📝 Processo {} atualizado por {}", id, usuario_id);
        self.logs.registrar(Acao::Atualizar, ENTIDADE, Some(id), Some(usuario_id));

        self.find_ativo(id).await.map(ProcessoResponse::from)
    }

    /// Soft delete: o processo passa a `Inativo` e some de todas as consultas.
    pub async fn remove(&self, id: Uuid, usuario_id: Uuid) -> Result<(), AppError> {
        self.find_ativo(id).await?;

        self.store.set_situacao(id, Situacao::Inativo).await?;
        tracing::info!("🗑️ Processo {} removido por {}", id, usuario_id);
        self.logs.registrar(Acao::Remover, ENTIDADE, Some(id), Some(usuario_id));

        Ok(())
    }

    // =========================================================================
    //  ANDAMENTOS E RESPOSTA FINAL
    // =========================================================================

    pub async fn list_andamentos(&self, id: Uuid) -> Result<Vec<Andamento>, AppError> {
        self.find_ativo(id).await?;
        self.store.list_andamentos(id).await
    }

    pub async fn create_andamento(
        &self,
        id: Uuid,
        payload: CreateAndamentoPayload,
        usuario_id: Uuid,
    ) -> Result<Andamento, AppError> {
        self.find_ativo(id).await?;

        let andamento = self
            .store
            .create_andamento(NovoAndamento {
                processo_id: id,
                origem: obrigatorio("origem", &payload.origem, "A unidade de origem é obrigatória.")?,
                destino: obrigatorio("destino", &payload.destino, "A unidade de destino é obrigatória.")?,
                observacoes: opcional(payload.observacoes),
                concluido: payload.concluido,
                criado_por: usuario_id,
            })
            .await?;

        self.logs.registrar(Acao::CriarAndamento, ENTIDADE, Some(id), Some(usuario_id));
        Ok(andamento)
    }

    /// Unidades que podem dar a resposta final: destinos dos andamentos e a remetente.
    pub async fn unidades_resposta(&self, id: Uuid) -> Result<Vec<String>, AppError> {
        let processo = self.find_ativo(id).await?;
        let andamentos = self.store.list_andamentos(id).await?;
        Ok(unidades_elegiveis(&processo, &andamentos).into_iter().collect())
    }

    pub async fn create_resposta_final(
        &self,
        payload: CreateRespostaFinalPayload,
        usuario_id: Uuid,
    ) -> Result<ProcessoResponse, AppError> {
        let id = payload.processo_id;
        let processo = self.find_ativo(id).await?;

        let andamentos = self.store.list_andamentos(id).await?;
        if andamentos.is_empty() {
            return Err(AppError::ProcessoSemAndamentos);
        }

        let unidade = obrigatorio("unidade", &payload.unidade, "A unidade respondida é obrigatória.")?;
        if !unidades_elegiveis(&processo, &andamentos).contains(&unidade) {
            return Err(AppError::UnidadeRespostaInvalida(unidade));
        }

        self.store
            .registrar_resposta_final(RespostaFinal {
                processo_id: id,
                unidade,
                texto: obrigatorio("resposta", &payload.resposta, "O texto da resposta é obrigatório.")?,
                data_resposta: payload.data_resposta.unwrap_or_else(self.relogio),
                usuario_id,
            })
            .await?;

        tracing::info!("✅ Resposta final registrada no processo {} por {}", id, usuario_id);
        self.logs.registrar(Acao::RespostaFinal, ENTIDADE, Some(id), Some(usuario_id));

        self.find_ativo(id).await.map(ProcessoResponse::from)
    }

    // --- AUXILIARES ---

    async fn find_ativo(&self, id: Uuid) -> Result<ProcessoDetalhado, AppError> {
        self.store
            .find_first(&ativo_com_id(id))
            .await?
            .ok_or(AppError::ProcessoNotFound)
    }

    // O número SEI é único entre todos os processos, inclusive os removidos
    async fn garantir_numero_sei_livre(&self, numero: &str, exceto: Option<Uuid>) -> Result<(), AppError> {
        let mut condicoes = vec![Predicado::Igual(CampoTexto::NumeroSei, numero.to_string())];
        if let Some(id) = exceto {
            condicoes.push(Predicado::nao(Predicado::IdIgual(id)));
        }

        if self.store.find_first(&Predicado::E(condicoes)).await?.is_some() {
            return Err(AppError::NumeroSeiAlreadyExists);
        }
        Ok(())
    }

    async fn garantir_interessado(&self, interessado_id: Uuid) -> Result<(), AppError> {
        self.interessados
            .find_active_by_id(interessado_id)
            .await?
            .map(|_| ())
            .ok_or(AppError::InteressadoNotFound)
    }
}

fn unidades_elegiveis(processo: &ProcessoDetalhado, andamentos: &[Andamento]) -> BTreeSet<String> {
    andamentos
        .iter()
        .map(|a| a.destino.trim())
        .chain(std::iter::once(processo.unidade_remetente.trim()))
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}
