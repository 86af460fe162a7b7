// src/services/interessado_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InteressadoStore,
    models::{
        interessado::{
            CreateInteressadoPayload, InteressadoResponse, UpdateInteressadoPayload,
        },
        log::Acao,
        situacao::Situacao,
    },
    services::log_service::LogService,
};

const ENTIDADE: &str = "interessado";
const LIMITE_AUTOCOMPLETE: i64 = 10;

#[derive(Clone)]
pub struct InteressadoService {
    store: Arc<dyn InteressadoStore>,
    logs: LogService,
}

impl InteressadoService {
    pub fn new(store: Arc<dyn InteressadoStore>, logs: LogService) -> Self {
        Self { store, logs }
    }

    pub async fn lista_completa(
        &self,
        incluir_inativos: bool,
    ) -> Result<Vec<InteressadoResponse>, AppError> {
        let lista = self.store.list(incluir_inativos).await?;
        Ok(lista.into_iter().map(InteressadoResponse::from).collect())
    }

    /// Autocomplete: ativos que contêm o termo, em ordem alfabética.
    pub async fn buscar_por_termo(&self, termo: &str) -> Result<Vec<InteressadoResponse>, AppError> {
        let termo = termo.trim();
        if termo.is_empty() {
            return Ok(Vec::new());
        }
        let lista = self.store.search_by_term(termo, LIMITE_AUTOCOMPLETE).await?;
        Ok(lista.into_iter().map(InteressadoResponse::from).collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<InteressadoResponse, AppError> {
        self.store
            .find_active_by_id(id)
            .await?
            .map(InteressadoResponse::from)
            .ok_or(AppError::InteressadoNotFound)
    }

    pub async fn create(
        &self,
        payload: CreateInteressadoPayload,
        usuario_id: Uuid,
    ) -> Result<InteressadoResponse, AppError> {
        let valor = valor_obrigatorio(&payload.valor)?;

        // Pré-validação; o índice único parcial é quem garante
        if self.store.find_active_by_valor(&valor, None).await?.is_some() {
            return Err(AppError::InteressadoAlreadyExists);
        }

        let interessado = self.store.create(&valor).await?;
        tracing::info!("👤 Interessado '{}' criado por {}", interessado.valor, usuario_id);
        self.logs
            .registrar(Acao::Criar, ENTIDADE, Some(interessado.id), Some(usuario_id));

        Ok(interessado.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateInteressadoPayload,
        usuario_id: Uuid,
    ) -> Result<InteressadoResponse, AppError> {
        let atual = self
            .store
            .find_active_by_id(id)
            .await?
            .ok_or(AppError::InteressadoNotFound)?;

        let Some(valor) = payload.valor else {
            return Ok(atual.into());
        };
        let valor = valor_obrigatorio(&valor)?;
        if valor == atual.valor {
            return Ok(atual.into());
        }

        if self.store.find_active_by_valor(&valor, Some(id)).await?.is_some() {
            return Err(AppError::InteressadoAlreadyExists);
        }

        let interessado = self.store.update_valor(id, &valor).await?;
        tracing::info!("📝 Interessado {} atualizado por {}", id, usuario_id);
        self.logs
            .registrar(Acao::Atualizar, ENTIDADE, Some(id), Some(usuario_id));

        Ok(interessado.into())
    }

    /// Soft delete, bloqueado enquanto houver processos ativos vinculados.
    pub async fn remove(&self, id: Uuid, usuario_id: Uuid) -> Result<(), AppError> {
        self.store
            .find_active_by_id(id)
            .await?
            .ok_or(AppError::InteressadoNotFound)?;

        let vinculados = self.store.count_processos_ativos(id).await?;
        if vinculados > 0 {
            return Err(AppError::InteressadoInUse(vinculados));
        }

        self.store.set_situacao(id, Situacao::Inativo).await?;
        tracing::info!("🗑️ Interessado {} removido por {}", id, usuario_id);
        self.logs
            .registrar(Acao::Remover, ENTIDADE, Some(id), Some(usuario_id));

        Ok(())
    }
}

fn valor_obrigatorio(valor: &str) -> Result<String, AppError> {
    let valor = valor.trim();
    if valor.is_empty() {
        return Err(AppError::campo_invalido(
            "valor",
            "O nome do interessado é obrigatório.",
        ));
    }
    Ok(valor.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memoria::MemoriaStore;
    use crate::db::ProcessoStore;
    use crate::models::processo::{AlteracoesProcesso, NovoProcesso};

    fn servico() -> (InteressadoService, MemoriaStore) {
        let store = MemoriaStore::new();
        let service =
            InteressadoService::new(Arc::new(store.clone()), LogService::new(Arc::new(store.clone())));
        (service, store)
    }

    fn payload(valor: &str) -> CreateInteressadoPayload {
        CreateInteressadoPayload { valor: valor.into() }
    }

    async fn processo_de(store: &MemoriaStore, interessado_id: Uuid, numero: &str) -> Uuid {
        ProcessoStore::create(
            store,
            NovoProcesso {
                numero_sei: numero.into(),
                assunto: "Alvará".into(),
                origem: "Cidadão".into(),
                observacoes: None,
                interessado_id: Some(interessado_id),
                unidade_remetente: "COJUR".into(),
                unidade_destino: None,
                prazo: None,
                prorrogacao: None,
                criado_por: Uuid::new_v4(),
            },
        )
        .await
        .expect("processo")
    }

    #[tokio::test]
    async fn duplicado_ativo_e_rejeitado_ate_a_remocao() {
        let (service, _) = servico();
        let user = Uuid::new_v4();
        let primeiro = service.create(payload("João Silva"), user).await.expect("criar");

        assert!(matches!(
            service.create(payload("  João Silva "), user).await,
            Err(AppError::InteressadoAlreadyExists)
        ));

        service.remove(primeiro.id, user).await.expect("remover");
        let segundo = service.create(payload("João Silva"), user).await.expect("recriar");

        assert_ne!(primeiro.id, segundo.id);
        assert_eq!(segundo.valor, "João Silva");
    }

    #[tokio::test]
    async fn remocao_bloqueada_informa_quantidade_de_processos() {
        let (service, store) = servico();
        let user = Uuid::new_v4();
        let joao = service.create(payload("João Silva"), user).await.expect("criar");
        let p1 = processo_de(&store, joao.id, "0001/2026").await;
        processo_de(&store, joao.id, "0002/2026").await;

        let erro = service.remove(joao.id, user).await.expect_err("deve bloquear");
        assert!(matches!(erro, AppError::InteressadoInUse(2)));
        assert_eq!(
            erro.message(&Default::default()),
            "Não é possível remover este interessado pois existem 2 processo(s) ativo(s) vinculado(s)."
        );

        ProcessoStore::set_situacao(&store, p1, Situacao::Inativo).await.expect("inativar");
        assert!(matches!(
            service.remove(joao.id, user).await,
            Err(AppError::InteressadoInUse(1))
        ));

        for p in store.dados().processos.iter_mut() {
            p.situacao = Situacao::Inativo;
        }
        service.remove(joao.id, user).await.expect("remover");
        assert!(matches!(
            service.find_by_id(joao.id).await,
            Err(AppError::InteressadoNotFound)
        ));
    }

    #[tokio::test]
    async fn remocao_liberada_quando_processos_trocam_de_interessado() {
        let (service, store) = servico();
        let user = Uuid::new_v4();
        let joao = service.create(payload("João Silva"), user).await.expect("criar");
        let maria = service.create(payload("Maria Souza"), user).await.expect("criar");
        let processos = [
            processo_de(&store, joao.id, "0001/2026").await,
            processo_de(&store, joao.id, "0002/2026").await,
        ];

        for id in processos {
            ProcessoStore::update(
                &store,
                id,
                AlteracoesProcesso {
                    interessado_id: Some(maria.id),
                    ..Default::default()
                },
            )
            .await
            .expect("reatribuir");
        }

        service.remove(joao.id, user).await.expect("remover");
        assert!(matches!(
            service.remove(maria.id, user).await,
            Err(AppError::InteressadoInUse(2))
        ));
    }

    #[tokio::test]
    async fn atualizacao_verifica_duplicidade_exceto_o_proprio() {
        let (service, _) = servico();
        let user = Uuid::new_v4();
        let joao = service.create(payload("João Silva"), user).await.expect("criar");
        service.create(payload("Maria Souza"), user).await.expect("criar");

        let mesmo = service
            .update(joao.id, UpdateInteressadoPayload { valor: Some(" João Silva ".into()) }, user)
            .await
            .expect("mesmo valor");
        assert_eq!(mesmo.valor, "João Silva");

        assert!(matches!(
            service
                .update(joao.id, UpdateInteressadoPayload { valor: Some("Maria Souza".into()) }, user)
                .await,
            Err(AppError::InteressadoAlreadyExists)
        ));

        let renomeado = service
            .update(joao.id, UpdateInteressadoPayload { valor: Some("João S. Silva".into()) }, user)
            .await
            .expect("renomear");
        assert_eq!(renomeado.valor, "João S. Silva");
    }

    #[tokio::test]
    async fn listas_excluem_inativos_por_padrao() {
        let (service, _) = servico();
        let user = Uuid::new_v4();
        let ana = service.create(payload("Ana Lima"), user).await.expect("criar");
        service.create(payload("Bruno Costa"), user).await.expect("criar");
        service.create(payload("Anabela Reis"), user).await.expect("criar");
        service.remove(ana.id, user).await.expect("remover");

        let ativos = service.lista_completa(false).await.expect("lista");
        let todos = service.lista_completa(true).await.expect("lista");
        assert_eq!(ativos.len(), 2);
        assert_eq!(todos.len(), 3);

        let nomes: Vec<String> = service
            .buscar_por_termo("ana")
            .await
            .expect("autocomplete")
            .into_iter()
            .map(|i| i.valor)
            .collect();
        assert_eq!(nomes, vec!["Anabela Reis"]);
    }

    #[tokio::test]
    async fn valor_em_branco_e_erro_de_validacao() {
        let (service, _) = servico();

        assert!(matches!(
            service.create(payload("   "), Uuid::new_v4()).await,
            Err(AppError::ValidationError(_))
        ));
    }
}
