// src/services/unidade_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{Paginacao, Paginado},
    },
    db::UnidadeStore,
    models::{
        log::Acao,
        situacao::Situacao,
        unidade::{CreateUnidadePayload, Unidade, UnidadeResponse, UpdateUnidadePayload},
    },
    services::log_service::LogService,
};

const ENTIDADE: &str = "unidade";

#[derive(Clone)]
pub struct UnidadeService {
    store: Arc<dyn UnidadeStore>,
    logs: LogService,
}

impl UnidadeService {
    pub fn new(store: Arc<dyn UnidadeStore>, logs: LogService) -> Self {
        Self { store, logs }
    }

    /// Listagem paginada das unidades ativas, por nome.
    pub async fn search(
        &self,
        paginacao: Paginacao,
        busca: Option<&str>,
    ) -> Result<Paginado<UnidadeResponse>, AppError> {
        let busca = busca.map(str::trim).filter(|b| !b.is_empty());
        let (unidades, total) = self.store.search(busca, paginacao).await?;

        Ok(Paginado::new(unidades, paginacao, total).map(UnidadeResponse::from))
    }

    pub async fn lista_completa(&self, incluir_inativos: bool) -> Result<Vec<UnidadeResponse>, AppError> {
        let lista = self.store.list(incluir_inativos).await?;
        Ok(lista.into_iter().map(UnidadeResponse::from).collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<UnidadeResponse, AppError> {
        self.find_ativa(id).await.map(UnidadeResponse::from)
    }

    pub async fn create(
        &self,
        payload: CreateUnidadePayload,
        usuario_id: Uuid,
    ) -> Result<UnidadeResponse, AppError> {
        let nome = nome_obrigatorio(&payload.nome)?;
        self.garantir_nome_livre(&nome, None).await?;

        let unidade = self.store.create(&nome).await?;
        tracing::info!("🏢 Unidade '{}' criada por {}", unidade.nome, usuario_id);
        self.logs
            .registrar(Acao::Criar, ENTIDADE, Some(unidade.id), Some(usuario_id));

        Ok(unidade.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateUnidadePayload,
        usuario_id: Uuid,
    ) -> Result<UnidadeResponse, AppError> {
        let atual = self.find_ativa(id).await?;

        let Some(nome) = payload.nome else {
            return Ok(atual.into());
        };
        let nome = nome_obrigatorio(&nome)?;
        if nome == atual.nome {
            return Ok(atual.into());
        }
        self.garantir_nome_livre(&nome, Some(id)).await?;

        // Processos citam a unidade pelo nome
        let vinculados = self.store.count_processos_ativos(&atual.nome).await?;
        if vinculados > 0 {
            return Err(AppError::UnidadeInUse(vinculados));
        }

        let unidade = self.store.update_nome(id, &nome).await?;
        tracing::info!("📝 Unidade {} renomeada para '{}' por {}", id, unidade.nome, usuario_id);
        self.logs
            .registrar(Acao::Atualizar, ENTIDADE, Some(id), Some(usuario_id));

        Ok(unidade.into())
    }

    /// Soft delete, bloqueado enquanto processos ativos citarem a unidade
    /// como remetente ou destino.
    pub async fn remove(&self, id: Uuid, usuario_id: Uuid) -> Result<(), AppError> {
        let unidade = self.find_ativa(id).await?;

        let vinculados = self.store.count_processos_ativos(&unidade.nome).await?;
        if vinculados > 0 {
            return Err(AppError::UnidadeInUse(vinculados));
        }

        self.store.set_situacao(id, Situacao::Inativo).await?;
        tracing::info!("🗑️ Unidade {} removida por {}", id, usuario_id);
        self.logs
            .registrar(Acao::Remover, ENTIDADE, Some(id), Some(usuario_id));

        Ok(())
    }

    pub async fn reativar(&self, id: Uuid, usuario_id: Uuid) -> Result<UnidadeResponse, AppError> {
        let unidade = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AppError::UnidadeNotFound)?;

        if unidade.situacao.is_ativo() {
            return Err(AppError::UnidadeAlreadyActive);
        }
        // Outra unidade ativa pode ter assumido o nome nesse meio tempo
        self.garantir_nome_livre(&unidade.nome, Some(id)).await?;

        let unidade = self.store.set_situacao(id, Situacao::Ativo).await?;
        tracing::info!("♻️ Unidade {} reativada por {}", id, usuario_id);
        self.logs
            .registrar(Acao::Reativar, ENTIDADE, Some(id), Some(usuario_id));

        Ok(unidade.into())
    }

    // --- AUXILIARES ---

    async fn find_ativa(&self, id: Uuid) -> Result<Unidade, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .filter(|u| u.situacao.is_ativo())
            .ok_or(AppError::UnidadeNotFound)
    }

    async fn garantir_nome_livre(&self, nome: &str, exceto: Option<Uuid>) -> Result<(), AppError> {
        if self.store.find_active_by_nome(nome, exceto).await?.is_some() {
            return Err(AppError::UnidadeAlreadyExists);
        }
        Ok(())
    }
}

fn nome_obrigatorio(nome: &str) -> Result<String, AppError> {
    let nome = nome.trim();
    if nome.is_empty() {
        return Err(AppError::campo_invalido("nome", "O nome da unidade é obrigatório."));
    }
    Ok(nome.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memoria::MemoriaStore;
    use crate::db::ProcessoStore;
    use crate::models::processo::NovoProcesso;

    fn servico() -> (UnidadeService, MemoriaStore) {
        let store = MemoriaStore::new();
        let service =
            UnidadeService::new(Arc::new(store.clone()), LogService::new(Arc::new(store.clone())));
        (service, store)
    }

    fn payload(nome: &str) -> CreateUnidadePayload {
        CreateUnidadePayload { nome: nome.into() }
    }

    #[tokio::test]
    async fn reativar_so_vale_para_unidade_inativa() {
        let (service, _) = servico();
        let user = Uuid::new_v4();
        let cojur = service.create(payload("COJUR"), user).await.expect("criar");

        assert!(matches!(
            service.reativar(cojur.id, user).await,
            Err(AppError::UnidadeAlreadyActive)
        ));

        service.remove(cojur.id, user).await.expect("remover");
        assert!(matches!(service.find_by_id(cojur.id).await, Err(AppError::UnidadeNotFound)));

        let reativada = service.reativar(cojur.id, user).await.expect("reativar");
        assert_eq!(reativada.situacao, Situacao::Ativo);
        assert_eq!(
            service.find_by_id(cojur.id).await.expect("buscar").situacao,
            Situacao::Ativo
        );
    }

    #[tokio::test]
    async fn reativar_rejeita_nome_ja_ocupado() {
        let (service, _) = servico();
        let user = Uuid::new_v4();
        let antiga = service.create(payload("SMDU"), user).await.expect("criar");
        service.remove(antiga.id, user).await.expect("remover");
        service.create(payload("SMDU"), user).await.expect("recriar");

        assert!(matches!(
            service.reativar(antiga.id, user).await,
            Err(AppError::UnidadeAlreadyExists)
        ));
    }

    #[tokio::test]
    async fn remocao_bloqueada_por_processos_ativos() {
        let (service, store) = servico();
        let user = Uuid::new_v4();
        let smdu = service.create(payload("SMDU"), user).await.expect("criar");
        ProcessoStore::create(
            &store,
            NovoProcesso {
                numero_sei: "0001/2026".into(),
                assunto: "Licença".into(),
                origem: "Cidadão".into(),
                observacoes: None,
                interessado_id: None,
                unidade_remetente: "COJUR".into(),
                unidade_destino: Some("SMDU".into()),
                prazo: None,
                prorrogacao: None,
                criado_por: user,
            },
        )
        .await
        .expect("processo");

        assert!(matches!(
            service.remove(smdu.id, user).await,
            Err(AppError::UnidadeInUse(1))
        ));
    }

    #[tokio::test]
    async fn renomear_unidade_citada_por_processo_ativo_e_bloqueado() {
        let (service, store) = servico();
        let user = Uuid::new_v4();
        let smdu = service.create(payload("SMDU"), user).await.expect("criar");
        let processo = ProcessoStore::create(
            &store,
            NovoProcesso {
                numero_sei: "0002/2026".into(),
                assunto: "Licença".into(),
                origem: "Cidadão".into(),
                observacoes: None,
                interessado_id: None,
                unidade_remetente: "COJUR".into(),
                unidade_destino: Some("SMDU".into()),
                prazo: None,
                prorrogacao: None,
                criado_por: user,
            },
        )
        .await
        .expect("processo");

        let renomear = || UpdateUnidadePayload { nome: Some("SMDU-2".into()) };
        assert!(matches!(
            service.update(smdu.id, renomear(), user).await,
            Err(AppError::UnidadeInUse(1))
        ));
        assert_eq!(service.find_by_id(smdu.id).await.expect("buscar").nome, "SMDU");
        assert!(matches!(
            service.remove(smdu.id, user).await,
            Err(AppError::UnidadeInUse(1))
        ));

        ProcessoStore::set_situacao(&store, processo, Situacao::Inativo)
            .await
            .expect("inativar");
        let renomeada = service.update(smdu.id, renomear(), user).await.expect("renomear");
        assert_eq!(renomeada.nome, "SMDU-2");
    }

    #[tokio::test]
    async fn busca_paginada_so_traz_ativas_em_ordem_de_nome() {
        let (service, _) = servico();
        let user = Uuid::new_v4();
        for nome in ["SMDU", "COJUR", "GAB", "CGM"] {
            service.create(payload(nome), user).await.expect("criar");
        }
        let gab = service.lista_completa(false).await.expect("lista")[2].id;
        service.remove(gab, user).await.expect("remover");

        let pagina = service
            .search(Paginacao { pagina: 1, limite: 2 }, None)
            .await
            .expect("busca");
        let nomes: Vec<&str> = pagina.dados.iter().map(|u| u.nome.as_str()).collect();

        assert_eq!(nomes, vec!["CGM", "COJUR"]);
        assert_eq!(pagina.total, 3);
        assert_eq!(pagina.total_paginas, 2);

        let filtrada = service
            .search(Paginacao::default(), Some(" du "))
            .await
            .expect("busca");
        assert_eq!(filtrada.total, 1);
        assert_eq!(service.lista_completa(true).await.expect("lista").len(), 4);
    }

    #[tokio::test]
    async fn nome_duplicado_entre_ativas_e_rejeitado() {
        let (service, _) = servico();
        let user = Uuid::new_v4();
        service.create(payload("COJUR"), user).await.expect("criar");
        let gab = service.create(payload("GAB"), user).await.expect("criar");

        assert!(matches!(
            service.create(payload(" COJUR "), user).await,
            Err(AppError::UnidadeAlreadyExists)
        ));
        assert!(matches!(
            service
                .update(gab.id, UpdateUnidadePayload { nome: Some("COJUR".into()) }, user)
                .await,
            Err(AppError::UnidadeAlreadyExists)
        ));
    }
}
