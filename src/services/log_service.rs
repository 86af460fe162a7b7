// src/services/log_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::LogStore,
    models::log::{Acao, RegistroLog},
};

/// Registro de ações dos usuários. Falhas aqui nunca derrubam a operação principal.
#[derive(Clone)]
pub struct LogService {
    store: Arc<dyn LogStore>,
}

impl LogService {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }

    pub fn registrar(
        &self,
        acao: Acao,
        entidade: &'static str,
        entidade_id: Option<Uuid>,
        usuario_id: Option<Uuid>,
    ) -> tokio::task::JoinHandle<()> {
        let registro = RegistroLog {
            acao,
            entidade,
            entidade_id,
            usuario_id,
        };
        let store = self.store.clone();

        // Fire-and-forget: quem chama não espera a gravação
        tokio::spawn(async move {
            if let Err(e) = store.registrar(&registro).await {
                tracing::warn!(
                    "⚠️ Falha ao registrar log {} de {}: {}",
                    registro.acao.as_str(),
                    registro.entidade,
                    e
                );
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memoria::MemoriaStore;

    #[tokio::test]
    async fn grava_o_registro_em_segundo_plano() {
        let store = MemoriaStore::new();
        let logs = LogService::new(Arc::new(store.clone()));
        let id = Uuid::new_v4();

        logs.registrar(Acao::Criar, "processo", Some(id), None)
            .await
            .expect("task");

        let dados = store.dados();
        assert_eq!(dados.logs.len(), 1);
        assert_eq!(dados.logs[0].acao, Acao::Criar);
        assert_eq!(dados.logs[0].entidade_id, Some(id));
    }

    #[tokio::test]
    async fn falha_do_log_nao_propaga() {
        let store = MemoriaStore::new();
        store.dados().falhar_logs = true;
        let logs = LogService::new(Arc::new(store.clone()));

        // A task termina normalmente mesmo com o erro da gravação
        assert!(logs.registrar(Acao::Remover, "unidade", None, None).await.is_ok());
        assert!(store.dados().logs.is_empty());
    }
}
