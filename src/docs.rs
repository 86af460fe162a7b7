// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Processos ---
        handlers::processos::search,
        handlers::processos::autocomplete_origens,
        handlers::processos::contar_vencendo_hoje,
        handlers::processos::contar_atrasados,
        handlers::processos::find_by_numero_sei,
        handlers::processos::find_by_id,
        handlers::processos::create,
        handlers::processos::update,
        handlers::processos::remove,
        handlers::processos::list_andamentos,
        handlers::processos::create_andamento,
        handlers::processos::unidades_resposta,
        handlers::processos::create_resposta_final,

        // --- Unidades ---
        handlers::unidades::search,
        handlers::unidades::lista_completa,
        handlers::unidades::find_by_id,
        handlers::unidades::create,
        handlers::unidades::update,
        handlers::unidades::remove,
        handlers::unidades::reativar,

        // --- Interessados ---
        handlers::interessados::lista_completa,
        handlers::interessados::autocomplete,
        handlers::interessados::find_by_id,
        handlers::interessados::create,
        handlers::interessados::update,
        handlers::interessados::remove,
    ),
    components(
        schemas(
            models::situacao::Situacao,
            models::auth::Perfil,

            // --- Processos ---
            models::processo::ProcessoResponse,
            models::processo::Andamento,
            models::processo::CreateProcessoPayload,
            models::processo::UpdateProcessoPayload,
            models::processo::CreateAndamentoPayload,
            models::processo::CreateRespostaFinalPayload,

            // --- Unidades ---
            models::unidade::UnidadeResponse,
            models::unidade::CreateUnidadePayload,
            models::unidade::UpdateUnidadePayload,

            // --- Interessados ---
            models::interessado::InteressadoResponse,
            models::interessado::CreateInteressadoPayload,
            models::interessado::UpdateInteressadoPayload,

            // --- Respostas ---
            models::resposta::RemovidoResponse,
            models::resposta::TotalResponse,
            models::resposta::UnidadesRespostaResponse,
        )
    ),
    tags(
        (name = "Processos", description = "Processos, andamentos e resposta final"),
        (name = "Unidades", description = "Unidades administrativas"),
        (name = "Interessados", description = "Interessados vinculados aos processos")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
