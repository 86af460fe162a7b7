// src/handlers/processos.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        pagination::Paginado,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::Operacao},
    models::{
        processo::{
            Andamento, BuscarProcessoQuery, CreateAndamentoPayload, CreateProcessoPayload,
            CreateRespostaFinalPayload, FiltrosProcesso, ProcessoResponse, UpdateProcessoPayload,
        },
        resposta::{RemovidoResponse, TotalResponse, UnidadesRespostaResponse},
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AutocompleteOrigemQuery {
    /// Trecho da origem
    pub q: Option<String>,
}

// =============================================================================
//  BUSCA
// =============================================================================

// GET /api/processos
#[utoipa::path(
    get,
    path = "/api/processos",
    tag = "Processos",
    params(BuscarProcessoQuery),
    responses(
        (status = 200, description = "Página de processos ativos", body = Paginado<ProcessoResponse>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn search(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<BuscarProcessoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::ProcessoLer)
        .map_err(|e| e.to_api_error(&locale))?;

    let pagina = app_state
        .processo_service
        .search(FiltrosProcesso::from(query), Some(user.id))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(pagina))
}

// GET /api/processos/origens/autocomplete
#[utoipa::path(
    get,
    path = "/api/processos/origens/autocomplete",
    tag = "Processos",
    params(AutocompleteOrigemQuery),
    responses(
        (status = 200, description = "Até 10 origens distintas", body = Vec<String>)
    ),
    security(("api_jwt" = []))
)]
pub async fn autocomplete_origens(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Query(query): Query<AutocompleteOrigemQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let origens = app_state
        .processo_service
        .autocomplete_origens(query.q.as_deref().unwrap_or_default())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(origens))
}

// GET /api/processos/contar/vencendo-hoje
#[utoipa::path(
    get,
    path = "/api/processos/contar/vencendo-hoje",
    tag = "Processos",
    responses(
        (status = 200, description = "Processos com prazo ou prorrogação vencendo hoje", body = TotalResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn contar_vencendo_hoje(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::ProcessoLer)
        .map_err(|e| e.to_api_error(&locale))?;

    let total = app_state
        .processo_service
        .contar_vencendo_hoje(Some(user.id))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(TotalResponse { total }))
}

// GET /api/processos/contar/atrasados
#[utoipa::path(
    get,
    path = "/api/processos/contar/atrasados",
    tag = "Processos",
    responses(
        (status = 200, description = "Processos atrasados e não concluídos", body = TotalResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn contar_atrasados(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::ProcessoLer)
        .map_err(|e| e.to_api_error(&locale))?;

    let total = app_state
        .processo_service
        .contar_atrasados(Some(user.id))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(TotalResponse { total }))
}

// GET /api/processos/numero-sei/{numero_sei}
#[utoipa::path(
    get,
    path = "/api/processos/numero-sei/{numero_sei}",
    tag = "Processos",
    params(("numero_sei" = String, Path, description = "Número do processo no SEI")),
    responses(
        (status = 200, body = ProcessoResponse),
        (status = 404, description = "Processo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_by_numero_sei(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(numero_sei): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::ProcessoLer)
        .map_err(|e| e.to_api_error(&locale))?;

    let processo = app_state
        .processo_service
        .find_by_numero_sei(&numero_sei, Some(user.id))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(processo))
}

// GET /api/processos/{id}
#[utoipa::path(
    get,
    path = "/api/processos/{id}",
    tag = "Processos",
    params(("id" = Uuid, Path, description = "ID do processo")),
    responses(
        (status = 200, body = ProcessoResponse),
        (status = 404, description = "Processo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_by_id(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::ProcessoLer)
        .map_err(|e| e.to_api_error(&locale))?;

    let processo = app_state
        .processo_service
        .find_by_id(id, Some(user.id))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(processo))
}

// =============================================================================
//  CICLO DE VIDA
// =============================================================================

// POST /api/processos
#[utoipa::path(
    post,
    path = "/api/processos",
    tag = "Processos",
    request_body = CreateProcessoPayload,
    responses(
        (status = 201, description = "Processo criado", body = ProcessoResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Interessado não encontrado"),
        (status = 409, description = "Número SEI já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateProcessoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::ProcessoCriar)
        .map_err(|e| e.to_api_error(&locale))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let processo = app_state
        .processo_service
        .create(payload, user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(processo)))
}

// PATCH /api/processos/{id}
#[utoipa::path(
    patch,
    path = "/api/processos/{id}",
    tag = "Processos",
    params(("id" = Uuid, Path, description = "ID do processo")),
    request_body = UpdateProcessoPayload,
    responses(
        (status = 200, description = "Processo atualizado", body = ProcessoResponse),
        (status = 404, description = "Processo não encontrado"),
        (status = 409, description = "Número SEI já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProcessoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::ProcessoAtualizar)
        .map_err(|e| e.to_api_error(&locale))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let processo = app_state
        .processo_service
        .update(id, payload, user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(processo))
}

// DELETE /api/processos/{id}
#[utoipa::path(
    delete,
    path = "/api/processos/{id}",
    tag = "Processos",
    params(("id" = Uuid, Path, description = "ID do processo")),
    responses(
        (status = 200, description = "Processo removido (soft delete)", body = RemovidoResponse),
        (status = 403, description = "Apenas administradores"),
        (status = 404, description = "Processo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::ProcessoRemover)
        .map_err(|e| e.to_api_error(&locale))?;

    app_state
        .processo_service
        .remove(id, user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(RemovidoResponse::ok()))
}

// =============================================================================
//  ANDAMENTOS E RESPOSTA FINAL
// =============================================================================

// GET /api/processos/{id}/andamentos
#[utoipa::path(
    get,
    path = "/api/processos/{id}/andamentos",
    tag = "Processos",
    params(("id" = Uuid, Path, description = "ID do processo")),
    responses(
        (status = 200, description = "Andamentos, do mais antigo ao mais recente", body = Vec<Andamento>),
        (status = 404, description = "Processo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_andamentos(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::ProcessoLer)
        .map_err(|e| e.to_api_error(&locale))?;

    let andamentos = app_state
        .processo_service
        .list_andamentos(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(andamentos))
}

// POST /api/processos/{id}/andamentos
#[utoipa::path(
    post,
    path = "/api/processos/{id}/andamentos",
    tag = "Processos",
    params(("id" = Uuid, Path, description = "ID do processo")),
    request_body = CreateAndamentoPayload,
    responses(
        (status = 201, description = "Andamento registrado", body = Andamento),
        (status = 404, description = "Processo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_andamento(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateAndamentoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::AndamentoCriar)
        .map_err(|e| e.to_api_error(&locale))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let andamento = app_state
        .processo_service
        .create_andamento(id, payload, user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(andamento)))
}

// GET /api/processos/{id}/unidades-resposta
#[utoipa::path(
    get,
    path = "/api/processos/{id}/unidades-resposta",
    tag = "Processos",
    params(("id" = Uuid, Path, description = "ID do processo")),
    responses(
        (status = 200, description = "Unidades aptas a dar a resposta final", body = UnidadesRespostaResponse),
        (status = 404, description = "Processo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn unidades_resposta(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let unidades = app_state
        .processo_service
        .unidades_resposta(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(UnidadesRespostaResponse { unidades }))
}

// POST /api/processos/resposta-final
#[utoipa::path(
    post,
    path = "/api/processos/resposta-final",
    tag = "Processos",
    request_body = CreateRespostaFinalPayload,
    responses(
        (status = 201, description = "Resposta final registrada; o processo fica concluído", body = ProcessoResponse),
        (status = 400, description = "Processo sem andamentos ou unidade não elegível"),
        (status = 404, description = "Processo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_resposta_final(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateRespostaFinalPayload>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::RespostaFinalCriar)
        .map_err(|e| e.to_api_error(&locale))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let processo = app_state
        .processo_service
        .create_resposta_final(payload, user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(processo)))
}
