// src/handlers/interessados.rs

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
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::ListaCompletaQuery,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::Operacao},
    models::{
        interessado::{CreateInteressadoPayload, InteressadoResponse, UpdateInteressadoPayload},
        resposta::RemovidoResponse,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AutocompleteInteressadoQuery {
    /// Trecho do nome do interessado
    pub termo: Option<String>,
}

// GET /api/interessados e /api/interessados/lista-completa
#[utoipa::path(
    get,
    path = "/api/interessados/lista-completa",
    tag = "Interessados",
    params(ListaCompletaQuery),
    responses(
        (status = 200, description = "Interessados em ordem alfabética", body = Vec<InteressadoResponse>)
    ),
    security(("api_jwt" = []))
)]
pub async fn lista_completa(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<ListaCompletaQuery>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::InteressadoLer)
        .map_err(|e| e.to_api_error(&locale))?;

    let lista = app_state
        .interessado_service
        .lista_completa(query.incluir_inativos())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(lista))
}

// GET /api/interessados/autocomplete
#[utoipa::path(
    get,
    path = "/api/interessados/autocomplete",
    tag = "Interessados",
    params(AutocompleteInteressadoQuery),
    responses(
        (status = 200, description = "Até 10 interessados ativos que contêm o termo", body = Vec<InteressadoResponse>)
    ),
    security(("api_jwt" = []))
)]
pub async fn autocomplete(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<AutocompleteInteressadoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::InteressadoLer)
        .map_err(|e| e.to_api_error(&locale))?;

    let lista = app_state
        .interessado_service
        .buscar_por_termo(query.termo.as_deref().unwrap_or_default())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(lista))
}

// GET /api/interessados/{id}
#[utoipa::path(
    get,
    path = "/api/interessados/{id}",
    tag = "Interessados",
    params(("id" = Uuid, Path, description = "ID do interessado")),
    responses(
        (status = 200, body = InteressadoResponse),
        (status = 404, description = "Interessado não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_by_id(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::InteressadoLer)
        .map_err(|e| e.to_api_error(&locale))?;

    let interessado = app_state
        .interessado_service
        .find_by_id(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(interessado))
}

// POST /api/interessados
#[utoipa::path(
    post,
    path = "/api/interessados",
    tag = "Interessados",
    request_body = CreateInteressadoPayload,
    responses(
        (status = 201, description = "Interessado criado", body = InteressadoResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Já existe um interessado ativo com este nome")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateInteressadoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::InteressadoEscrever)
        .map_err(|e| e.to_api_error(&locale))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let interessado = app_state
        .interessado_service
        .create(payload, user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(interessado)))
}

// PATCH /api/interessados/{id}
#[utoipa::path(
    patch,
    path = "/api/interessados/{id}",
    tag = "Interessados",
    params(("id" = Uuid, Path, description = "ID do interessado")),
    request_body = UpdateInteressadoPayload,
    responses(
        (status = 200, body = InteressadoResponse),
        (status = 404, description = "Interessado não encontrado"),
        (status = 409, description = "Já existe um interessado ativo com este nome")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInteressadoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::InteressadoEscrever)
        .map_err(|e| e.to_api_error(&locale))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let interessado = app_state
        .interessado_service
        .update(id, payload, user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(interessado))
}

// DELETE /api/interessados/{id}
#[utoipa::path(
    delete,
    path = "/api/interessados/{id}",
    tag = "Interessados",
    params(("id" = Uuid, Path, description = "ID do interessado")),
    responses(
        (status = 200, description = "Interessado removido (soft delete)", body = RemovidoResponse),
        (status = 404, description = "Interessado não encontrado"),
        (status = 409, description = "Há processos ativos vinculados")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::InteressadoRemover)
        .map_err(|e| e.to_api_error(&locale))?;

    app_state
        .interessado_service
        .remove(id, user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(RemovidoResponse::ok()))
}
