// src/handlers/unidades.rs

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
        pagination::{Paginacao, Paginado},
    },
    config::AppState,
    handlers::ListaCompletaQuery,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::Operacao},
    models::{
        resposta::RemovidoResponse,
        unidade::{CreateUnidadePayload, UnidadeResponse, UpdateUnidadePayload},
    },
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BuscarUnidadeQuery {
    /// Número da página (padrão 1)
    pub pagina: Option<String>,
    /// Itens por página (padrão 10)
    pub limite: Option<String>,
    /// Trecho do nome
    pub busca: Option<String>,
}

// GET /api/unidades
#[utoipa::path(
    get,
    path = "/api/unidades",
    tag = "Unidades",
    params(BuscarUnidadeQuery),
    responses(
        (status = 200, description = "Página de unidades ativas", body = Paginado<UnidadeResponse>)
    ),
    security(("api_jwt" = []))
)]
pub async fn search(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<BuscarUnidadeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::UnidadeLer)
        .map_err(|e| e.to_api_error(&locale))?;

    let paginacao = Paginacao::from_raw(query.pagina.as_deref(), query.limite.as_deref());
    let pagina = app_state
        .unidade_service
        .search(paginacao, query.busca.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(pagina))
}

// GET /api/unidades/lista-completa
#[utoipa::path(
    get,
    path = "/api/unidades/lista-completa",
    tag = "Unidades",
    params(ListaCompletaQuery),
    responses(
        (status = 200, description = "Unidades em ordem alfabética", body = Vec<UnidadeResponse>)
    ),
    security(("api_jwt" = []))
)]
pub async fn lista_completa(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<ListaCompletaQuery>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::UnidadeLer)
        .map_err(|e| e.to_api_error(&locale))?;

    let lista = app_state
        .unidade_service
        .lista_completa(query.incluir_inativos())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(lista))
}

// GET /api/unidades/{id}
#[utoipa::path(
    get,
    path = "/api/unidades/{id}",
    tag = "Unidades",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses(
        (status = 200, body = UnidadeResponse),
        (status = 404, description = "Unidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_by_id(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::UnidadeLer)
        .map_err(|e| e.to_api_error(&locale))?;

    let unidade = app_state
        .unidade_service
        .find_by_id(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(unidade))
}

// POST /api/unidades
#[utoipa::path(
    post,
    path = "/api/unidades",
    tag = "Unidades",
    request_body = CreateUnidadePayload,
    responses(
        (status = 201, description = "Unidade criada", body = UnidadeResponse),
        (status = 403, description = "Apenas administradores"),
        (status = 409, description = "Já existe uma unidade ativa com este nome")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateUnidadePayload>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::UnidadeEscrever)
        .map_err(|e| e.to_api_error(&locale))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let unidade = app_state
        .unidade_service
        .create(payload, user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(unidade)))
}

// PATCH /api/unidades/{id}
#[utoipa::path(
    patch,
    path = "/api/unidades/{id}",
    tag = "Unidades",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    request_body = UpdateUnidadePayload,
    responses(
        (status = 200, body = UnidadeResponse),
        (status = 404, description = "Unidade não encontrada"),
        (status = 409, description = "Já existe uma unidade ativa com este nome")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUnidadePayload>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::UnidadeEscrever)
        .map_err(|e| e.to_api_error(&locale))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let unidade = app_state
        .unidade_service
        .update(id, payload, user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(unidade))
}

// DELETE /api/unidades/{id}
#[utoipa::path(
    delete,
    path = "/api/unidades/{id}",
    tag = "Unidades",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses(
        (status = 200, description = "Unidade removida (soft delete)", body = RemovidoResponse),
        (status = 404, description = "Unidade não encontrada"),
        (status = 409, description = "Há processos ativos usando a unidade")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::UnidadeEscrever)
        .map_err(|e| e.to_api_error(&locale))?;

    app_state
        .unidade_service
        .remove(id, user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(RemovidoResponse::ok()))
}

// PATCH /api/unidades/{id}/reativar
#[utoipa::path(
    patch,
    path = "/api/unidades/{id}/reativar",
    tag = "Unidades",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses(
        (status = 200, description = "Unidade reativada", body = UnidadeResponse),
        (status = 400, description = "Unidade já está ativa"),
        (status = 404, description = "Unidade não encontrada"),
        (status = 409, description = "Outra unidade ativa usa o mesmo nome")
    ),
    security(("api_jwt" = []))
)]
pub async fn reativar(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.exigir(Operacao::UnidadeEscrever)
        .map_err(|e| e.to_api_error(&locale))?;

    let unidade = app_state
        .unidade_service
        .reativar(id, user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(unidade))
}
