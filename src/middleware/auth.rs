// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{permitido, Operacao},
    },
    models::auth::Perfil,
};

/// Usuário da requisição, extraído do JWT pelo `auth_guard`.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub perfil: Perfil,
}

impl AuthenticatedUser {
    /// Falha com `Forbidden` se o perfil não pode executar a operação.
    pub fn exigir(&self, operacao: Operacao) -> Result<(), AppError> {
        if permitido(self.perfil, operacao) {
            Ok(())
        } else {
            tracing::warn!(
                "Usuário {} ({:?}) sem permissão para {:?}",
                self.id,
                self.perfil,
                operacao
            );
            Err(AppError::Forbidden)
        }
    }
}

// O middleware em si
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale))?;

    let user = app_state
        .auth_service
        .validate_token(bearer.token())
        .map_err(|e| e.to_api_error(&locale))?;

    // Insere o usuário nos "extensions" da requisição
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&Locale::default()))
    }
}
