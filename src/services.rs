pub mod auth;
pub mod interessado_service;
pub mod log_service;
pub mod processo_service;
pub mod unidade_service;
