pub mod auth;
pub mod interessado;
pub mod log;
pub mod processo;
pub mod resposta;
pub mod situacao;
pub mod unidade;
