pub mod filtro;
pub mod interessado_repo;
pub mod log_repo;
pub mod processo_repo;
pub mod unidade_repo;

#[cfg(test)]
pub mod memoria;

pub use interessado_repo::{InteressadoStore, PgInteressadoRepository};
pub use log_repo::{LogStore, PgLogRepository};
pub use processo_repo::{PgProcessoRepository, ProcessoStore};
pub use unidade_repo::{PgUnidadeRepository, UnidadeStore};
