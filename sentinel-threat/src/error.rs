//! Erros específicos do classificador de ameaças

use thiserror::Error;

pub type ThreatResult<T> = Result<T, ThreatError>;

/// Erros das bordas do classificador.
///
/// O caminho de classificação (`detect`) é total e nunca retorna erro;
/// estes variantes cobrem decodificação de leituras, o detector de taxa
/// climática e a configuração estrita.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ThreatError {
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid interval: elapsed time must be positive, got {0}ms")]
    InvalidInterval(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for ThreatError {
    fn from(err: serde_json::Error) -> Self {
        ThreatError::InvalidSnapshot(err.to_string())
    }
}
