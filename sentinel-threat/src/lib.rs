//! # sentinel-threat - Classificador de ameaças no ar
//!
//! Consome uma leitura multicanal de qualidade do ar e emite uma
//! classificação: um rótulo benigno ou uma assinatura de ameaça nomeada
//! com descrição diagnóstica.
//!
//! ## Componentes
//!
//! - [`baseline`] - Linha de base adaptativa de VOC (média móvel exponencial)
//! - [`signatures`] - Tabela ordenada das doze assinaturas de ameaça
//! - [`classifier`] - Avaliação por prioridade, fallback e override por resistência
//! - [`climate`] - Detector de taxa climática (não ligado ao classificador)
//! - [`config`] - Limiares e linha de base via `.env`
//!
//! ## Exemplo
//!
//! ```rust
//! use sentinel_threat::{SensorSnapshot, ThreatClassifier, ThresholdConfig};
//!
//! let mut classifier = ThreatClassifier::new(ThresholdConfig::default());
//! let snapshot = SensorSnapshot::new(30.0, 0.2, 420.0, 22.0, 45.0, 50_000.0, false, 1.0, 3.0, 6.0);
//!
//! let result = classifier.detect(&snapshot);
//! assert!(!result.is_threat);
//! assert!(result.signature.starts_with("Clean_Air_IAQ30_VOC0.20ppm"));
//! ```

pub mod baseline;
pub mod classifier;
pub mod climate;
pub mod config;
pub mod error;
pub mod signatures;
pub mod types;

pub use baseline::{BaselineConfig, BaselineTracker, Clock, ManualClock, MonotonicClock};
pub use classifier::{ResistanceFlags, ThreatClassifier, is_spike};
pub use climate::{ClimateRate, ClimateSample, ClimateWatch, detect_climate_weaponization};
pub use error::{ThreatError, ThreatResult};
pub use signatures::{
    Channel, Criterion, Interval, SIGNATURES, ThreatKind, ThreatSignature,
};
pub use types::{DetectionResult, SensorSnapshot, ThresholdConfig, Verdict};
