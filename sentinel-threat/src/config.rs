//! Configuração via arquivo .env ou variáveis de ambiente
//!
//! Os acessores tolerantes caem no valor padrão quando a variável está
//! ausente ou mal formada; as variantes `strict` reportam o erro.

use std::env;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::baseline::{BASELINE_UPDATE_INTERVAL_MS, BaselineConfig, INITIAL_VOC_BASELINE};
use crate::error::{ThreatError, ThreatResult};
use crate::types::ThresholdConfig;

pub const ENV_IAQ_THRESHOLD: &str = "SENTINEL_IAQ_THRESHOLD";
pub const ENV_VOC_THRESHOLD: &str = "SENTINEL_VOC_THRESHOLD";
pub const ENV_CO2_THRESHOLD: &str = "SENTINEL_CO2_THRESHOLD";
pub const ENV_PM25_THRESHOLD: &str = "SENTINEL_PM25_THRESHOLD";
pub const ENV_BASELINE_INTERVAL_MS: &str = "SENTINEL_BASELINE_INTERVAL_MS";
pub const ENV_INITIAL_VOC_BASELINE: &str = "SENTINEL_INITIAL_VOC_BASELINE";

// Carrega o .env na primeira consulta
static DOTENV_INIT: Lazy<()> = Lazy::new(|| {
    let _ = dotenv::dotenv();
});

#[inline]
fn ensure_loaded() {
    let _ = &*DOTENV_INIT;
}

fn lenient<T: FromStr>(key: &str, default: T) -> T {
    ensure_loaded();
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn strict<T: FromStr>(key: &str, default: T) -> ThreatResult<T> {
    ensure_loaded();
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            ThreatError::InvalidConfig(format!("{} has unparseable value '{}'", key, raw))
        }),
        Err(_) => Ok(default),
    }
}

/// Limiar de IAQ
/// Default: 100.0
pub fn iaq_threshold() -> f32 {
    lenient(ENV_IAQ_THRESHOLD, ThresholdConfig::DEFAULT_IAQ)
}

/// Limiar de VOC
/// Default: 1.0
pub fn voc_threshold() -> f32 {
    lenient(ENV_VOC_THRESHOLD, ThresholdConfig::DEFAULT_VOC)
}

/// Limiar de CO2 (ppm)
/// Default: 1000.0
pub fn co2_threshold() -> f32 {
    lenient(ENV_CO2_THRESHOLD, ThresholdConfig::DEFAULT_CO2)
}

/// Limiar de PM2.5 (µg/m³)
/// Default: 35.0
pub fn pm25_threshold() -> f32 {
    lenient(ENV_PM25_THRESHOLD, ThresholdConfig::DEFAULT_PM25)
}

/// Intervalo mínimo entre atualizações da linha de base
/// Default: 300000 ms (5 min)
pub fn baseline_interval_ms() -> u64 {
    lenient(ENV_BASELINE_INTERVAL_MS, BASELINE_UPDATE_INTERVAL_MS)
}

/// Linha de base inicial de VOC
/// Default: 0.5
pub fn initial_voc_baseline() -> f32 {
    lenient(ENV_INITIAL_VOC_BASELINE, INITIAL_VOC_BASELINE)
}

impl ThresholdConfig {
    /// Limiares do ambiente, com padrões para valores ausentes ou inválidos
    pub fn from_env() -> Self {
        Self::new(
            iaq_threshold(),
            voc_threshold(),
            co2_threshold(),
            pm25_threshold(),
        )
    }

    /// Como [`ThresholdConfig::from_env`], mas falha em valores inválidos
    pub fn from_env_strict() -> ThreatResult<Self> {
        Ok(Self::new(
            strict(ENV_IAQ_THRESHOLD, Self::DEFAULT_IAQ)?,
            strict(ENV_VOC_THRESHOLD, Self::DEFAULT_VOC)?,
            strict(ENV_CO2_THRESHOLD, Self::DEFAULT_CO2)?,
            strict(ENV_PM25_THRESHOLD, Self::DEFAULT_PM25)?,
        ))
    }
}

impl BaselineConfig {
    pub fn from_env() -> Self {
        Self {
            interval_ms: baseline_interval_ms(),
            initial_voc: initial_voc_baseline(),
        }
    }

    pub fn from_env_strict() -> ThreatResult<Self> {
        Ok(Self {
            interval_ms: strict(ENV_BASELINE_INTERVAL_MS, BASELINE_UPDATE_INTERVAL_MS)?,
            initial_voc: strict(ENV_INITIAL_VOC_BASELINE, INITIAL_VOC_BASELINE)?,
        })
    }
}
