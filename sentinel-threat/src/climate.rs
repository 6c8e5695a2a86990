//! Detector de taxa climática (ponto de extensão)
//!
//! Variações rápidas de temperatura ou umidade entre duas amostras podem
//! indicar manipulação deliberada do ambiente. O detector existe como
//! candidato a assinatura, mas não faz parte da cadeia de prioridade de
//! [`ThreatClassifier::detect`](crate::ThreatClassifier::detect).

use serde::{Deserialize, Serialize};

use crate::error::{ThreatError, ThreatResult};

/// Taxa máxima tolerada (°C/min ou %/min)
pub const CLIMATE_RATE_LIMIT_PER_MIN: f32 = 0.08;

/// Amostra climática com instante monotônico
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateSample {
    pub temperature: f32,
    pub humidity: f32,
    pub timestamp_ms: u64,
}

impl ClimateSample {
    pub fn new(temperature: f32, humidity: f32, timestamp_ms: u64) -> Self {
        Self {
            temperature,
            humidity,
            timestamp_ms,
        }
    }
}

/// Taxas de variação entre duas amostras, por minuto
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateRate {
    pub temperature_per_min: f32,
    pub humidity_per_min: f32,
}

impl ClimateRate {
    /// Calcula as taxas entre `previous` e `current`.
    ///
    /// Falha com [`ThreatError::InvalidInterval`] se `current` não for
    /// posterior a `previous`.
    pub fn between(previous: &ClimateSample, current: &ClimateSample) -> ThreatResult<Self> {
        let elapsed_ms = current.timestamp_ms.saturating_sub(previous.timestamp_ms);
        if elapsed_ms == 0 {
            return Err(ThreatError::InvalidInterval(elapsed_ms));
        }

        let minutes = elapsed_ms as f32 / 1000.0 / 60.0;
        Ok(Self {
            temperature_per_min: (current.temperature - previous.temperature).abs() / minutes,
            humidity_per_min: (current.humidity - previous.humidity).abs() / minutes,
        })
    }

    pub fn exceeds(&self, limit: f32) -> bool {
        self.temperature_per_min > limit || self.humidity_per_min > limit
    }
}

/// Verdadeiro se temperatura ou umidade variam acima do limite
pub fn detect_climate_weaponization(
    previous: &ClimateSample,
    current: &ClimateSample,
) -> ThreatResult<bool> {
    Ok(ClimateRate::between(previous, current)?.exceeds(CLIMATE_RATE_LIMIT_PER_MIN))
}

/// Acompanha a última amostra para avaliação contínua
#[derive(Debug, Clone, Default)]
pub struct ClimateWatch {
    last: Option<ClimateSample>,
}

impl ClimateWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra a amostra e retorna a taxa desde a anterior, se houver
    pub fn observe(&mut self, sample: ClimateSample) -> ThreatResult<Option<ClimateRate>> {
        let rate = match self.last {
            Some(previous) => Some(ClimateRate::between(&previous, &sample)?),
            None => None,
        };
        self.last = Some(sample);
        Ok(rate)
    }

    pub fn last(&self) -> Option<&ClimateSample> {
        self.last.as_ref()
    }
}
