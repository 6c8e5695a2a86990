//! Tipos de dados do classificador

use serde::{Deserialize, Serialize};

use crate::signatures::ThreatKind;

/// Leitura multicanal de um único ciclo de amostragem.
///
/// Os valores não são validados: leituras fisicamente implausíveis
/// (umidade > 100, resistência negativa) simplesmente casam ou não com
/// as janelas das assinaturas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Índice de qualidade do ar (0-500)
    pub iaq: f32,
    /// Proxy de VOC (~0-2)
    pub voc: f32,
    /// CO2 em ppm
    #[serde(default)]
    pub co2: f32,
    /// Temperatura (°C)
    pub temperature: f32,
    /// Umidade relativa (%)
    pub humidity: f32,
    /// Resistência bruta do sensor de gás (Ω)
    #[serde(alias = "raw_gas", alias = "rawGasResistance")]
    pub gas_resistance: f32,
    /// PM1 (µg/m³)
    #[serde(default)]
    pub pm1: f32,
    /// PM2.5 (µg/m³)
    #[serde(alias = "pm2_5")]
    pub pm25: f32,
    /// PM10 (µg/m³)
    #[serde(default)]
    pub pm10: f32,
    /// Flag de pico decidida pelo chamador, repassada sem alteração
    #[serde(default, alias = "in_spike")]
    pub spike: bool,
    /// Instante monotônico (ms) quando a leitura vem de um replay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
}

impl SensorSnapshot {
    /// Cria leitura na mesma ordem de canais do firmware de aquisição
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        iaq: f32,
        voc: f32,
        co2: f32,
        temperature: f32,
        humidity: f32,
        gas_resistance: f32,
        spike: bool,
        pm1: f32,
        pm25: f32,
        pm10: f32,
    ) -> Self {
        Self {
            iaq,
            voc,
            co2,
            temperature,
            humidity,
            gas_resistance,
            pm1,
            pm25,
            pm10,
            spike,
            timestamp_ms: None,
        }
    }

    /// Leitura típica de ar limpo interno
    pub fn clean_air() -> Self {
        Self::new(25.0, 0.3, 420.0, 22.0, 45.0, 60_000.0, false, 2.0, 4.0, 8.0)
    }

    /// Decodifica uma leitura JSON (uma linha de um arquivo JSON Lines)
    pub fn from_json(line: &str) -> crate::ThreatResult<Self> {
        Ok(serde_json::from_str(line)?)
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    pub fn with_spike(mut self, spike: bool) -> Self {
        self.spike = spike;
        self
    }
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self::clean_air()
    }
}

/// Rótulo tipado de uma classificação
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Uma das doze assinaturas da tabela casou
    Signature(ThreatKind),
    /// Portador de GLP sem desvio de VOC (benigno)
    LpgCarrierOnly,
    /// Resistência baixa com IAQ/VOC moderados
    StealthContamination,
    /// Resistência suspeita com IAQ/VOC baixos
    MaskedAttack,
    /// Ar limpo
    CleanAir,
    /// Nenhuma heurística conclusiva
    Unknown,
}

impl Verdict {
    /// Retorna o tipo de ameaça quando o veredito vem da tabela
    pub fn threat_kind(&self) -> Option<ThreatKind> {
        match self {
            Verdict::Signature(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Veredito produzido pela cadeia de fallback
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            Verdict::StealthContamination
                | Verdict::MaskedAttack
                | Verdict::CleanAir
                | Verdict::Unknown
        )
    }
}

/// Resultado de uma chamada a `detect`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub is_threat: bool,
    pub is_spike: bool,
    /// Descrição diagnóstica; nunca vazia
    pub signature: String,
    pub verdict: Verdict,
}

/// Limiares do operador, usados apenas pelo utilitário de pico
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub iaq: f32,
    pub voc: f32,
    pub co2: f32,
    pub pm25: f32,
}

impl ThresholdConfig {
    pub const DEFAULT_IAQ: f32 = 100.0;
    pub const DEFAULT_VOC: f32 = 1.0;
    pub const DEFAULT_CO2: f32 = 1000.0;
    pub const DEFAULT_PM25: f32 = 35.0;

    pub fn new(iaq: f32, voc: f32, co2: f32, pm25: f32) -> Self {
        Self { iaq, voc, co2, pm25 }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_IAQ,
            Self::DEFAULT_VOC,
            Self::DEFAULT_CO2,
            Self::DEFAULT_PM25,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_json_aliases() {
        let line = r#"{"iaq":52.0,"voc":0.505,"temperature":30.0,"humidity":80.0,
            "rawGasResistance":30000.0,"pm2_5":5.0,"in_spike":true}"#;
        let snapshot = SensorSnapshot::from_json(line).unwrap();

        assert_eq!(snapshot.gas_resistance, 30_000.0);
        assert_eq!(snapshot.pm25, 5.0);
        assert!(snapshot.spike);
        assert_eq!(snapshot.co2, 0.0);
        assert!(snapshot.timestamp_ms.is_none());
    }

    #[test]
    fn test_snapshot_from_json_invalid() {
        let result = SensorSnapshot::from_json(r#"{"iaq": 50.0}"#);
        assert!(matches!(result, Err(crate::ThreatError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_snapshot_builders() {
        let snapshot = SensorSnapshot::clean_air()
            .with_timestamp(1_000)
            .with_spike(true);
        assert_eq!(snapshot.timestamp_ms, Some(1_000));
        assert!(snapshot.spike);
    }

    #[test]
    fn test_verdict_threat_kind() {
        let verdict = Verdict::Signature(ThreatKind::Opioids);
        assert_eq!(verdict.threat_kind(), Some(ThreatKind::Opioids));
        assert!(!verdict.is_fallback());

        assert_eq!(Verdict::CleanAir.threat_kind(), None);
        assert!(Verdict::CleanAir.is_fallback());
        assert!(!Verdict::LpgCarrierOnly.is_fallback());
    }

    #[test]
    fn test_threshold_defaults() {
        let thresholds = ThresholdConfig::default();
        assert_eq!(thresholds.iaq, 100.0);
        assert_eq!(thresholds.pm25, 35.0);
    }
}
