//! Classificador de ameaças
//!
//! Fluxo de uma chamada:
//!
//! 1. Atualiza a linha de base de VOC (no máximo uma vez por intervalo)
//! 2. Avalia as assinaturas 1..12 em ordem; a primeira que casa decide
//! 3. Sem assinatura, aplica as heurísticas de fallback em ordem
//! 4. Resistência de gás baixa força `is_threat` no resultado do fallback

use tracing::{debug, warn};

use crate::baseline::{BaselineConfig, BaselineTracker, Clock, MonotonicClock};
use crate::signatures::{self, Report, ThreatSignature};
use crate::types::{DetectionResult, SensorSnapshot, ThresholdConfig, Verdict};

/// Abaixo disto a resistência indica contaminação (Ω)
pub const LOW_RESISTANCE_OHMS: f32 = 10_000.0;

/// Abaixo disto a resistência é suspeita (Ω)
pub const SUSPICIOUS_RESISTANCE_OHMS: f32 = 25_000.0;

/// Acima disto a resistência é compatível com ar limpo (Ω)
pub const CLEAN_RESISTANCE_OHMS: f32 = 45_000.0;

/// Flags derivadas da resistência bruta do sensor de gás
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResistanceFlags {
    pub low: bool,
    pub suspicious: bool,
}

impl ResistanceFlags {
    pub fn from_ohms(ohms: f32) -> Self {
        Self {
            low: ohms < LOW_RESISTANCE_OHMS,
            suspicious: ohms < SUSPICIOUS_RESISTANCE_OHMS,
        }
    }
}

/// Compara um valor com sua referência: `(current - baseline) > threshold`.
///
/// Utilitário sem estado; não participa de `detect`.
pub fn is_spike(current: f32, baseline: f32, threshold: f32) -> bool {
    (current - baseline) > threshold
}

/// Classificador com linha de base própria e relógio injetado
#[derive(Debug)]
pub struct ThreatClassifier<C: Clock = MonotonicClock> {
    thresholds: ThresholdConfig,
    baseline: BaselineTracker,
    clock: C,
    detection_count: u64,
}

impl ThreatClassifier<MonotonicClock> {
    /// Cria classificador com relógio monotônico a partir de agora
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self::with_clock(thresholds, MonotonicClock::new())
    }

    /// Cria classificador com limiares e linha de base vindos do ambiente
    pub fn from_env() -> Self {
        Self::new(ThresholdConfig::from_env()).with_baseline(BaselineConfig::from_env())
    }
}

impl Default for ThreatClassifier<MonotonicClock> {
    fn default() -> Self {
        Self::new(ThresholdConfig::default())
    }
}

impl<C: Clock> ThreatClassifier<C> {
    pub fn with_clock(thresholds: ThresholdConfig, clock: C) -> Self {
        Self {
            thresholds,
            baseline: BaselineTracker::new(),
            clock,
            detection_count: 0,
        }
    }

    /// Substitui os parâmetros da linha de base (reinicia o rastreador)
    pub fn with_baseline(mut self, config: BaselineConfig) -> Self {
        self.baseline = BaselineTracker::with_config(config);
        self
    }

    /// Classifica uma leitura usando o relógio do classificador
    pub fn detect(&mut self, snapshot: &SensorSnapshot) -> DetectionResult {
        let now_ms = self.clock.now_ms();
        self.detect_at(snapshot, now_ms)
    }

    /// Classifica uma leitura num instante explícito
    pub fn detect_at(&mut self, snapshot: &SensorSnapshot, now_ms: u64) -> DetectionResult {
        self.detection_count += 1;
        self.baseline.update(snapshot.voc, now_ms);

        // Todas as assinaturas desta chamada veem a mesma linha de base
        let voc_baseline = self.baseline.voc_baseline();
        let flags = ResistanceFlags::from_ohms(snapshot.gas_resistance);

        if let Some(signature) = signatures::first_match(snapshot, voc_baseline) {
            let result = report(signature, snapshot, voc_baseline);
            debug!(
                kind = ?signature.kind,
                priority = signature.priority,
                is_threat = result.is_threat,
                signature = %result.signature,
                "threat signature matched"
            );
            return result;
        }

        let mut result = fallback(snapshot, flags);
        if flags.low && !result.is_threat {
            warn!(
                gas_resistance = snapshot.gas_resistance,
                verdict = ?result.verdict,
                "low gas resistance overrides non-threat classification"
            );
            result.is_threat = true;
        }

        debug!(
            verdict = ?result.verdict,
            is_threat = result.is_threat,
            signature = %result.signature,
            "fallback classification"
        );
        result
    }

    /// Sobrescreve os limiares, sem validação
    pub fn set_thresholds(&mut self, iaq: f32, voc: f32, co2: f32, pm25: f32) {
        self.thresholds = ThresholdConfig::new(iaq, voc, co2, pm25);
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// Ver [`is_spike`]
    pub fn is_spike(&self, current: f32, baseline: f32, threshold: f32) -> bool {
        is_spike(current, baseline, threshold)
    }

    pub fn voc_baseline(&self) -> f32 {
        self.baseline.voc_baseline()
    }

    pub fn baseline(&self) -> &BaselineTracker {
        &self.baseline
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Número de chamadas a `detect`/`detect_at`
    pub fn detection_count(&self) -> u64 {
        self.detection_count
    }
}

fn threat(signature: String, verdict: Verdict, is_spike: bool) -> DetectionResult {
    DetectionResult {
        is_threat: true,
        is_spike,
        signature,
        verdict,
    }
}

fn report(
    signature: &ThreatSignature,
    snapshot: &SensorSnapshot,
    voc_baseline: f32,
) -> DetectionResult {
    let verdict = Verdict::Signature(signature.kind);

    match signature.report {
        Report::Template(template) => threat(template.render(snapshot), verdict, snapshot.spike),
        Report::LpgCarrier { deviation_limit } => {
            let deviation = snapshot.voc - voc_baseline;
            if deviation.abs() >= deviation_limit {
                let sign = if deviation > 0.0 { '+' } else { '-' };
                threat(
                    format!("DRUG_DELIVERY_IN_LPG_VOC{}{:.3}ppm", sign, deviation.abs()),
                    verdict,
                    snapshot.spike,
                )
            } else {
                DetectionResult {
                    is_threat: false,
                    is_spike: snapshot.spike,
                    signature: format!("LPG_CARRIER_ONLY_VOC:{:.3}", snapshot.voc),
                    verdict: Verdict::LpgCarrierOnly,
                }
            }
        }
    }
}

fn fallback(snapshot: &SensorSnapshot, flags: ResistanceFlags) -> DetectionResult {
    let iaq = snapshot.iaq;
    let voc = snapshot.voc;
    let ohms = snapshot.gas_resistance;

    let (verdict, is_threat, signature) = if iaq <= 65.0 && voc <= 1.2 && flags.low {
        (
            Verdict::StealthContamination,
            true,
            format!("STEALTH_CONTAMINATION_GasRes:{:.0}Ω", ohms),
        )
    } else if iaq <= 55.0 && voc <= 0.6 && flags.suspicious {
        (
            Verdict::MaskedAttack,
            true,
            format!("MASKED_ATTACK_GasRes:{:.0}Ω", ohms),
        )
    } else if iaq <= 35.0 && voc <= 0.4 && ohms > CLEAN_RESISTANCE_OHMS {
        (
            Verdict::CleanAir,
            false,
            format!("Clean_Air_IAQ{:.0}_VOC{:.2}ppm", iaq, voc),
        )
    } else {
        (
            Verdict::Unknown,
            flags.suspicious,
            format!("UNKNOWN_ANALYSIS_IAQ{:.0}_VOC{:.2}ppm", iaq, voc),
        )
    };

    DetectionResult {
        is_threat,
        is_spike: snapshot.spike,
        signature,
        verdict,
    }
}
