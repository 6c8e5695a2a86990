//! Linha de base adaptativa de VOC (média móvel exponencial)
//!
//! A linha de base representa o "ar limpo" de referência. Ela só é
//! atualizada quando o intervalo mínimo desde a última atualização foi
//! excedido, de modo que rajadas curtas de VOC não a contaminam.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Peso da linha de base anterior na média móvel
pub const BASELINE_RETENTION: f32 = 0.8;

/// Intervalo mínimo entre atualizações (5 minutos)
pub const BASELINE_UPDATE_INTERVAL_MS: u64 = 300_000;

/// Linha de base inicial de VOC
pub const INITIAL_VOC_BASELINE: f32 = 0.5;

/// Fonte de tempo monotônico em milissegundos
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Relógio monotônico contando desde a criação, como o contador de
/// uptime de um nó sensor
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Relógio ajustado manualmente (testes e replay de arquivos)
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Parâmetros da linha de base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Intervalo mínimo entre atualizações (ms)
    pub interval_ms: u64,
    /// Valor inicial da linha de base de VOC
    pub initial_voc: f32,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            interval_ms: BASELINE_UPDATE_INTERVAL_MS,
            initial_voc: INITIAL_VOC_BASELINE,
        }
    }
}

/// Rastreador da linha de base de VOC
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineTracker {
    config: BaselineConfig,
    voc_baseline: f32,
    last_update_ms: u64,
}

impl BaselineTracker {
    pub fn new() -> Self {
        Self::with_config(BaselineConfig::default())
    }

    pub fn with_config(config: BaselineConfig) -> Self {
        Self {
            config,
            voc_baseline: config.initial_voc,
            last_update_ms: 0,
        }
    }

    /// Linha de base atual
    pub fn voc_baseline(&self) -> f32 {
        self.voc_baseline
    }

    /// Instante da última atualização (ms)
    pub fn last_update_ms(&self) -> u64 {
        self.last_update_ms
    }

    pub fn config(&self) -> &BaselineConfig {
        &self.config
    }

    /// Incorpora uma leitura de VOC se o intervalo já passou.
    ///
    /// Retorna `true` quando a linha de base foi atualizada. Um relógio
    /// que volta no tempo conta como intervalo zero.
    pub fn update(&mut self, current_voc: f32, now_ms: u64) -> bool {
        let elapsed = now_ms.saturating_sub(self.last_update_ms);
        if elapsed <= self.config.interval_ms {
            return false;
        }

        let previous = self.voc_baseline;
        self.voc_baseline =
            BASELINE_RETENTION * previous + (1.0 - BASELINE_RETENTION) * current_voc;
        self.last_update_ms = now_ms;

        trace!(
            previous,
            baseline = self.voc_baseline,
            sample = current_voc,
            now_ms,
            "voc baseline refreshed"
        );
        true
    }

    /// Desvio da leitura em relação à linha de base
    pub fn deviation(&self, voc: f32) -> f32 {
        voc - self.voc_baseline
    }
}

impl Default for BaselineTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let tracker = BaselineTracker::new();
        assert_eq!(tracker.voc_baseline(), 0.5);
        assert_eq!(tracker.last_update_ms(), 0);
    }

    #[test]
    fn test_no_update_within_interval() {
        let mut tracker = BaselineTracker::new();
        assert!(!tracker.update(1.5, 1_000));
        assert!(!tracker.update(1.5, BASELINE_UPDATE_INTERVAL_MS));
        assert_eq!(tracker.voc_baseline(), 0.5);
    }

    #[test]
    fn test_ema_after_interval() {
        let mut tracker = BaselineTracker::new();
        assert!(tracker.update(1.0, BASELINE_UPDATE_INTERVAL_MS + 1));

        let expected = 0.8 * 0.5 + 0.2 * 1.0;
        assert!((tracker.voc_baseline() - expected).abs() < 1e-6);
        assert_eq!(tracker.last_update_ms(), BASELINE_UPDATE_INTERVAL_MS + 1);
    }

    #[test]
    fn test_interval_restarts_after_update() {
        let mut tracker = BaselineTracker::new();
        let t0 = BASELINE_UPDATE_INTERVAL_MS + 1;
        tracker.update(1.0, t0);
        let after_first = tracker.voc_baseline();

        assert!(!tracker.update(0.0, t0 + 10_000));
        assert_eq!(tracker.voc_baseline(), after_first);

        assert!(tracker.update(0.0, t0 + BASELINE_UPDATE_INTERVAL_MS + 1));
        assert!((tracker.voc_baseline() - 0.8 * after_first).abs() < 1e-6);
    }

    #[test]
    fn test_clock_going_backwards() {
        let mut tracker = BaselineTracker::new();
        tracker.update(1.0, 1_000_000);
        let baseline = tracker.voc_baseline();

        assert!(!tracker.update(2.0, 10));
        assert_eq!(tracker.voc_baseline(), baseline);
    }

    #[test]
    fn test_custom_config() {
        let mut tracker = BaselineTracker::with_config(BaselineConfig {
            interval_ms: 10,
            initial_voc: 0.2,
        });
        assert_eq!(tracker.voc_baseline(), 0.2);
        assert!(tracker.update(0.7, 11));
        assert!((tracker.voc_baseline() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_manual_clock() {
        let clock = Arc::new(ManualClock::new(5));
        let handle = clock.clone();
        handle.advance(10);
        assert_eq!(clock.now_ms(), 15);
        handle.set(2);
        assert_eq!(clock.now_ms(), 2);
    }

    #[test]
    fn test_monotonic_clock_starts_near_zero() {
        let clock = MonotonicClock::new();
        assert!(clock.now_ms() < 60_000);
    }
}
