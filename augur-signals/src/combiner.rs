//! SignalCombiner: gates combined predictions before they reach the alert sink.
//!
//! Gates, in order:
//! 1. The neutral prediction is never signalled.
//! 2. Same category as the last signal, inside the inter-signal cooldown.
//! 3. Below the adaptive threshold of the producing pattern kind.
//! 4. A prediction is still outstanding (single-outstanding mode or the
//!    validator's pending limit).
//! 5. The validator's alert bar (confidence floor plus adaptive conservatism).
//!
//! A prediction that passes is registered with the validator first, then
//! emitted, so a signal always has a pending record behind it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use augur_core::config::SignalConfig;
use augur_core::models::{CombinedPrediction, Signal, ValidationResult};
use augur_core::traits::ISignalSink;
use augur_core::{Category, PatternKind};
use augur_validation::{NewPrediction, PredictionValidator};

use crate::decision::{SignalDecision, Suppression};
use crate::thresholds::AdaptiveThresholds;

/// Emission counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalStats {
    pub emitted: u64,
    pub undelivered: u64,
    /// Suppressions keyed by [`Suppression::label`].
    pub suppressed: BTreeMap<String, u64>,
    pub thresholds: BTreeMap<PatternKind, f64>,
    pub last_signal: Option<Signal>,
}

pub struct SignalCombiner {
    config: SignalConfig,
    thresholds: AdaptiveThresholds,
    last_emitted: Option<(Category, DateTime<Utc>)>,
    stats: SignalStats,
}

impl SignalCombiner {
    pub fn new(config: SignalConfig) -> Self {
        Self {
            thresholds: AdaptiveThresholds::new(config.clone()),
            config,
            last_emitted: None,
            stats: SignalStats::default(),
        }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    pub fn thresholds(&self) -> &AdaptiveThresholds {
        &self.thresholds
    }

    /// Feed validation results into the per-kind thresholds.
    pub fn observe_validations(&mut self, results: &[ValidationResult]) {
        self.thresholds.observe_validations(results);
    }

    /// Run the gates; on acceptance register with `validator` and emit to `sink`.
    pub fn offer(
        &mut self,
        prediction: &CombinedPrediction,
        validator: &mut PredictionValidator,
        sink: &dyn ISignalSink,
        now: DateTime<Utc>,
    ) -> SignalDecision {
        if let Some(reason) = self.gate(prediction, validator, now) {
            return self.suppress(reason);
        }

        let request = NewPrediction::from(prediction);
        let prediction_id = match validator.add_prediction(request, now) {
            Ok(id) => id,
            Err(rejection) => return self.suppress(Suppression::Rejected(rejection)),
        };

        let signal = Signal {
            prediction_id,
            category: prediction.category,
            confidence: prediction.confidence,
            reasoning: prediction.reasoning.clone(),
            pattern_id: prediction.pattern_id.clone(),
            timestamp: now,
        };
        self.last_emitted = Some((signal.category, now));
        self.stats.emitted += 1;
        self.stats.last_signal = Some(signal.clone());

        let delivered = match sink.emit(&signal) {
            Ok(()) => true,
            Err(e) => {
                self.stats.undelivered += 1;
                warn!(prediction_id = %signal.prediction_id, error = %e, "signal sink failed");
                false
            }
        };
        info!(
            prediction_id = %signal.prediction_id,
            category = %signal.category,
            confidence = signal.confidence,
            pattern_id = %signal.pattern_id,
            "signal emitted"
        );
        SignalDecision::Emitted { signal, delivered }
    }

    fn gate(
        &self,
        prediction: &CombinedPrediction,
        validator: &PredictionValidator,
        now: DateTime<Utc>,
    ) -> Option<Suppression> {
        if prediction.is_default {
            return Some(Suppression::DefaultPrediction);
        }

        if let Some((category, at)) = self.last_emitted {
            let elapsed = now - at;
            if category == prediction.category && elapsed < self.config.inter_signal_cooldown() {
                return Some(Suppression::Duplicate {
                    category,
                    elapsed_secs: elapsed.num_seconds(),
                    cooldown_secs: self.config.inter_signal_cooldown_secs,
                });
            }
        }

        if let Some(kind) = prediction.pattern_kind {
            let threshold = self.thresholds.threshold(kind);
            if prediction.confidence < threshold {
                return Some(Suppression::BelowKindThreshold {
                    kind,
                    confidence: prediction.confidence,
                    threshold,
                });
            }
        }

        let pending = validator.pending_count();
        let at_limit = pending >= validator.config().max_pending_predictions;
        if (self.config.single_outstanding && pending > 0) || at_limit {
            return Some(Suppression::Outstanding { pending });
        }

        if !validator.should_alert(prediction.confidence) {
            return Some(Suppression::AlertBar {
                confidence: prediction.confidence,
            });
        }
        None
    }

    fn suppress(&mut self, reason: Suppression) -> SignalDecision {
        *self
            .stats
            .suppressed
            .entry(reason.label().to_string())
            .or_insert(0) += 1;
        debug!(reason = reason.label(), detail = %reason, "signal suppressed");
        SignalDecision::Suppressed(reason)
    }

    pub fn last_emitted(&self) -> Option<(Category, DateTime<Utc>)> {
        self.last_emitted
    }

    pub fn stats(&self) -> SignalStats {
        SignalStats {
            thresholds: self.thresholds.snapshot(),
            ..self.stats.clone()
        }
    }
}
