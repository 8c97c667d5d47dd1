use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use augur_core::config::{DetectorConfig, PatternConfig, RuleDefinition};
use augur_core::errors::{AugurError, AugurResult};
use augur_core::traits::IDetector;
use augur_core::{Outcome, PatternCandidate, PatternPayload};

use crate::alternation::AlternationDetector;
use crate::frequency::FrequencyDetector;
use crate::interaction::InteractionDetector;
use crate::rules::{RuleCooldowns, UserRuleDetector};
use crate::sequence::SequenceDetector;

/// A detector that returned an error or panicked during one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorFailureReport {
    pub detector: String,
    pub reason: String,
}

impl From<DetectorFailureReport> for AugurError {
    fn from(report: DetectorFailureReport) -> Self {
        AugurError::DetectorFailure {
            detector: report.detector,
            reason: report.reason,
        }
    }
}

/// Everything one pass over the window produced.
#[derive(Debug, Clone, Default)]
pub struct DetectionRun {
    pub candidates: Vec<PatternCandidate>,
    pub failures: Vec<DetectorFailureReport>,
    /// Detectors skipped because of repeated failures.
    pub quarantined: Vec<String>,
    /// Rules that matched but were still cooling down.
    pub cooling_rules: Vec<String>,
    /// Detectors not reached before the deadline.
    pub skipped: Vec<String>,
}

impl DetectionRun {
    pub fn deadline_hit(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// How a run treats user-rule cooldowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Matching rules fire and start their cooldown.
    #[default]
    Live,
    /// Re-detection over outcomes already seen. Rules still cooling down
    /// are held back, but a match does not start a new cooldown.
    Replay,
}

/// The full detector line-up plus the state detectors themselves may not hold:
/// rule cooldowns and failure streaks.
pub struct DetectorSet {
    detectors: Vec<Box<dyn IDetector>>,
    rules: UserRuleDetector,
    cooldowns: RuleCooldowns,
    failure_streaks: HashMap<String, u32>,
    quarantine_after: u32,
}

impl DetectorSet {
    /// The built-in detectors plus the configured user rules.
    pub fn from_config(
        detectors: &DetectorConfig,
        patterns: &PatternConfig,
        rules: &[RuleDefinition],
    ) -> Self {
        Self::empty(detectors)
            .with_detector(Box::new(SequenceDetector::new(detectors)))
            .with_detector(Box::new(AlternationDetector::new(detectors)))
            .with_detector(Box::new(FrequencyDetector::new(detectors)))
            .with_detector(Box::new(InteractionDetector::new(
                detectors,
                patterns.min_pattern_frequency,
            )))
            .with_rules(UserRuleDetector::new(rules, detectors.rule_cooldown()))
    }

    /// No detectors and no rules.
    pub fn empty(config: &DetectorConfig) -> Self {
        Self {
            detectors: Vec::new(),
            rules: UserRuleDetector::new(&[], config.rule_cooldown()),
            cooldowns: RuleCooldowns::new(),
            failure_streaks: HashMap::new(),
            quarantine_after: config.quarantine_after,
        }
    }

    pub fn with_detector(mut self, detector: Box<dyn IDetector>) -> Self {
        self.detectors.push(detector);
        self
    }

    pub fn with_rules(mut self, rules: UserRuleDetector) -> Self {
        self.rules = rules;
        self
    }

    pub fn detector_names(&self) -> Vec<String> {
        self.detectors
            .iter()
            .map(|d| d.name().to_string())
            .chain(std::iter::once(self.rules.name().to_string()))
            .collect()
    }

    pub fn rules(&self) -> &UserRuleDetector {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut UserRuleDetector {
        &mut self.rules
    }

    pub fn cooldowns(&self) -> &RuleCooldowns {
        &self.cooldowns
    }

    /// Run every detector against `window`. A failing detector is reported
    /// and skipped; it never prevents the others from running.
    pub fn run(&mut self, window: &[Outcome], now: DateTime<Utc>) -> DetectionRun {
        self.run_with(window, now, RunMode::Live, None)
    }

    /// Like [`DetectorSet::run`], with a cooldown mode and an optional
    /// deadline. Detectors not yet started when the deadline passes are
    /// skipped and listed in [`DetectionRun::skipped`]; one already running
    /// is never interrupted.
    pub fn run_with(
        &mut self,
        window: &[Outcome],
        now: DateTime<Utc>,
        mode: RunMode,
        deadline: Option<Instant>,
    ) -> DetectionRun {
        let mut run = DetectionRun::default();
        let expired = || deadline.is_some_and(|at| Instant::now() >= at);

        for detector in &self.detectors {
            let name = detector.name().to_string();
            if expired() {
                run.skipped.push(name);
                continue;
            }
            if self.is_quarantined(&name) {
                run.quarantined.push(name);
                continue;
            }
            match isolate(detector.as_ref(), window) {
                Ok(mut candidates) => {
                    self.failure_streaks.remove(&name);
                    run.candidates.append(&mut candidates);
                }
                Err(reason) => {
                    let streak = self.failure_streaks.entry(name.clone()).or_insert(0);
                    *streak += 1;
                    warn!(detector = %name, reason = %reason, streak = *streak, "detector failed");
                    run.failures.push(DetectorFailureReport {
                        detector: name,
                        reason,
                    });
                }
            }
        }

        let rules_name = self.rules.name().to_string();
        if expired() {
            run.skipped.push(rules_name);
        } else {
            match isolate(&self.rules, window) {
                Ok(candidates) => {
                    for candidate in candidates {
                        let PatternPayload::UserDefined { rule_id, .. } = &candidate.payload else {
                            continue;
                        };
                        let cooldown = self.rules.cooldown_for(rule_id);
                        if !self.cooldowns.is_ready(rule_id, cooldown, now) {
                            debug!(rule_id = %rule_id, "rule matched during cooldown");
                            run.cooling_rules.push(rule_id.clone());
                            continue;
                        }
                        if mode == RunMode::Live {
                            self.cooldowns.mark_fired(rule_id, now);
                        }
                        run.candidates.push(candidate);
                    }
                }
                Err(reason) => {
                    warn!(detector = %rules_name, reason = %reason, "detector failed");
                    run.failures.push(DetectorFailureReport {
                        detector: rules_name,
                        reason,
                    });
                }
            }
        }

        if run.deadline_hit() {
            warn!(skipped = ?run.skipped, "detection deadline passed");
        }
        run
    }

    /// Fold a validated prediction into the matching rule's record.
    pub fn record_rule_outcome(&mut self, rule_id: &str, was_correct: bool) -> bool {
        self.rules.record_outcome(rule_id, was_correct)
    }

    /// Detectors currently skipped for repeated failures.
    pub fn quarantined(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .failure_streaks
            .keys()
            .filter(|n| self.is_quarantined(n))
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Forget failure streaks, releasing quarantined detectors.
    pub fn reset_caches(&mut self) {
        if !self.failure_streaks.is_empty() {
            debug!(count = self.failure_streaks.len(), "detector failure streaks cleared");
        }
        self.failure_streaks.clear();
    }

    fn is_quarantined(&self, name: &str) -> bool {
        self.quarantine_after > 0
            && self
                .failure_streaks
                .get(name)
                .is_some_and(|streak| *streak >= self.quarantine_after)
    }
}

/// Run one detector, converting both errors and panics into a reason string.
fn isolate(detector: &dyn IDetector, window: &[Outcome]) -> Result<Vec<PatternCandidate>, String> {
    let result: std::thread::Result<AugurResult<Vec<PatternCandidate>>> =
        catch_unwind(AssertUnwindSafe(|| detector.detect(window)));
    match result {
        Ok(Ok(candidates)) => Ok(candidates),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
