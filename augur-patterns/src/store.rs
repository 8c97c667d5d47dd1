use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use augur_core::config::PatternConfig;
use augur_core::errors::{AugurError, AugurResult};
use augur_core::{Confidence, Pattern, PatternCandidate, PatternKind};

use crate::ranking;
use crate::reinforcement::reinforced_confidence;

/// Result of offering a candidate to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert {
    /// A new pattern was inserted.
    Created(String),
    /// An existing pattern with the same kind and key was refreshed.
    Refreshed(String),
    /// The candidate was too weak to become a pattern.
    Ignored,
}

impl Upsert {
    pub fn id(&self) -> Option<&str> {
        match self {
            Upsert::Created(id) | Upsert::Refreshed(id) => Some(id),
            Upsert::Ignored => None,
        }
    }

    pub fn created(&self) -> bool {
        matches!(self, Upsert::Created(_))
    }
}

/// Which patterns a prune pass removed and why.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub below_floor: Vec<String>,
    pub stale: Vec<String>,
    pub over_capacity: Vec<String>,
}

impl PruneReport {
    pub fn removed(&self) -> impl Iterator<Item = &String> {
        self.below_floor
            .iter()
            .chain(self.stale.iter())
            .chain(self.over_capacity.iter())
    }

    pub fn total(&self) -> usize {
        self.below_floor.len() + self.stale.len() + self.over_capacity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// In-memory map of learned patterns.
///
/// All mutation goes through `&mut self`, so the single-writer discipline is
/// enforced by whoever owns the store. Reads hand out cloned snapshots.
#[derive(Debug, Clone)]
pub struct PatternStore {
    patterns: HashMap<String, Pattern>,
    /// `(kind, payload key)` identity index. The key already embeds the kind prefix.
    by_key: HashMap<String, String>,
    config: PatternConfig,
}

impl PatternStore {
    pub fn new(config: PatternConfig) -> Self {
        Self {
            patterns: HashMap::new(),
            by_key: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Pattern> {
        self.patterns.get(id)
    }

    /// Id of the live pattern with this payload key.
    pub fn id_for_key(&self, key: &str) -> Option<&str> {
        self.by_key
            .get(key)
            .filter(|id| self.patterns.contains_key(*id))
            .map(String::as_str)
    }

    /// Sorted pattern ids.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.patterns.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Insert a new pattern or refresh the one with the same identity.
    ///
    /// User-defined rules are declared rather than learned, so they bypass the
    /// minimum-frequency gate.
    pub fn upsert(&mut self, candidate: &PatternCandidate, now: DateTime<Utc>) -> Upsert {
        let key = candidate.key();

        if let Some(id) = self.by_key.get(&key) {
            if let Some(pattern) = self.patterns.get_mut(id) {
                pattern.frequency = pattern.frequency.saturating_add(1);
                pattern.payload = candidate.payload.clone();
                pattern.description = candidate.description.clone();
                pattern.confidence = Confidence::new(reinforced_confidence(
                    candidate.base_confidence,
                    pattern.frequency,
                    self.config.frequency_boost,
                    self.config.confidence_cap,
                ));
                pattern.last_seen_at = now;
                pattern.updated_at = now;
                debug!(
                    pattern_id = %pattern.id,
                    confidence = %pattern.confidence,
                    frequency = pattern.frequency,
                    "pattern refreshed"
                );
                return Upsert::Refreshed(id.clone());
            }
        }

        let gated = candidate.kind() != PatternKind::UserDefined;
        if gated && candidate.frequency < self.config.min_pattern_frequency {
            return Upsert::Ignored;
        }

        let id = format!("{}-{}", candidate.kind().prefix(), uuid::Uuid::new_v4());
        let confidence = Confidence::new(reinforced_confidence(
            candidate.base_confidence,
            candidate.frequency,
            self.config.frequency_boost,
            self.config.confidence_cap,
        ));
        let pattern = Pattern::from_candidate(id.clone(), candidate, confidence, now);
        info!(
            pattern_id = %id,
            kind = %candidate.kind(),
            key = %key,
            confidence = %confidence,
            "pattern created"
        );
        self.by_key.insert(key, id.clone());
        self.patterns.insert(id.clone(), pattern);
        Upsert::Created(id)
    }

    /// Multiply every pattern's confidence by `factor`.
    pub fn decay(&mut self, factor: f64) {
        for pattern in self.patterns.values_mut() {
            pattern.confidence = pattern.confidence * factor;
        }
    }

    /// Decay with the configured factor.
    pub fn decay_default(&mut self) {
        self.decay(self.config.decay_factor);
    }

    /// Remove patterns below `floor`, untested patterns not updated within
    /// `stale_after`, and the lowest-ranked patterns beyond `max_patterns`.
    ///
    /// With no intervening mutation a second call removes nothing.
    pub fn prune(
        &mut self,
        floor: f64,
        stale_after: chrono::Duration,
        now: DateTime<Utc>,
    ) -> PruneReport {
        let mut report = PruneReport::default();

        for pattern in self.patterns.values() {
            if pattern.confidence.value() < floor {
                report.below_floor.push(pattern.id.clone());
            } else if now - pattern.updated_at > stale_after && pattern.total_predictions == 0 {
                report.stale.push(pattern.id.clone());
            }
        }
        report.below_floor.sort();
        report.stale.sort();
        for id in report.below_floor.iter().chain(report.stale.iter()) {
            self.remove_entry(id);
        }

        if self.patterns.len() > self.config.max_patterns {
            let mut ranked: Vec<Pattern> = self.patterns.values().cloned().collect();
            ranking::rank(&mut ranked);
            for pattern in ranked.into_iter().skip(self.config.max_patterns) {
                self.remove_entry(&pattern.id);
                report.over_capacity.push(pattern.id);
            }
        }

        if !report.is_empty() {
            debug!(
                below_floor = report.below_floor.len(),
                stale = report.stale.len(),
                over_capacity = report.over_capacity.len(),
                "patterns pruned"
            );
        }
        report
    }

    /// Prune with the configured floor and staleness window.
    pub fn prune_default(&mut self, now: DateTime<Utc>) -> PruneReport {
        let floor = self.config.confidence_floor;
        let stale_after = self.config.stale_after();
        self.prune(floor, stale_after, now)
    }

    /// Fold a validated prediction into the pattern's track record.
    pub fn record_outcome(
        &mut self,
        pattern_id: &str,
        was_correct: bool,
        now: DateTime<Utc>,
    ) -> AugurResult<()> {
        let pattern = self
            .patterns
            .get_mut(pattern_id)
            .ok_or_else(|| AugurError::PatternNotFound {
                id: pattern_id.to_string(),
            })?;
        pattern.record_prediction(was_correct, now);
        debug!(
            pattern_id,
            was_correct,
            success_rate = pattern.success_rate,
            "pattern outcome recorded"
        );
        Ok(())
    }

    /// Patterns at or above `threshold`, best first.
    pub fn active_patterns(&self, threshold: f64) -> Vec<Pattern> {
        let mut active: Vec<Pattern> = self
            .patterns
            .values()
            .filter(|p| p.confidence.value() >= threshold)
            .cloned()
            .collect();
        ranking::rank(&mut active);
        active
    }

    /// Every pattern, best first.
    pub fn snapshot(&self) -> Vec<Pattern> {
        self.active_patterns(0.0)
    }

    /// Remove every pattern matching `predicate`; returns the removed ids.
    pub fn remove_where<F>(&mut self, predicate: F) -> Vec<String>
    where
        F: Fn(&Pattern) -> bool,
    {
        let mut doomed: Vec<String> = self
            .patterns
            .values()
            .filter(|p| predicate(p))
            .map(|p| p.id.clone())
            .collect();
        doomed.sort();
        for id in &doomed {
            self.remove_entry(id);
        }
        doomed
    }

    /// Load archived patterns. Entries whose identity already exists are skipped.
    pub fn restore(&mut self, patterns: Vec<Pattern>) -> usize {
        let mut restored = 0;
        for pattern in patterns {
            let key = pattern.key();
            if self.by_key.contains_key(&key) || self.patterns.contains_key(&pattern.id) {
                continue;
            }
            self.by_key.insert(key, pattern.id.clone());
            self.patterns.insert(pattern.id.clone(), pattern);
            restored += 1;
        }
        restored
    }

    pub fn count_by_kind(&self) -> BTreeMap<PatternKind, usize> {
        let mut counts = BTreeMap::new();
        for pattern in self.patterns.values() {
            *counts.entry(pattern.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub fn clear(&mut self) {
        self.patterns.clear();
        self.by_key.clear();
    }

    fn remove_entry(&mut self, id: &str) {
        if let Some(pattern) = self.patterns.remove(id) {
            self.by_key.remove(&pattern.key());
        }
    }
}

impl Default for PatternStore {
    fn default() -> Self {
        Self::new(PatternConfig::default())
    }
}
