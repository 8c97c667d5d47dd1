//! Built-in reassessment callbacks, run in registration order.

use tracing::{debug, info, warn};

use augur_core::errors::AugurResult;
use augur_core::models::PredictionStatus;
use augur_reassessment::{ReassessmentCallback, ReassessmentRequest};

use crate::event_bus::PipelineEvent;
use crate::pipeline::Pipeline;

/// Adapts the learner to how its calls have been landing.
///
/// Drops tested patterns below `low_performer_rate`, tightens the voting
/// threshold on trouble (incorrect call, broken pattern, accuracy drop),
/// loosens it after a correct call, then relearns over recent outcomes.
/// Relearning stops at the run's deadline, which ends the run as timed out.
#[derive(Debug, Default)]
pub struct LearnerPolicyCallback;

impl ReassessmentCallback<Pipeline> for LearnerPolicyCallback {
    fn name(&self) -> &str {
        "learner_policy"
    }

    fn on_reassess(
        &mut self,
        pipeline: &mut Pipeline,
        request: &ReassessmentRequest,
    ) -> AugurResult<()> {
        let learner = pipeline.learner_mut();
        let pruned = learner.prune_low_performers();

        let before = learner.confidence_threshold();
        let threshold = if request.signals_trouble() {
            learner.tighten()
        } else if request.validation_status() == Some(PredictionStatus::Correct) {
            learner.loosen()
        } else {
            before
        };

        let relearned = learner.relearn(request.requested_at, request.deadline_at());
        info!(
            trigger = %request.trigger,
            pruned = pruned.len(),
            threshold_before = before,
            threshold,
            created = relearned.created,
            refreshed = relearned.refreshed,
            "learner policy applied"
        );
        if relearned.timed_out() {
            warn!(skipped = ?relearned.skipped_detectors, "relearn cut short by the deadline");
            if let Some(deadline) = request.deadline {
                return Err(deadline.timeout_error());
            }
        }
        Ok(())
    }
}

/// Clears detector failure streaks so quarantined detectors get another chance.
#[derive(Debug, Default)]
pub struct DetectorCacheCallback;

impl ReassessmentCallback<Pipeline> for DetectorCacheCallback {
    fn name(&self) -> &str {
        "detector_cache"
    }

    fn on_reassess(
        &mut self,
        pipeline: &mut Pipeline,
        _request: &ReassessmentRequest,
    ) -> AugurResult<()> {
        pipeline.learner_mut().detectors_mut().reset_caches();
        Ok(())
    }
}

/// Expires pendings that outlived the validation timeout. The expiries are
/// queued on the pipeline and published like those of the periodic sweep.
#[derive(Debug, Default)]
pub struct HousekeepingCallback;

impl ReassessmentCallback<Pipeline> for HousekeepingCallback {
    fn name(&self) -> &str {
        "validator_housekeeping"
    }

    fn on_reassess(
        &mut self,
        pipeline: &mut Pipeline,
        request: &ReassessmentRequest,
    ) -> AugurResult<()> {
        let expired = pipeline.expire_stale(request.requested_at);
        if !expired.is_empty() {
            debug!(count = expired.len(), "stale predictions expired during reassessment");
            pipeline.defer_events(expired.into_iter().map(PipelineEvent::Validated));
        }
        Ok(())
    }
}

pub fn default_callbacks() -> Vec<Box<dyn ReassessmentCallback<Pipeline>>> {
    vec![
        Box::new(HousekeepingCallback),
        Box::new(DetectorCacheCallback),
        Box::new(LearnerPolicyCallback),
    ]
}
