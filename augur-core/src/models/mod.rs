mod combined_prediction;
mod degradation_event;
mod learning_stats;
mod performance_stats;
mod prediction_record;
mod reassessment_event;
mod reassessment_stats;
mod rejection;
mod signal;
mod validation_result;

pub use combined_prediction::{CategoryScore, CombinedPrediction};
pub use degradation_event::DegradationEvent;
pub use learning_stats::LearningStats;
pub use performance_stats::PerformanceStats;
pub use prediction_record::{PredictionRecord, PredictionStatus};
pub use reassessment_event::{ReassessmentEvent, ReassessmentTrigger};
pub use reassessment_stats::ReassessmentStats;
pub use rejection::RejectionReason;
pub use signal::Signal;
pub use validation_result::ValidationResult;
