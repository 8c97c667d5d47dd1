mod detector;
mod outcome_source;
mod pattern_archive;
mod prediction_store;
mod signal_sink;

pub use detector::IDetector;
pub use outcome_source::OutcomeSource;
pub use pattern_archive::IPatternArchive;
pub use prediction_store::IPredictionStore;
pub use signal_sink::ISignalSink;
