mod candidate;
mod confidence;
mod kind;
#[allow(clippy::module_inception)]
mod pattern;
mod payload;

pub use candidate::PatternCandidate;
pub use confidence::Confidence;
pub use kind::PatternKind;
pub use pattern::Pattern;
pub use payload::PatternPayload;
