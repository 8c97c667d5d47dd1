//! Declarative user rules: trigger predicates, track records, and cooldowns.

mod cooldown;
mod detector;
mod rule;
pub mod trigger;

pub use cooldown::RuleCooldowns;
pub use detector::UserRuleDetector;
pub use rule::UserRule;
