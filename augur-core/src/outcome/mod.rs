mod category;
#[allow(clippy::module_inception)]
mod outcome;

pub use category::Category;
pub use outcome::Outcome;
