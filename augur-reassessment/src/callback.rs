use augur_core::errors::AugurResult;

use crate::request::ReassessmentRequest;

/// Anything whose pattern set can be snapshotted before and after a run.
pub trait PatternIds {
    /// Current pattern ids, sorted.
    fn pattern_ids(&self) -> Vec<String>;
}

/// A subsystem hook invoked on every reassessment run.
///
/// Callbacks may mutate the subject freely. An error or a panic is recorded
/// against the callback's name and the remaining callbacks still run.
pub trait ReassessmentCallback<T>: Send {
    fn name(&self) -> &str;

    fn on_reassess(&mut self, subject: &mut T, request: &ReassessmentRequest) -> AugurResult<()>;
}

/// Box a closure as a named callback.
pub fn from_fn<T, F>(name: impl Into<String>, f: F) -> Box<dyn ReassessmentCallback<T>>
where
    F: FnMut(&mut T, &ReassessmentRequest) -> AugurResult<()> + Send + 'static,
{
    Box::new(FnCallback::new(name, f))
}

/// Adapts a closure into a callback.
pub struct FnCallback<F> {
    name: String,
    f: F,
}

impl<F> FnCallback<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<T, F> ReassessmentCallback<T> for FnCallback<F>
where
    F: FnMut(&mut T, &ReassessmentRequest) -> AugurResult<()> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_reassess(&mut self, subject: &mut T, request: &ReassessmentRequest) -> AugurResult<()> {
        (self.f)(subject, request)
    }
}
