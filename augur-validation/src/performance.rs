use std::collections::VecDeque;

/// Accuracy fell from `previous` to `current` between consecutive windows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceDrop {
    pub previous: f64,
    pub current: f64,
}

/// Compares accuracy of the latest window with the window before it.
///
/// Once a drop is reported the buffer restarts, so a single slump
/// produces a single report.
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    window: usize,
    threshold: f64,
    results: VecDeque<bool>,
}

impl PerformanceMonitor {
    pub fn new(window: usize, threshold: f64) -> Self {
        let window = window.max(1);
        Self {
            window,
            threshold,
            results: VecDeque::with_capacity(window * 2),
        }
    }

    pub fn record(&mut self, correct: bool) {
        if self.results.len() == self.window * 2 {
            self.results.pop_front();
        }
        self.results.push_back(correct);
    }

    /// A drop when both windows are full and accuracy fell by more than the threshold.
    pub fn check(&mut self) -> Option<PerformanceDrop> {
        if self.results.len() < self.window * 2 {
            return None;
        }
        let older = self.results.iter().take(self.window).filter(|c| **c).count();
        let newer = self.results.iter().skip(self.window).filter(|c| **c).count();
        let previous = older as f64 / self.window as f64;
        let current = newer as f64 / self.window as f64;
        if previous - current > self.threshold {
            self.results.clear();
            return Some(PerformanceDrop { previous, current });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_a_drop_once() {
        let mut monitor = PerformanceMonitor::new(4, 0.2);
        for c in [true, true, true, true, false, false, true, false] {
            monitor.record(c);
        }
        let drop = monitor.check().unwrap();
        assert_eq!(drop.previous, 1.0);
        assert_eq!(drop.current, 0.25);
        assert!(monitor.check().is_none());
    }

    #[test]
    fn steady_accuracy_is_not_a_drop() {
        let mut monitor = PerformanceMonitor::new(3, 0.2);
        for c in [true, false, true, true, false, true] {
            monitor.record(c);
        }
        assert!(monitor.check().is_none());
    }
}
