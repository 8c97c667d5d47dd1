/// Confidence of a pattern seen `frequency` times with detector base `base`.
///
/// Result is clamped to `[0.0, cap]`.
pub fn reinforced_confidence(base: f64, frequency: u32, boost: f64, cap: f64) -> f64 {
    let bonus = boost * (f64::from(frequency) + 1.0).log10();
    (base + bonus).clamp(0.0, cap)
}
