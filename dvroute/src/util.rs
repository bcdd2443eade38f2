/// Path and link metric. Lower is better.
pub type Metric = u16;

/// The "no usable path" sentinel.
pub const INF: Metric = 0xFFFF;

/// Adds two metrics, saturating to INF.
///
/// An INF operand always yields INF, and so does a finite sum that does not fit below INF.
///
/// # Examples
///
/// ```
/// use dvroute::util::{sum_inf, INF};
/// assert_eq!(sum_inf(2, 5), 7);
/// assert_eq!(sum_inf(INF, 0), INF);
/// assert_eq!(sum_inf(60000, 6000), INF);
/// ```
pub fn sum_inf(cost_a: Metric, cost_b: Metric) -> Metric {
    if cost_a == INF || cost_b == INF {
        return INF;
    }
    match cost_a.checked_add(cost_b) {
        Some(sum) if sum != INF => sum,
        _ => INF,
    }
}

/// Clamps a metric to INF once it reaches `infinity`
pub fn cap(metric: Metric, infinity: Metric) -> Metric {
    if metric >= infinity {
        INF
    } else {
        metric
    }
}

pub fn sum_capped(cost_a: Metric, cost_b: Metric, infinity: Metric) -> Metric {
    cap(sum_inf(cost_a, cost_b), infinity)
}
