/// Quartic ease-out.
///
/// `t` is the elapsed tick, `b` the start value, `c` the total change and
/// `d` the duration in ticks. Returns `b` at `t = 0` and `b + c` at `t = d`.
pub fn ease_out_quart(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    -c * (t * t * t * t - 1.0) + b
}
