//! Utilities to measure how long executing queries and setup phases takes.

use std::sync::atomic::{compiler_fence, Ordering::SeqCst};
use std::time::{Duration, Instant};

/// Measure how long it takes to execute the given lambda, print the time,
/// report it under `running_time_ms` and return the result of the lambda.
pub fn report_time<Out, F: FnOnce() -> Out>(name: &str, f: F) -> Out {
    let (res, duration) = measure(f);
    let ms = duration.as_secs_f64() * 1000.0;
    eprintln!("{} done - took: {}ms", name, ms);
    crate::report!("running_time_ms", ms);
    res
}

/// Measure how long it takes to execute the given lambda and return the
/// result of the lambda together with the elapsed duration.
pub fn measure<Out, F: FnOnce() -> Out>(f: F) -> (Out, Duration) {
    compiler_fence(SeqCst);
    let start = Instant::now();
    let res = f();
    let elapsed = start.elapsed();
    compiler_fence(SeqCst);
    (res, elapsed)
}
