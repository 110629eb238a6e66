//! Progress reporting extension point.

/// Inbound hook for live progress updates.
///
/// One calling convention: a message and a percentage in `[0, 100]`, with
/// `-1.0` signalling failure. The hook is infallible by signature, so a
/// misbehaving sink cannot abort the pipeline.
pub trait ProgressSink: Send + Sync {
    /// Report a coarse milestone.
    fn update(&self, message: &str, percent: f32);
}

impl<F> ProgressSink for F
where
    F: Fn(&str, f32) + Send + Sync,
{
    fn update(&self, message: &str, percent: f32) {
        self(message, percent)
    }
}
