/// Emits a `trace`-level event describing a union lifecycle transition.
///
/// Expands to nothing unless the `tracing` feature is enabled, so the
/// arguments must not have side effects.
macro_rules! trace_lifecycle {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!(target: "holyunion", $($arg)*);
    };
}
