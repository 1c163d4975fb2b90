use opencausal::logging::{enabled, Level};

#[test]
fn critical_is_always_enabled() {
    assert!(enabled(Level::Critical));
}

#[test]
fn warnings_need_more_verbosity_than_traces() {
    // Whatever OPENCAUSAL_TRACE is set to, warnings imply traces.
    if enabled(Level::Warning) {
        assert!(enabled(Level::Trace));
        assert!(enabled(Level::Error));
    }
    assert_eq!(enabled(Level::Trace), enabled(Level::Error));
}
