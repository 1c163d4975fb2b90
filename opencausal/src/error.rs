use std::fmt;

/// Failure kinds raised by the indexing algebra and its handlers.
///
/// These travel inside `anyhow::Error`; callers that need to branch on the
/// kind use `err.downcast_ref::<IndexError>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Malformed argument such as a non-zero `event_dim` on a scalar.
    InvalidArgument(String),
    /// Required evidence (e.g. a tensor to take a device from) was not found.
    Lookup(String),
    /// No rule exists for this value kind in the named operation.
    Unsupported { op: &'static str, kind: &'static str },
    /// Caller broke an operation precondition.
    Precondition(String),
    /// A world name has no registered or supplied dimension.
    UnknownName(String),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            IndexError::Lookup(msg) => write!(f, "lookup failed: {}", msg),
            IndexError::Unsupported { op, kind } => {
                write!(f, "{} is not defined for values of kind {}", op, kind)
            }
            IndexError::Precondition(msg) => write!(f, "precondition violated: {}", msg),
            IndexError::UnknownName(name) => write!(f, "no index plate named '{}'", name),
        }
    }
}

impl std::error::Error for IndexError {}

/// Failure kinds raised by the interruption event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// `get_solver` was called with no solver installed.
    NoSolver,
    /// The solver reported an interruption before the current time.
    TimeRegression { current: f64, next: f64 },
    /// The solver reported an interruption past the end of the span.
    OutOfSpan { next: f64, end: f64 },
    /// A step neither advanced time nor fired an interruption.
    NoProgress { time: f64 },
    /// A static interruption is scheduled before the span it was offered.
    StaleInterruption { label: String, time: f64, start: f64 },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::NoSolver => {
                write!(f, "no solver installed; wrap the call in a solver scope")
            }
            SimulationError::TimeRegression { current, next } => write!(
                f,
                "next interruption at {} is earlier than current time {}",
                next, current
            ),
            SimulationError::OutOfSpan { next, end } => write!(
                f,
                "next interruption at {} is past the end time {}",
                next, end
            ),
            SimulationError::NoProgress { time } => write!(
                f,
                "simulation made no progress at time {}: no time advance and no interruption fired",
                time
            ),
            SimulationError::StaleInterruption { label, time, start } => write!(
                f,
                "interruption '{}' at {} precedes the simulated span starting at {}",
                label, time, start
            ),
        }
    }
}

impl std::error::Error for SimulationError {}
