//! Optimization results.

/// Why the outer loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerminationReason {
    /// The criterion dropped below the tolerance.
    Converged,
    /// `max_iter` outer iterations ran without convergence.
    MaxIterations,
}

/// Per-iteration history, recorded when `trace` is enabled.
///
/// Both vectors have one entry per executed outer iteration.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trace {
    /// Average loss over the dataset at the iterate after each iteration.
    pub objective: Vec<f64>,
    /// Wall-clock seconds since the start of the run.
    pub elapsed: Vec<f64>,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.objective.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objective.is_empty()
    }
}

/// Outcome of a solver run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizeResult {
    /// Final weights.
    pub x: Vec<f64>,
    /// `true` iff the run converged.
    pub success: bool,
    /// Number of executed outer iterations.
    pub iterations: usize,
    pub termination: TerminationReason,
    /// Last measured convergence criterion.
    pub criterion: f64,
    pub trace: Option<Trace>,
}
