//! Step diagnostics
//!
//! The kernels never format anything themselves. Instead, every elimination step,
//! factorization step and iteration sweep can be reported to a [`DiagnosticsSink`] as a
//! structured [`StepRecord`]. Passing [`NoopSink`] (what the plain entry points do)
//! must not change any numerical result.

use crate::traits::Scalar;
use ndarray::{Array1, Array2};

/// Which kernel produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    /// Gaussian forward elimination (one record per pivot column)
    Elimination,
    /// Back substitution finished
    BackSubstitution,
    /// LU or Cholesky factorization (one record per row/column)
    Factorization,
    /// Tridiagonal forward chase (one record per row)
    Chase,
    /// One stationary iteration sweep
    Sweep,
    /// One iterative refinement correction
    Refinement,
}

/// Pivot chosen during an elimination step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PivotChoice {
    /// Row (after which the swap into the step row happens)
    pub row: usize,
    /// Column, different from the step index only under full pivoting
    pub col: usize,
}

/// One structured diagnostics record.
#[derive(Debug, Clone)]
pub struct StepRecord<T: Scalar> {
    /// Producing kernel
    pub phase: StepPhase,
    /// Step index (elimination column, factor row, or iteration count)
    pub step_index: usize,
    /// Working matrix after the step, only when the sink asks for snapshots
    pub matrix_snapshot: Option<Array2<T>>,
    /// Pivot used in this step
    pub pivot: Option<PivotChoice>,
    /// Stopping metric or residual norm
    pub residual: Option<T>,
    /// Current iterate, only for sweeps and when the sink asks for snapshots
    pub iterate: Option<Array1<T>>,
}

impl<T: Scalar> StepRecord<T> {
    /// Bare record with only phase and index set
    pub fn new(phase: StepPhase, step_index: usize) -> Self {
        Self {
            phase,
            step_index,
            matrix_snapshot: None,
            pivot: None,
            residual: None,
            iterate: None,
        }
    }

    /// Attach a pivot
    pub fn with_pivot(mut self, pivot: PivotChoice) -> Self {
        self.pivot = Some(pivot);
        self
    }

    /// Attach a residual / metric value
    pub fn with_residual(mut self, residual: T) -> Self {
        self.residual = Some(residual);
        self
    }
}

/// Consumer of step records.
///
/// Implemented for any `FnMut(&StepRecord<T>)` closure.
pub trait DiagnosticsSink<T: Scalar> {
    /// Receive one record
    fn record(&mut self, record: &StepRecord<T>);

    /// Whether the kernels should clone matrices/iterates into records
    fn wants_snapshots(&self) -> bool {
        true
    }
}

/// Sink that drops everything (and asks for nothing).
#[derive(Clone, Debug, Default)]
pub struct NoopSink;

impl<T: Scalar> DiagnosticsSink<T> for NoopSink {
    #[inline]
    fn record(&mut self, _record: &StepRecord<T>) {}

    #[inline]
    fn wants_snapshots(&self) -> bool {
        false
    }
}

/// Sink forwarding records to the `log` facade at debug level.
#[derive(Clone, Debug, Default)]
pub struct LogSink {
    /// Also log matrix snapshots (verbose)
    pub snapshots: bool,
}

impl<T: Scalar> DiagnosticsSink<T> for LogSink {
    fn record(&mut self, record: &StepRecord<T>) {
        log::debug!(
            "{:?} step {}: pivot {:?}, residual {}",
            record.phase,
            record.step_index,
            record.pivot,
            record
                .residual
                .map_or_else(|| "-".to_string(), |r| format!("{:.6e}", r.to_f64()))
        );
        if let Some(m) = record.matrix_snapshot.as_ref() {
            log::debug!("{m}");
        }
    }

    fn wants_snapshots(&self) -> bool {
        self.snapshots
    }
}

/// Sink that keeps every record, mostly for tests and reports.
#[derive(Clone, Debug)]
pub struct RecordingSink<T: Scalar> {
    /// Collected records in emission order
    pub records: Vec<StepRecord<T>>,
    /// Ask kernels for snapshots
    pub snapshots: bool,
}

impl<T: Scalar> Default for RecordingSink<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            snapshots: true,
        }
    }
}

impl<T: Scalar> RecordingSink<T> {
    /// Records of one phase
    pub fn phase(&self, phase: StepPhase) -> impl Iterator<Item = &StepRecord<T>> {
        self.records.iter().filter(move |r| r.phase == phase)
    }
}

impl<T: Scalar> DiagnosticsSink<T> for RecordingSink<T> {
    fn record(&mut self, record: &StepRecord<T>) {
        self.records.push(record.clone());
    }

    fn wants_snapshots(&self) -> bool {
        self.snapshots
    }
}

impl<T, F> DiagnosticsSink<T> for F
where
    T: Scalar,
    F: FnMut(&StepRecord<T>),
{
    fn record(&mut self, record: &StepRecord<T>) {
        self(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_sink_declines_snapshots() {
        let sink = NoopSink;
        assert!(!DiagnosticsSink::<f64>::wants_snapshots(&sink));
    }

    #[test]
    fn test_closure_sink() {
        let mut steps = Vec::new();
        {
            let mut sink = |r: &StepRecord<f64>| steps.push(r.step_index);
            sink.record(&StepRecord::<f64>::new(StepPhase::Sweep, 3));
            sink.record(&StepRecord::<f64>::new(StepPhase::Sweep, 4).with_residual(1e-3));
        }
        assert_eq!(steps, vec![3, 4]);
    }

    #[test]
    fn test_recording_sink_filters_by_phase() {
        let mut sink = RecordingSink::<f64>::default();
        sink.record(&StepRecord::<f64>::new(StepPhase::Elimination, 0));
        sink.record(&StepRecord::<f64>::new(StepPhase::BackSubstitution, 1));
        sink.record(&StepRecord::<f64>::new(StepPhase::Elimination, 1).with_pivot(PivotChoice {
            row: 2,
            col: 1,
        }));
        assert_eq!(sink.phase(StepPhase::Elimination).count(), 2);
        assert_eq!(sink.records[2].pivot, Some(PivotChoice { row: 2, col: 1 }));
    }
}
