//! ## `pipetrace`: router pipeline trace reconstruction
//!
//! This contains the core functionality and data structures for
//! rebuilding per-cycle router pipeline state from the event traces a
//! cycle-accurate network simulator emits (credit flow, bandwidth
//! grants, switch allocation, speculative traversal).
//!
//! The engine makes one sequential pass over the trace, keeps one
//! mutable state table, and snapshots it at every cycle boundary inside
//! the requested window. The result is a transposed table (rows =
//! signal, columns = cycle) for manual inspection of hazards such as
//! credit starvation or allocation failures.
//!
//! See the binaries for example usage.

pub mod error;
pub mod event;
pub mod report;
pub mod table;
pub mod topology;

pub use error::TraceError;
pub use report::PipelineReport;
pub use topology::Topology;

use event::{parse_line, ParsedLine};
use std::io::BufRead;
use table::StateTable;

/// Inclusive cycle range the report is restricted to. An inverted
/// range is allowed and simply contains no cycle.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    pub start: u64,
    pub end: u64,
}

impl Window {
    pub fn contains(&self, cycle: u64) -> bool {
        cycle >= self.start && cycle <= self.end
    }
}

/// Reconstruct the pipeline state table from a trace.
///
/// `credits` is the per-port credit buffer capacity, used as the
/// initial value of every credit-availability cell. The trace must
/// list events in non-decreasing cycle order; that is a precondition
/// on the simulator output and is not re-validated here.
///
/// A cycle is snapshotted when the first line of a *later* cycle is
/// seen, so the final in-progress cycle of the trace is only reported
/// if a trailing boundary line follows it. This mirrors the behavior
/// downstream consumers already compensate for by padding the window.
pub fn reconstruct<R: BufRead>(
    input: R,
    topo: &Topology,
    window: Window,
    credits: u32,
) -> Result<PipelineReport, TraceError> {
    let mut table = StateTable::new(topo, credits);
    let mut report = PipelineReport::new(topo, window.start);

    // no cycle seen yet; the first event must not trigger a snapshot
    let mut cur_cycle: Option<u64> = None;
    let mut num_lines = 0usize;
    let mut num_events = 0usize;

    for (i, line) in input.lines().enumerate() {
        let line = line?;
        num_lines += 1;

        let parsed = parse_line(&line, topo, i + 1)?;
        let cycle = match &parsed {
            ParsedLine::Skip => continue,
            ParsedLine::Tick(c) => *c,
            ParsedLine::Event(ev) => ev.cycle,
        };

        if cur_cycle != Some(cycle) {
            if let Some(closed) = cur_cycle {
                if window.contains(closed) {
                    report.push_column(table.snapshot());
                }
            }
            // ephemeral state never leaks across a cycle boundary,
            // whether or not the closed cycle was reported
            table.reset_ephemeral();
            cur_cycle = Some(cycle);
        }

        if let ParsedLine::Event(ev) = parsed {
            table.apply(&ev);
            num_events += 1;
        }
    }

    if report.is_empty() {
        clilog::warn!(
            PIPE_EMPTY,
            "window [{}, {}] produced no snapshots ({} lines read)",
            window.start, window.end, num_lines
        );
    } else {
        clilog::info!(
            PIPE_DONE,
            "reconstructed {} cycles from {} events ({} lines)",
            report.num_cycles(), num_events, num_lines
        );
    }
    Ok(report)
}
