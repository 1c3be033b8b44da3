//! Transposed report assembly and emission.
//!
//! Rows are (router, port, signal) labels, columns are cycles. The text
//! layout is the one the simulator's surrounding tooling already
//! consumes: `"; "`-delimited, header line first, every cell followed by
//! the delimiter so spreadsheet imports see a trailing empty column.

use crate::event::Signal;
use crate::topology::Topology;
use compact_str::{format_compact, CompactString};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Row labels in the fixed report order, e.g. `R3 Crd L I2`,
/// `R3 Credits O0`. Must stay in lockstep with
/// [`crate::table::StateTable::snapshot`].
pub fn row_labels(topo: &Topology) -> Vec<CompactString> {
    let mut labels =
        Vec::with_capacity(topo.num_routers() * topo.num_ports() * Signal::COUNT);
    for r in 0..topo.num_routers() {
        for p in 0..topo.num_ports() {
            for sig in Signal::INPUT {
                labels.push(format_compact!(
                    "R{} {} {}{}", r, sig.mnemonic(), sig.role().tag(), p
                ));
            }
        }
        for p in 0..topo.num_ports() {
            for sig in Signal::OUTPUT {
                labels.push(format_compact!(
                    "R{} {} {}{}", r, sig.mnemonic(), sig.role().tag(), p
                ));
            }
        }
    }
    labels
}

/// The reconstructed table: one snapshot column per reported cycle.
///
/// Serializable so a run can be persisted (CBOR) and compared against
/// another run with `pipediff`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PipelineReport {
    /// First cycle of the report window; column `i` is cycle
    /// `start_cycle + i`.
    pub start_cycle: u64,
    pub labels: Vec<CompactString>,
    pub columns: Vec<Vec<CompactString>>,
}

impl PipelineReport {
    pub fn new(topo: &Topology, start_cycle: u64) -> PipelineReport {
        PipelineReport {
            start_cycle,
            labels: row_labels(topo),
            columns: Vec::new(),
        }
    }

    /// Append the snapshot of one closed cycle.
    pub fn push_column(&mut self, column: Vec<CompactString>) {
        debug_assert_eq!(column.len(), self.labels.len());
        self.columns.push(column);
    }

    /// True when the window produced no snapshots at all; the text
    /// output then degrades to the header line alone.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn num_cycles(&self) -> usize {
        self.columns.len()
    }

    /// Emit the transposed text table.
    pub fn write_text<W: Write>(&self, mut w: W) -> io::Result<()> {
        write!(w, "Router; ")?;
        for i in 0..self.columns.len() {
            write!(w, "{}; ", self.start_cycle + i as u64)?;
        }
        writeln!(w)?;
        if self.is_empty() {
            // empty window: header row only, detectable by callers
            return Ok(());
        }
        for (row, label) in self.labels.iter().enumerate() {
            write!(w, "{}; ", label)?;
            for col in &self.columns {
                write!(w, "{}; ", col[row])?;
            }
            writeln!(w)?;
        }
        Ok(())
    }
}
