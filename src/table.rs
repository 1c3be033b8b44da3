//! The in-memory cycle state table.
//!
//! One cell per (router, port role, port, signal), holding the value the
//! signal carries in the cycle currently being read. The table is
//! allocated once per run and mutated in place; the only copies made are
//! the per-cycle snapshots handed to the report.

use crate::event::{Signal, TraceEvent, PLACEHOLDER};
use crate::topology::Topology;
use compact_str::{format_compact, CompactString};

/// Fixed-size matrix of current signal values.
#[derive(Debug)]
pub struct StateTable {
    routers: usize,
    ports: usize,
    cells: Vec<CompactString>,
}

impl StateTable {
    /// Create the table for `topo`, seeding every persistent
    /// credit-availability cell with the configured per-port buffer
    /// capacity and every ephemeral cell with the placeholder.
    pub fn new(topo: &Topology, credits: u32) -> StateTable {
        let routers = topo.num_routers();
        let ports = topo.num_ports();
        let mut table = StateTable {
            routers,
            ports,
            cells: vec![
                CompactString::from(PLACEHOLDER);
                routers * ports * Signal::COUNT
            ],
        };
        let seed = format_compact!("{}", credits);
        for r in 0..routers {
            for p in 0..ports {
                let i = table.index(r, Signal::CreditAvailability, p);
                table.cells[i] = seed.clone();
            }
        }
        table
    }

    fn index(&self, router: usize, signal: Signal, port: usize) -> usize {
        (router * Signal::COUNT + signal.index()) * self.ports + port
    }

    /// Overwrite the cell an event targets. Two events hitting the same
    /// cell within one cycle resolve last-write-wins, in log order.
    pub fn apply(&mut self, ev: &TraceEvent) {
        let i = self.index(ev.router, ev.signal, ev.port);
        self.cells[i] = ev.value.clone();
    }

    /// Wipe every ephemeral cell back to the placeholder. Persistent
    /// cells keep their last known value until next updated.
    pub fn reset_ephemeral(&mut self) {
        for r in 0..self.routers {
            for sig in Signal::INPUT.into_iter().chain(Signal::OUTPUT) {
                if sig.persistent() {
                    continue;
                }
                for p in 0..self.ports {
                    let i = self.index(r, sig, p);
                    self.cells[i] = PLACEHOLDER.into();
                }
            }
        }
    }

    /// Copy out every cell in report row order: per router, per input
    /// port the input-side signals, then per output port the
    /// output-side ones. Must stay in lockstep with
    /// [`crate::report::row_labels`].
    pub fn snapshot(&self) -> Vec<CompactString> {
        let mut out = Vec::with_capacity(self.cells.len());
        for r in 0..self.routers {
            for p in 0..self.ports {
                for sig in Signal::INPUT {
                    out.push(self.cells[self.index(r, sig, p)].clone());
                }
            }
            for p in 0..self.ports {
                for sig in Signal::OUTPUT {
                    out.push(self.cells[self.index(r, sig, p)].clone());
                }
            }
        }
        out
    }
}
