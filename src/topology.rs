//! Static mapping from router paths and port labels to dense indices.
//!
//! The simulator names routers by their hierarchical path (e.g.
//! `network_0/router_2_1`) and ports by a role plus number (`Input 3`,
//! `Output 0`). The reconstruction engine only works with dense indices,
//! so the topology of the simulated network must be supplied up front;
//! it is a run parameter, never inferred from the trace.

use crate::error::TraceError;
use compact_str::{format_compact, CompactString};
use indexmap::IndexMap;
use std::fmt;

/// Dense router index in `[0, num_routers)`.
pub type RouterId = usize;

/// Port index in `[0, num_ports)`. Only meaningful together with a
/// [`PortRole`]: input port 2 and output port 2 are distinct signals.
pub type PortIndex = usize;

/// Which side of the router a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRole {
    Input,
    Output,
}

impl PortRole {
    /// The label prefix the simulator prints for this role.
    pub fn prefix(self) -> &'static str {
        match self {
            PortRole::Input => "Input",
            PortRole::Output => "Output",
        }
    }

    /// Single-letter tag used in report row labels.
    pub fn tag(self) -> char {
        match self {
            PortRole::Input => 'I',
            PortRole::Output => 'O',
        }
    }
}

impl fmt::Display for PortRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortRole::Input => write!(f, "input"),
            PortRole::Output => write!(f, "output"),
        }
    }
}

/// Bijection from router paths to dense indices, plus the per-router
/// port count.
///
/// Insertion order of the path map is the index order, so generators
/// only have to insert paths in the right sequence.
#[derive(Debug, Clone)]
pub struct Topology {
    routers: IndexMap<CompactString, RouterId>,
    ports: usize,
}

impl Topology {
    /// 2-D mesh of `x` columns by `y` rows, column index fastest:
    /// `network_0/router_{col}_{row}` maps to `row * x + col`.
    pub fn mesh(x: usize, y: usize, ports: usize) -> Topology {
        Topology::custom(
            (0..y).flat_map(|row| {
                (0..x).map(move |col| {
                    format_compact!("network_0/router_{}_{}", col, row)
                })
            }),
            ports,
        )
    }

    /// Ring of `n` routers, `network_0/router_{i}_0` in index order.
    pub fn ring(n: usize, ports: usize) -> Topology {
        Topology::mesh(n, 1, ports)
    }

    /// Explicit router path list; list order is index order.
    pub fn custom(
        paths: impl IntoIterator<Item = CompactString>,
        ports: usize,
    ) -> Topology {
        let routers = paths
            .into_iter()
            .enumerate()
            .map(|(i, p)| (p, i))
            .collect();
        Topology { routers, ports }
    }

    pub fn num_routers(&self) -> usize {
        self.routers.len()
    }

    pub fn num_ports(&self) -> usize {
        self.ports
    }

    /// Resolve a router path as printed in the trace.
    pub fn router_index(&self, path: &str) -> Result<RouterId, TraceError> {
        self.routers
            .get(path)
            .copied()
            .ok_or_else(|| TraceError::UnknownRouter(path.to_string()))
    }

    /// Resolve a `"Input N"` / `"Output N"` port label.
    ///
    /// Trailing whitespace is tolerated: the port label is the last
    /// field on some trace lines and carries the line terminator.
    pub fn port_index(
        &self,
        label: &str,
        role: PortRole,
    ) -> Result<PortIndex, TraceError> {
        label
            .trim_end()
            .strip_prefix(role.prefix())
            .and_then(|rest| rest.trim().parse::<usize>().ok())
            .filter(|&p| p < self.ports)
            .ok_or_else(|| TraceError::UnknownPort {
                role,
                label: label.trim_end().to_string(),
            })
    }

    /// Resolve a port spelled inside free text, e.g. the `"Output  2"`
    /// part of a `No free VC` line: the role word and all spaces are
    /// dropped and the remainder parsed as the port number.
    pub fn port_from_text(
        &self,
        text: &str,
        role: PortRole,
    ) -> Result<PortIndex, TraceError> {
        text.replace(role.prefix(), "")
            .replace(' ', "")
            .trim_end()
            .parse::<usize>()
            .ok()
            .filter(|&p| p < self.ports)
            .ok_or_else(|| TraceError::UnknownPort {
                role,
                label: text.trim_end().to_string(),
            })
    }
}
