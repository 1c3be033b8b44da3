//! Trace line classification.
//!
//! One trace line holds one pipeline event: `" | "`-separated fields,
//! cycle number first, then the router path, then the event kind and a
//! kind-specific tail. The kind vocabulary is closed; anything else on
//! a well-formed line is an unrelated diagnostic and only contributes
//! its cycle number to boundary detection.

use crate::error::TraceError;
use crate::topology::{PortIndex, PortRole, RouterId, Topology};
use compact_str::CompactString;

/// Value recorded when a signal saw no event in the current cycle.
pub const PLACEHOLDER: &str = "X";

/// Value recorded for a failed local switch allocation. The flit id on
/// the line is intentionally discarded.
pub const ALLOC_MISS: &str = "-1";

/// One tracked pipeline signal.
///
/// Declaration order is the row order within a port: the three
/// input-side signals first, then the six output-side ones, matching
/// the report layout in [`crate::report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Buffer write of a flit arriving on an input port.
    Bandwidth,
    /// Credit sent upstream for a locally buffered flit.
    CreditLocal,
    /// Credit sent upstream for a flit taking the bypass path.
    CreditBypass,
    /// Local switch allocation grant.
    SwitchAllocLocal,
    /// Local switch allocation failure (no free VC downstream).
    SwitchAllocMiss,
    /// Global (speculative) switch allocation grant.
    SwitchAllocGlobal,
    /// Switch plus link traversal.
    LinkTraversal,
    /// Credit received back from the downstream router.
    CreditReception,
    /// Downstream buffer credit count. The only persistent signal.
    CreditAvailability,
}

impl Signal {
    /// Signals recorded against input ports, in row order.
    pub const INPUT: [Signal; 3] =
        [Signal::Bandwidth, Signal::CreditLocal, Signal::CreditBypass];

    /// Signals recorded against output ports, in row order.
    pub const OUTPUT: [Signal; 6] = [
        Signal::SwitchAllocLocal,
        Signal::SwitchAllocMiss,
        Signal::SwitchAllocGlobal,
        Signal::LinkTraversal,
        Signal::CreditReception,
        Signal::CreditAvailability,
    ];

    pub const COUNT: usize = 9;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn role(self) -> PortRole {
        match self {
            Signal::Bandwidth | Signal::CreditLocal | Signal::CreditBypass => {
                PortRole::Input
            }
            _ => PortRole::Output,
        }
    }

    /// Persistent signals carry their last value across cycle
    /// boundaries; ephemeral ones reset to [`PLACEHOLDER`].
    pub fn persistent(self) -> bool {
        matches!(self, Signal::CreditAvailability)
    }

    /// Short name used in report row labels, identical to the strings
    /// the simulator's own tooling prints.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Signal::Bandwidth => "BW",
            Signal::CreditLocal => "Crd L",
            Signal::CreditBypass => "Crd B",
            Signal::SwitchAllocLocal => "SA-L",
            Signal::SwitchAllocMiss => "SA-L (MISS)",
            Signal::SwitchAllocGlobal => "SA-G",
            Signal::LinkTraversal => "ST+LT",
            Signal::CreditReception => "Crd Rec",
            Signal::CreditAvailability => "Credits",
        }
    }
}

/// A classified pipeline event: one cell write at one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub cycle: u64,
    pub router: RouterId,
    pub signal: Signal,
    pub port: PortIndex,
    pub value: CompactString,
}

/// Classification result for one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Fewer than 3 fields: separator or free-form output, no event.
    Skip,
    /// Well-formed line with an unrecognized kind. Carries the cycle
    /// number, which still drives cycle boundary detection.
    Tick(u64),
    /// A recognized pipeline event.
    Event(TraceEvent),
}

/// Classify one raw trace line.
///
/// `lineno` is 1-based and only used in error reports. Unknown router
/// paths and port labels are fatal: they mean the configured topology
/// does not match the trace.
pub fn parse_line(
    line: &str,
    topo: &Topology,
    lineno: usize,
) -> Result<ParsedLine, TraceError> {
    let fields: Vec<&str> = line.split(" | ").collect();
    if fields.len() < 3 {
        return Ok(ParsedLine::Skip);
    }

    let cycle: u64 =
        fields[0].trim().parse().map_err(|_| TraceError::BadCycle {
            line: lineno,
            field: fields[0].to_string(),
        })?;

    let kind = fields[2].trim_end();
    let (signal, port_field) = match kind {
        "Credit availability" => (Signal::CreditAvailability, 3),
        "Credit Local" => (Signal::CreditLocal, 4),
        "Credit Bypass" => (Signal::CreditBypass, 4),
        "Credit Reception" => (Signal::CreditReception, 4),
        "BW" => (Signal::Bandwidth, 4),
        "SA-L" => (Signal::SwitchAllocLocal, 5),
        "No free VC" => (Signal::SwitchAllocMiss, 5),
        "SA-G" => (Signal::SwitchAllocGlobal, 5),
        "ST+LT" => (Signal::LinkTraversal, 5),
        _ => return Ok(ParsedLine::Tick(cycle)),
    };

    let field = |i: usize| {
        fields.get(i).copied().ok_or(TraceError::TruncatedEvent {
            line: lineno,
            kind: signal.mnemonic(),
            field: i,
        })
    };

    let router = topo.router_index(fields[1])?;
    let port = match signal {
        // the port is spelled inside free text on failure lines
        Signal::SwitchAllocMiss => {
            topo.port_from_text(field(port_field)?, PortRole::Output)?
        }
        _ => topo.port_index(field(port_field)?, signal.role())?,
    };

    let value: CompactString = match signal {
        Signal::CreditAvailability => field(4)?.trim_end().into(),
        Signal::SwitchAllocMiss => ALLOC_MISS.into(),
        // flit-carrying events: field 3 is "Flit <id>"
        _ => {
            let raw = field(3)?;
            raw.strip_prefix("Flit ").unwrap_or(raw).trim_end().into()
        }
    };

    Ok(ParsedLine::Event(TraceEvent {
        cycle,
        router,
        signal,
        port,
        value,
    }))
}
