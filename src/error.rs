//! Error types for trace reconstruction.

use crate::topology::PortRole;
use thiserror::Error;

/// Fatal conditions while reconstructing a pipeline table.
///
/// Lookup failures are configuration mismatches between the supplied
/// topology and the trace being read; masking them would silently
/// corrupt the reconstructed table, so they abort the run.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("unknown router path `{0}`: not part of the configured topology")]
    UnknownRouter(String),

    #[error("unknown {role} port label `{label}`")]
    UnknownPort { role: PortRole, label: String },

    #[error("line {line}: cannot parse cycle number from `{field}`")]
    BadCycle { line: usize, field: String },

    #[error("line {line}: `{kind}` event is missing field {field}")]
    TruncatedEvent {
        line: usize,
        kind: &'static str,
        field: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
