#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum TimelineError {
    #[error("no saved episode positions to recover; save positions first")]
    RecoveryUnavailable,

    #[error("range {lo}..{hi} is outside a list of {len} program(s)")]
    InvalidRange { lo: usize, hi: usize, len: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
