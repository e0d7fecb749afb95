//! Error types returned at the group-layer API boundary.
//!
//! Internal arithmetic (field add/mul/square, scalar add) never fails and
//! returns values directly; only decode and decompression routines, which
//! can be handed attacker-controlled bytes, return [`GroupError`].

use core::fmt;

/// A compressed encoding failed to decode to a valid curve point.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GroupError(pub(crate) GroupErrorKind);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum GroupErrorKind {
    /// The bytes did not decode to a point on the curve (or its twist check
    /// failed), or decoded to the identity where that is forbidden.
    BadPoint,
    /// The input had too few bytes for the routine to run.
    ShortInput,
}

impl GroupError {
    pub(crate) const fn bad_point() -> Self {
        GroupError(GroupErrorKind::BadPoint)
    }

    pub(crate) const fn short_input() -> Self {
        GroupError(GroupErrorKind::ShortInput)
    }
}

impl fmt::Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            GroupErrorKind::BadPoint => write!(f, "bytes do not decode to a valid curve point"),
            GroupErrorKind::ShortInput => write!(f, "not enough bytes to decode a point"),
        }
    }
}

impl std::error::Error for GroupError {}
