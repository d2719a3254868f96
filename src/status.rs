// SPDX-FileCopyrightText: 2026 route-search core contributors
//
// SPDX-License-Identifier: Parity-7.0.0

//! Error taxonomy reported on the final stop (spec.md §7).

use std::fmt;

/// A bitmask of stopping reasons. Several can be set at once — e.g. a
/// validator timeout discovered while already over the local iteration
/// cap.
#[derive(Copy, Clone, Eq, PartialEq, Default, Hash)]
pub struct StoppingStatus(u16);

impl StoppingStatus {
    pub const CLEAN: Self = Self(0);
    pub const STOPPING_ERROR_SID: Self = Self(1 << 0);
    pub const STOPPING_ERROR_STAR: Self = Self(1 << 1);
    pub const STOPPING_ERROR_ENROUTE: Self = Self(1 << 2);
    pub const STOPPING_ERROR_ITERATION: Self = Self(1 << 3);
    pub const STOPPING_ERROR_VALIDATOR_TIMEOUT: Self = Self(1 << 4);
    pub const STOPPING_ERROR_INTERNAL_ERROR: Self = Self(1 << 5);
    /// Not an error: the caller's stop flag was observed (spec.md §5).
    pub const CANCELLED: Self = Self(1 << 6);
    /// Not an error: the validator accepted the route.
    pub const ACCEPTED: Self = Self(1 << 7);

    #[must_use]
    pub const fn is_clean(self) -> bool {
        self.0 & !(Self::CANCELLED.0 | Self::ACCEPTED.0) == 0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn is_terminal_error(self) -> bool {
        self.0
            & (Self::STOPPING_ERROR_SID.0
                | Self::STOPPING_ERROR_STAR.0
                | Self::STOPPING_ERROR_ENROUTE.0
                | Self::STOPPING_ERROR_ITERATION.0
                | Self::STOPPING_ERROR_VALIDATOR_TIMEOUT.0
                | Self::STOPPING_ERROR_INTERNAL_ERROR.0)
            != 0
    }
}

impl std::ops::BitOr for StoppingStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.with(rhs)
    }
}

impl std::ops::BitOrAssign for StoppingStatus {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.with(rhs);
    }
}

impl fmt::Debug for StoppingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        let table: &[(Self, &str)] = &[
            (Self::STOPPING_ERROR_SID, "sid"),
            (Self::STOPPING_ERROR_STAR, "star"),
            (Self::STOPPING_ERROR_ENROUTE, "enroute"),
            (Self::STOPPING_ERROR_ITERATION, "iteration"),
            (Self::STOPPING_ERROR_VALIDATOR_TIMEOUT, "validator_timeout"),
            (Self::STOPPING_ERROR_INTERNAL_ERROR, "internal_error"),
            (Self::CANCELLED, "cancelled"),
            (Self::ACCEPTED, "accepted"),
        ];
        for (flag, name) in table {
            if self.contains(*flag) {
                flags.push(*name);
            }
        }
        if flags.is_empty() {
            write!(f, "StoppingStatus(clean)")
        } else {
            write!(f, "StoppingStatus({})", flags.join("|"))
        }
    }
}
