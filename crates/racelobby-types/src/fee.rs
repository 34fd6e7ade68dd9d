//! Entry fee schedule.
//!
//! A fee schedule bounds what a lobby may charge entrants, by the lobby's
//! minimum racer class. Ceilings must rise strictly with class, and the
//! floor is shared by all classes.

use serde::{Deserialize, Serialize};

use crate::{LobbyError, Result, constants::CLASS_COUNT};

/// Entry fee floor and per-class ceilings, in the smallest game-token unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFeeRequirements {
    /// Minimum fee for every class.
    pub min_fee: u64,
    /// Maximum fee for class `i + 1`.
    pub max_class_fees: [u64; CLASS_COUNT],
}

impl EntryFeeRequirements {
    /// Check the schedule is well formed.
    ///
    /// # Errors
    /// Returns `InvalidFeeRequirements` if `min_fee` is zero, the class-1
    /// ceiling does not exceed the floor, or ceilings are not strictly increasing.
    pub fn validate(&self) -> Result<()> {
        if self.min_fee == 0 {
            return Err(LobbyError::InvalidFeeRequirements {
                reason: "min_fee must be greater than zero".into(),
            });
        }
        let mut previous = self.min_fee;
        for (i, &ceiling) in self.max_class_fees.iter().enumerate() {
            if ceiling <= previous {
                return Err(LobbyError::InvalidFeeRequirements {
                    reason: format!(
                        "class {} ceiling {ceiling} must exceed {previous}",
                        i + 1
                    ),
                });
            }
            previous = ceiling;
        }
        Ok(())
    }

    /// `(min, max)` fee bounds for a racer class, or `None` for an unknown class.
    #[must_use]
    pub fn bounds_for_class(&self, class: u8) -> Option<(u64, u64)> {
        let idx = usize::from(class).checked_sub(1)?;
        self.max_class_fees
            .get(idx)
            .map(|&max| (self.min_fee, max))
    }

    /// Check an entry fee against the bounds for `class`.
    ///
    /// # Errors
    /// Returns `InvalidMetadata` if the class is unknown or the fee is out of bounds.
    pub fn check_fee(&self, class: u8, fee: u64) -> Result<()> {
        let (min, max) = self.bounds_for_class(class).ok_or_else(|| {
            LobbyError::invalid_metadata(format!("no entry fee ceiling for class {class}"))
        })?;
        if fee < min || fee > max {
            return Err(LobbyError::invalid_metadata(format!(
                "entry fee {fee} outside [{min}, {max}] for class {class}"
            )));
        }
        Ok(())
    }
}
