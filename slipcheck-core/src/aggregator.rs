//! Slip aggregation: many selection outcomes, one slip status.

use crate::error::{Result, SettlementError};
use crate::outcome::SettlementStatus;

/// Combine per-selection outcomes into the slip status.
///
/// Priority, independent of order:
/// 1. any `lost` makes the slip `lost`
/// 2. otherwise any `pending` or `not_supported` keeps it `pending`
/// 3. otherwise stake-returning legs (push, refund, void, cancelled) drop
///    out: the slip is `won` if any leg won and `refund` when none did
pub fn aggregate<I>(outcomes: I) -> Result<SettlementStatus>
where
    I: IntoIterator<Item = SettlementStatus>,
{
    let mut seen = false;
    let mut any_pending = false;
    let mut any_won = false;

    for outcome in outcomes {
        seen = true;
        match outcome {
            SettlementStatus::Lost => return Ok(SettlementStatus::Lost),
            SettlementStatus::Pending | SettlementStatus::NotSupported => any_pending = true,
            SettlementStatus::Won => any_won = true,
            _ => {}
        }
    }

    if !seen {
        return Err(SettlementError::EmptySlip);
    }
    Ok(if any_pending {
        SettlementStatus::Pending
    } else if any_won {
        SettlementStatus::Won
    } else {
        SettlementStatus::Refund
    })
}
