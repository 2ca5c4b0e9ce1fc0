//! Removal-safety check: a member may leave a group only once settled.

use crate::{MemberId, Money};

/// Direction of a member's outstanding balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Standing {
    /// Balance within tolerance of zero.
    Settled,
    /// The group owes the member this amount.
    Receivable(Money),
    /// The member owes the group this amount.
    Payable(Money),
}

/// Outcome of the removal-safety check.
///
/// Rejection messages are up to the caller; the check only carries the
/// signed balance and its [`Standing`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemovalCheck {
    pub member: MemberId,
    pub balance: Money,
    pub standing: Standing,
}

impl RemovalCheck {
    pub fn new(member: MemberId, balance: Money) -> Self {
        let standing = if balance.is_settled() {
            Standing::Settled
        } else if balance.is_positive() {
            Standing::Receivable(balance)
        } else {
            Standing::Payable(balance.abs())
        };
        Self {
            member,
            balance,
            standing,
        }
    }

    /// `true` when `|balance| <= SETTLEMENT_TOLERANCE`.
    pub fn is_safe(&self) -> bool {
        self.balance.is_settled()
    }
}
