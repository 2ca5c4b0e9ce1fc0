//! The module contains the errors the ledger can return.
//!
//! The balance computation itself never fails. Errors come from the steps
//! around it:
//!
//! - [`validate`] rejecting an inconsistent [`GroupSnapshot`].
//! - [`Money`] parsing and float conversion.
//! - [`splits::plan`] rejecting an invalid split request.
//!
//!  [`validate`]: crate::GroupSnapshot::validate
//!  [`GroupSnapshot`]: crate::GroupSnapshot
//!  [`Money`]: crate::Money
//!  [`splits::plan`]: crate::splits::plan
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("\"{0}\" is not a member of the group")]
    UnknownMember(String),
    #[error("\"{0}\" expense not found!")]
    UnknownExpense(String),
    #[error("\"{0}\" already present!")]
    DuplicateMember(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Payment from \"{0}\" to themselves")]
    SelfPayment(String),
    #[error("Invalid split: {0}")]
    InvalidSplit(String),
    #[error("Group has no members")]
    EmptyRoster,
}
