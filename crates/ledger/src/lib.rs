//! Balance and debt-netting engine for shared-expense groups.
//!
//! Given a consistent [`GroupSnapshot`] (roster, expenses, splits and direct
//! payments) [`compute`] derives, for every member, the net balance against
//! the group and the pairwise debts left after cancelling reciprocal
//! obligations:
//!
//! 1. [`obligations::accumulate`]: splits become gross `debtor -> payer` debts.
//! 2. [`obligations::apply_payments`]: direct payments reduce those debts.
//! 3. [`netting::net`]: each pair collapses to at most one directed debt.
//! 4. [`balances::aggregate`]: per-member balance plus `owes` / `owed_by`.
//!
//! The computation is pure and total. Input problems are caught beforehand by
//! [`GroupSnapshot::validate`], which also caps amounts at [`MAX_AMOUNT`] so the
//! decimal arithmetic cannot overflow.

pub use balances::{Counterparty, MemberBalance};
pub use error::LedgerError;
pub use model::{
    Expense, Group, GroupSnapshot, Member, MemberId, Membership, Payment, Role, SnapshotBuilder,
    Split,
};
pub use money::{MAX_AMOUNT, Money, SETTLEMENT_TOLERANCE};
pub use netting::NetDebts;
pub use obligations::DebtMatrix;
pub use removal::{RemovalCheck, Standing};

pub mod balances;
mod error;
mod model;
mod money;
pub mod netting;
pub mod obligations;
mod removal;
pub mod splits;
mod validation;

pub type ResultLedger<T> = Result<T, LedgerError>;

/// Result of a ledger computation for one group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ledger {
    members: Vec<MemberId>,
    debts: DebtMatrix,
    net: NetDebts,
    report: Vec<MemberBalance>,
}

/// Computes balances and net debts of a group.
///
/// Never fails. On inconsistent input (e.g. a payment to someone outside the
/// roster) the balances may not add up to zero; that is logged and left to
/// the caller.
pub fn compute(snapshot: &GroupSnapshot) -> Ledger {
    let members = snapshot.ordered_members();
    let debts = obligations::reduced_debts(snapshot);
    let net = netting::net(&debts, &members);
    let report = balances::aggregate(&debts, &net, &members);

    let ledger = Ledger {
        members,
        debts,
        net,
        report,
    };

    let residue = ledger.total();
    tracing::debug!(
        group = %snapshot.group.id,
        members = ledger.members.len(),
        expenses = snapshot.expenses.len(),
        payments = snapshot.payments.len(),
        net_debts = ledger.net.len(),
        "ledger computed"
    );
    if !residue.is_settled() {
        tracing::warn!(group = %snapshot.group.id, %residue, "balances do not sum to zero");
    }

    ledger
}

impl Ledger {
    /// Members in report order.
    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    /// Payment-reduced gross debts.
    pub fn debts(&self) -> &DebtMatrix {
        &self.debts
    }

    pub fn net_debts(&self) -> &NetDebts {
        &self.net
    }

    /// One row per roster member.
    pub fn report(&self) -> &[MemberBalance] {
        &self.report
    }

    pub fn member_balance(&self, member: &MemberId) -> Option<&MemberBalance> {
        self.report.iter().find(|row| &row.member == member)
    }

    /// Net balance of `member`, 0 for someone without any recorded activity.
    pub fn balance(&self, member: &MemberId) -> Money {
        match self.member_balance(member) {
            Some(row) => row.balance,
            None => balances::balance_of(&self.debts, member),
        }
    }

    /// Sum of all roster balances. Within tolerance of zero on valid input.
    pub fn total(&self) -> Money {
        self.report.iter().map(|row| row.balance).sum()
    }

    /// Whether `member` can leave the group.
    pub fn removal_check(&self, member: &MemberId) -> RemovalCheck {
        RemovalCheck::new(member.clone(), self.balance(member))
    }
}
