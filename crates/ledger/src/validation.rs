//! Snapshot validation.
//!
//! The balance computation trusts its input. Callers are expected to run
//! [`GroupSnapshot::validate`] on data coming from storage or users before
//! computing, and to reject the request on error.

use std::collections::HashSet;

use uuid::Uuid;

use crate::{GroupSnapshot, LedgerError, MAX_AMOUNT, MemberId, Money, ResultLedger};

impl GroupSnapshot {
    /// Checks the snapshot for references and amounts the ledger cannot
    /// account for.
    ///
    /// - the roster is not empty and holds each member once
    /// - expenses, splits and payments only reference roster members
    /// - splits reference an expense of the snapshot
    /// - amounts are not negative and neither any amount nor the sum of all
    ///   of them exceeds [`MAX_AMOUNT`]
    /// - nobody pays themselves
    ///
    /// A split whose debtor is the expense payer is tolerated: it carries no
    /// obligation and is skipped when accumulating.
    pub fn validate(&self) -> ResultLedger<()> {
        let result = self.check();
        if let Err(err) = &result {
            tracing::warn!(group = %self.group.id, "rejected group snapshot: {err}");
        }
        result
    }

    fn check(&self) -> ResultLedger<()> {
        if self.roster.is_empty() {
            return Err(LedgerError::EmptyRoster);
        }

        let mut members: HashSet<&MemberId> = HashSet::new();
        for membership in &self.roster {
            if !members.insert(membership.id()) {
                return Err(LedgerError::DuplicateMember(membership.id().to_string()));
            }
        }
        let require_member = |id: &MemberId| {
            if members.contains(id) {
                Ok(())
            } else {
                Err(LedgerError::UnknownMember(id.to_string()))
            }
        };

        let mut total = Total::default();
        let mut expense_ids: HashSet<Uuid> = HashSet::new();
        for expense in &self.expenses {
            require_member(&expense.paid_by)?;
            total.record(expense.amount, "expense")?;
            expense_ids.insert(expense.id);
        }

        for split in &self.splits {
            if !expense_ids.contains(&split.expense_id) {
                return Err(LedgerError::UnknownExpense(split.expense_id.to_string()));
            }
            require_member(&split.debtor)?;
            total.record(split.amount, "split")?;
        }

        for payment in &self.payments {
            require_member(&payment.from)?;
            require_member(&payment.to)?;
            if payment.from == payment.to {
                return Err(LedgerError::SelfPayment(payment.from.to_string()));
            }
            total.record(payment.amount, "payment")?;
        }

        Ok(())
    }
}

/// Running sum of every amount in a snapshot.
#[derive(Default)]
struct Total(Money);

impl Total {
    fn record(&mut self, amount: Money, label: &str) -> ResultLedger<()> {
        if amount.is_negative() {
            return Err(LedgerError::InvalidAmount(format!(
                "{label} amount must be >= 0, got {amount}"
            )));
        }
        if amount > MAX_AMOUNT {
            return Err(LedgerError::InvalidAmount(format!(
                "{label} amount must be <= {MAX_AMOUNT}, got {amount}"
            )));
        }
        self.0 = self
            .0
            .checked_add(amount)
            .filter(|total| *total <= MAX_AMOUNT)
            .ok_or_else(|| {
                LedgerError::InvalidAmount(format!("amounts add up to more than {MAX_AMOUNT}"))
            })?;
        Ok(())
    }
}
