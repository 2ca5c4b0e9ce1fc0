//! Gross pairwise obligations.
//!
//! [`accumulate`] turns expenses and their splits into a [`DebtMatrix`] where
//! `debt[debtor][creditor]` is what `debtor` owes `creditor`, and
//! [`apply_payments`] reduces it with the direct payments recorded in the
//! group. Cells are allowed to go negative: an overpayment stays in the matrix
//! and is resolved by [`netting`](crate::netting).

use std::collections::{BTreeMap, HashMap};

use uuid::Uuid;

use crate::{Expense, GroupSnapshot, MemberId, Money, Payment, Split};

/// Directed obligations between members. A member never owes themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DebtMatrix {
    cells: BTreeMap<MemberId, BTreeMap<MemberId, Money>>,
}

impl DebtMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// What `debtor` owes `creditor`, 0 when nothing was recorded.
    pub fn get(&self, debtor: &MemberId, creditor: &MemberId) -> Money {
        self.cells
            .get(debtor)
            .and_then(|row| row.get(creditor))
            .copied()
            .unwrap_or(Money::ZERO)
    }

    /// Adds `amount` to what `debtor` owes `creditor`.
    ///
    /// Self-obligations are ignored.
    pub fn add(&mut self, debtor: &MemberId, creditor: &MemberId, amount: Money) {
        if debtor == creditor {
            return;
        }
        *self
            .cells
            .entry(debtor.clone())
            .or_default()
            .entry(creditor.clone())
            .or_default() += amount;
    }

    /// Subtracts `amount` from what `debtor` owes `creditor`. The cell may go
    /// negative.
    pub fn reduce(&mut self, debtor: &MemberId, creditor: &MemberId, amount: Money) {
        self.add(debtor, creditor, -amount);
    }

    /// Σ_k debt[k][member]: everything the others owe `member`.
    pub fn owed_to(&self, member: &MemberId) -> Money {
        self.cells
            .values()
            .filter_map(|row| row.get(member))
            .sum()
    }

    /// Σ_k debt[member][k]: everything `member` owes the others.
    pub fn owed_by(&self, member: &MemberId) -> Money {
        self.cells
            .get(member)
            .map(|row| row.values().sum::<Money>())
            .unwrap_or(Money::ZERO)
    }

    /// Every recorded cell as `(debtor, creditor, amount)`, ordered by debtor
    /// then creditor.
    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, &MemberId, Money)> {
        self.cells.iter().flat_map(|(debtor, row)| {
            row.iter()
                .map(move |(creditor, amount)| (debtor, creditor, *amount))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(BTreeMap::is_empty)
    }
}

/// Builds the gross obligations from expenses and splits.
///
/// Every split adds its amount to `debt[split.debtor][expense.paid_by]`.
/// Splits whose debtor is the payer, and splits pointing to an expense that
/// is not in `expenses`, contribute nothing. An expense without splits is
/// fully absorbed by its payer.
pub fn accumulate(expenses: &[Expense], splits: &[Split]) -> DebtMatrix {
    let payers: HashMap<Uuid, &MemberId> = expenses.iter().map(|e| (e.id, &e.paid_by)).collect();

    let mut debts = DebtMatrix::new();
    for split in splits {
        let Some(payer) = payers.get(&split.expense_id) else {
            tracing::debug!(expense_id = %split.expense_id, "split of unknown expense skipped");
            continue;
        };
        if split.debtor == **payer {
            continue;
        }
        debts.add(&split.debtor, payer, split.amount);
    }
    debts
}

/// Applies direct payments: each payment shrinks what `from` owes `to`.
///
/// No clamping happens here; paying more than owed, or paying without any
/// prior obligation, leaves a negative cell.
pub fn apply_payments(debts: &mut DebtMatrix, payments: &[Payment]) {
    for payment in payments {
        debts.reduce(&payment.from, &payment.to, payment.amount);
    }
}

/// Gross obligations of a snapshot with all of its payments applied.
pub fn reduced_debts(snapshot: &GroupSnapshot) -> DebtMatrix {
    let mut debts = accumulate(&snapshot.expenses, &snapshot.splits);
    apply_payments(&mut debts, &snapshot.payments);
    debts
}
