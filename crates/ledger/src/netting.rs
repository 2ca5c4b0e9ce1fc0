//! Pairwise netting.
//!
//! For every unordered pair `{a, b}` the two directed amounts `debt[a][b]` and
//! `debt[b][a]` collapse into at most one residual debt, pointing from the
//! side with the larger gross amount. Residuals within
//! [`SETTLEMENT_TOLERANCE`] are dropped.

use std::collections::BTreeMap;

use crate::{DebtMatrix, MemberId, Money, SETTLEMENT_TOLERANCE};

/// Net directed debts, at most one direction per pair and always positive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetDebts {
    cells: BTreeMap<MemberId, BTreeMap<MemberId, Money>>,
}

impl NetDebts {
    /// What `debtor` owes `creditor` after netting, if anything.
    pub fn get(&self, debtor: &MemberId, creditor: &MemberId) -> Option<Money> {
        self.cells
            .get(debtor)
            .and_then(|row| row.get(creditor))
            .copied()
    }

    /// Every net debt as `(debtor, creditor, amount)`.
    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, &MemberId, Money)> {
        self.cells.iter().flat_map(|(debtor, row)| {
            row.iter()
                .map(move |(creditor, amount)| (debtor, creditor, *amount))
        })
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, debtor: &MemberId, creditor: &MemberId, amount: Money) {
        self.cells
            .entry(debtor.clone())
            .or_default()
            .insert(creditor.clone(), amount);
    }
}

/// Nets `debts` over every pair of `members`.
///
/// Pairs are visited as `(members[i], members[j])` with `i < j`, so the
/// result only depends on the given order, never on map iteration order.
/// A member repeated in the slice is never paired with itself.
pub fn net(debts: &DebtMatrix, members: &[MemberId]) -> NetDebts {
    let mut net = NetDebts::default();

    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            if a == b {
                continue;
            }
            let delta = debts.get(a, b) - debts.get(b, a);
            if delta > SETTLEMENT_TOLERANCE {
                net.insert(a, b, delta);
            } else if delta < -SETTLEMENT_TOLERANCE {
                net.insert(b, a, -delta);
            }
        }
    }

    net
}
