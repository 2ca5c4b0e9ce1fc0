//! Per-member balance aggregation.
//!
//! The scalar balance comes from the payment-reduced [`DebtMatrix`]
//! (`Σ_k debt[k][m] − Σ_k debt[m][k]`), while the structured `owes` /
//! `owed_by` lists come from the [`NetDebts`]. Both views are computed from
//! the same matrix, so they cannot drift apart.

use crate::{DebtMatrix, MemberId, Money, NetDebts};

/// One side of a net debt, seen from a member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Counterparty {
    pub member: MemberId,
    pub amount: Money,
}

/// Balance report row of a single member.
///
/// `balance` is positive when the group owes the member money and negative
/// when the member owes the group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberBalance {
    pub member: MemberId,
    pub balance: Money,
    pub owes: Vec<Counterparty>,
    pub owed_by: Vec<Counterparty>,
}

impl MemberBalance {
    pub fn is_settled(&self) -> bool {
        self.balance.is_settled()
    }
}

/// Scalar net balance of `member`.
///
/// Payments made by the member raise it, payments received lower it, since
/// both were already folded into `debts`.
pub fn balance_of(debts: &DebtMatrix, member: &MemberId) -> Money {
    debts.owed_to(member) - debts.owed_by(member)
}

/// Builds one report row per member, in the order of `members`.
///
/// Counterparties inside `owes` and `owed_by` follow the same order.
pub fn aggregate(debts: &DebtMatrix, net: &NetDebts, members: &[MemberId]) -> Vec<MemberBalance> {
    members
        .iter()
        .map(|member| {
            let owes = members
                .iter()
                .filter_map(|other| {
                    net.get(member, other).map(|amount| Counterparty {
                        member: other.clone(),
                        amount,
                    })
                })
                .collect();
            let owed_by = members
                .iter()
                .filter_map(|other| {
                    net.get(other, member).map(|amount| Counterparty {
                        member: other.clone(),
                        amount,
                    })
                })
                .collect();

            MemberBalance {
                member: member.clone(),
                balance: balance_of(debts, member),
                owes,
                owed_by,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::netting;

    fn id(value: &str) -> MemberId {
        MemberId::from(value)
    }

    #[test]
    fn rows_expose_both_views() {
        let members = vec![id("a"), id("b"), id("c")];
        let mut debts = DebtMatrix::new();
        debts.add(&id("b"), &id("a"), Money::new(dec!(30)));
        debts.add(&id("c"), &id("a"), Money::new(dec!(10)));
        debts.add(&id("a"), &id("c"), Money::new(dec!(4)));
        let net = netting::net(&debts, &members);

        let rows = aggregate(&debts, &net, &members);

        assert_eq!(rows[0].member, id("a"));
        assert_eq!(rows[0].balance, Money::new(dec!(36)));
        assert!(rows[0].owes.is_empty());
        assert_eq!(
            rows[0].owed_by,
            vec![
                Counterparty {
                    member: id("b"),
                    amount: Money::new(dec!(30))
                },
                Counterparty {
                    member: id("c"),
                    amount: Money::new(dec!(6))
                },
            ]
        );
        assert_eq!(rows[1].balance, Money::new(dec!(-30)));
        assert_eq!(rows[2].balance, Money::new(dec!(-6)));
        assert_eq!(rows[2].owes.len(), 1);
    }

    #[test]
    fn scalar_balance_is_pre_netting() {
        // A residue under tolerance disappears from the net view but is still
        // part of the scalar balance.
        let members = vec![id("a"), id("b")];
        let mut debts = DebtMatrix::new();
        debts.add(&id("b"), &id("a"), Money::new(dec!(0.005)));
        let net = netting::net(&debts, &members);

        let rows = aggregate(&debts, &net, &members);

        assert!(rows[0].owed_by.is_empty());
        assert_eq!(rows[0].balance, Money::new(dec!(0.005)));
        assert!(rows[0].is_settled());
    }
}
