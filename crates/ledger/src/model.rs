//! Ledger data model.
//!
//! A [`GroupSnapshot`] is the fully materialized input of one computation: the
//! group roster plus every expense, split and payment recorded for the group.
//! The types here carry no behavior beyond construction and lookups.

use std::{collections::HashSet, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Money;

/// Opaque member identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MemberId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Role of a member inside a group.
///
/// - `admin`: can manage members.
/// - `member`: regular participant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    Member,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: String,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Roster entry: a member together with their role and join date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub member: Member,
    #[serde(default)]
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(member: Member, role: Role, joined_at: DateTime<Utc>) -> Self {
        Self {
            member,
            role,
            joined_at,
        }
    }

    pub fn id(&self) -> &MemberId {
        &self.member.id
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category: None,
            description: None,
        }
    }
}

/// An expense paid by one member on behalf of others.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub amount: Money,
    pub paid_by: MemberId,
    pub date: DateTime<Utc>,
    pub category: Option<String>,
}

impl Expense {
    pub fn new(
        description: impl Into<String>,
        amount: Money,
        paid_by: impl Into<MemberId>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            paid_by: paid_by.into(),
            date,
            category: None,
        }
    }
}

/// The share of an expense owed by `debtor` to the expense payer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub id: Uuid,
    pub expense_id: Uuid,
    pub debtor: MemberId,
    pub amount: Money,
}

impl Split {
    pub fn new(expense_id: Uuid, debtor: impl Into<MemberId>, amount: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            expense_id,
            debtor: debtor.into(),
            amount,
        }
    }
}

/// A direct settlement between two members, independent of any expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
}

impl Payment {
    pub fn new(
        from: impl Into<MemberId>,
        to: impl Into<MemberId>,
        amount: Money,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from: from.into(),
            to: to.into(),
            amount,
            date,
            description: None,
        }
    }
}

/// Consistent snapshot of a group ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub group: Group,
    pub roster: Vec<Membership>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub splits: Vec<Split>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl GroupSnapshot {
    /// Return a builder for `GroupSnapshot`.
    pub fn builder(group: Group) -> SnapshotBuilder {
        SnapshotBuilder {
            snapshot: GroupSnapshot {
                group,
                roster: Vec::new(),
                expenses: Vec::new(),
                splits: Vec::new(),
                payments: Vec::new(),
            },
        }
    }

    /// Roster member ids in the canonical order: join date, then id.
    ///
    /// Netting pairs and report rows follow this order, so results never
    /// depend on the order the roster was loaded in. Duplicate ids are
    /// collapsed to their first occurrence in that order.
    pub fn ordered_members(&self) -> Vec<MemberId> {
        let mut entries: Vec<&Membership> = self.roster.iter().collect();
        entries.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.id().cmp(b.id()))
        });

        let mut seen = HashSet::new();
        entries
            .into_iter()
            .filter(|m| seen.insert(m.id()))
            .map(|m| m.id().clone())
            .collect()
    }

    pub fn membership(&self, id: &MemberId) -> Option<&Membership> {
        self.roster.iter().find(|m| m.id() == id)
    }

    pub fn is_member(&self, id: &MemberId) -> bool {
        self.membership(id).is_some()
    }
}

/// The builder for `GroupSnapshot`.
#[derive(Debug)]
pub struct SnapshotBuilder {
    snapshot: GroupSnapshot,
}

impl SnapshotBuilder {
    pub fn member(mut self, membership: Membership) -> SnapshotBuilder {
        self.snapshot.roster.push(membership);
        self
    }

    pub fn expense(mut self, expense: Expense) -> SnapshotBuilder {
        self.snapshot.expenses.push(expense);
        self
    }

    /// Adds an expense together with its splits.
    pub fn expense_with_splits(
        mut self,
        expense: Expense,
        splits: impl IntoIterator<Item = Split>,
    ) -> SnapshotBuilder {
        self.snapshot.splits.extend(splits);
        self.snapshot.expenses.push(expense);
        self
    }

    pub fn split(mut self, split: Split) -> SnapshotBuilder {
        self.snapshot.splits.push(split);
        self
    }

    pub fn payment(mut self, payment: Payment) -> SnapshotBuilder {
        self.snapshot.payments.push(payment);
        self
    }

    /// Construct the snapshot. No validation happens here, see
    /// [`GroupSnapshot::validate`].
    pub fn build(self) -> GroupSnapshot {
        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn joined(day: u32, id: &str) -> Membership {
        Membership::new(
            Member::new(id, id.to_uppercase(), format!("{id}@example.com")),
            Role::Member,
            Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn members_are_ordered_by_join_date_then_id() {
        let snapshot = GroupSnapshot::builder(Group::new("Trip"))
            .member(joined(3, "alice"))
            .member(joined(1, "zoe"))
            .member(joined(3, "bob"))
            .member(joined(2, "carol"))
            .build();

        let ids: Vec<String> = snapshot
            .ordered_members()
            .into_iter()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(ids, vec!["zoe", "carol", "alice", "bob"]);
    }

    #[test]
    fn duplicate_roster_entries_collapse() {
        let snapshot = GroupSnapshot::builder(Group::new("Trip"))
            .member(joined(1, "alice"))
            .member(joined(1, "alice"))
            .build();
        assert_eq!(snapshot.ordered_members().len(), 1);
    }

    #[test]
    fn membership_lookup() {
        let snapshot = GroupSnapshot::builder(Group::new("Trip"))
            .member(joined(1, "alice"))
            .member(joined(2, "bob"))
            .build();

        assert!(snapshot.is_member(&MemberId::from("bob")));
        assert!(!snapshot.is_member(&MemberId::from("carol")));
        assert_eq!(
            snapshot.membership(&MemberId::from("alice")).map(|m| m.member.name.as_str()),
            Some("ALICE")
        );
    }

    #[test]
    fn role_defaults_to_member_when_absent() {
        let raw = r#"{
            "member": { "id": "bob", "name": "Bob", "email": "bob@example.com" },
            "joined_at": "2025-01-02T00:00:00Z"
        }"#;
        let membership: Membership = serde_json::from_str(raw).unwrap();
        assert_eq!(membership.role, Role::Member);
    }
}
