//! Split planning.
//!
//! Turns a split request (equal, single debtor, custom shares) into the split
//! records stored with an expense. The payer never gets a record against
//! their own expense and zero shares are dropped; whatever the records do not
//! cover is absorbed by the payer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, MAX_AMOUNT, MemberId, Money, ResultLedger, Split};

/// A member's share of an expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub member: MemberId,
    pub amount: Money,
}

impl Share {
    pub fn new(member: impl Into<MemberId>, amount: Money) -> Self {
        Self {
            member: member.into(),
            amount,
        }
    }
}

/// How an expense is divided.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SplitRule {
    /// Equal shares among the participants, payer included when listed.
    Equal { participants: Vec<MemberId> },
    /// One member owes the whole amount.
    Single { debtor: Option<MemberId> },
    /// Caller-provided shares.
    Custom { shares: Vec<Share> },
}

/// Whether the split belongs to a new expense or amends an existing one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    #[default]
    Create,
    /// Amending is deliberately laxer than creating: custom shares are not
    /// checked against the amount and a missing or self debtor yields no
    /// records instead of an error.
    Amend,
}

/// Plans the shares owed to `payer` for an expense of `amount`.
pub fn plan(
    amount: Money,
    payer: &MemberId,
    rule: &SplitRule,
    mode: PlanMode,
) -> ResultLedger<Vec<Share>> {
    if amount.is_negative() || (mode == PlanMode::Create && amount.is_zero()) {
        return Err(LedgerError::InvalidAmount(format!(
            "expense amount must be > 0, got {amount}"
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::InvalidAmount(format!(
            "expense amount must be <= {MAX_AMOUNT}, got {amount}"
        )));
    }

    let shares = match rule {
        SplitRule::Equal { participants } => equal_shares(amount, participants)?,
        SplitRule::Single { debtor } => match (debtor, mode) {
            (None, PlanMode::Create) => {
                return Err(LedgerError::InvalidSplit("debtor not specified".to_string()));
            }
            (Some(debtor), PlanMode::Create) if debtor == payer => {
                return Err(LedgerError::InvalidSplit(
                    "payer cannot be the debtor".to_string(),
                ));
            }
            (None, PlanMode::Amend) => Vec::new(),
            (Some(debtor), _) => vec![Share::new(debtor.clone(), amount)],
        },
        SplitRule::Custom { shares } => {
            if mode == PlanMode::Create {
                check_custom_shares(amount, shares)?;
            }
            shares.clone()
        }
    };

    Ok(shares
        .into_iter()
        .filter(|share| &share.member != payer && share.amount.is_positive())
        .collect())
}

/// Split records for `expense_id` from planned shares.
pub fn into_splits(expense_id: Uuid, shares: Vec<Share>) -> Vec<Split> {
    shares
        .into_iter()
        .map(|share| Split::new(expense_id, share.member, share.amount))
        .collect()
}

fn equal_shares(amount: Money, participants: &[MemberId]) -> ResultLedger<Vec<Share>> {
    let mut unique: Vec<&MemberId> = Vec::with_capacity(participants.len());
    for participant in participants {
        if !unique.contains(&participant) {
            unique.push(participant);
        }
    }

    let share = amount.share_of(unique.len()).ok_or_else(|| {
        LedgerError::InvalidSplit("equal split needs at least one participant".to_string())
    })?;

    Ok(unique
        .into_iter()
        .map(|member| Share::new(member.clone(), share))
        .collect())
}

fn check_custom_shares(amount: Money, shares: &[Share]) -> ResultLedger<()> {
    if shares.is_empty() {
        return Err(LedgerError::InvalidSplit(
            "custom split needs at least one share".to_string(),
        ));
    }
    if let Some(share) = shares.iter().find(|s| s.amount.is_negative()) {
        return Err(LedgerError::InvalidAmount(format!(
            "share of \"{}\" must be >= 0, got {}",
            share.member, share.amount
        )));
    }

    let total = shares
        .iter()
        .try_fold(Money::ZERO, |total, s| total.checked_add(s.amount))
        .ok_or_else(|| LedgerError::InvalidAmount("shares overflow".to_string()))?;
    if !(total - amount).is_settled() {
        return Err(LedgerError::InvalidSplit(format!(
            "shares add up to {total}, expense amount is {amount}"
        )));
    }
    Ok(())
}
