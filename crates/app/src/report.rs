//! Maps ledger results to `api_types` views and renders them.

use std::fmt::Write as _;

use api_types::{
    balance::{BalanceDetail, BalancesResponse, OwedByEntry, OwesEntry},
    membership::{BalanceStanding, MemberView, MembershipRole, RemovalVerdict},
    split::{ShareView, SplitPlanResponse, SplitType},
};
use ledger::{
    GroupSnapshot, Ledger, MemberId, Money, RemovalCheck, Role, Standing,
    splits::{Share, SplitRule},
};
use serde::Serialize;

use crate::settings::{Format, Report};

fn display_name(snapshot: &GroupSnapshot, id: &MemberId) -> Option<String> {
    snapshot.membership(id).map(|m| m.member.name.clone())
}

fn signed(amount: Money, symbol: &str) -> String {
    if amount.is_negative() {
        format!("-{symbol} {}", amount.abs())
    } else {
        format!("{symbol} {amount}")
    }
}

fn render<T: Serialize>(
    value: &T,
    format: Format,
    table: impl FnOnce(&T) -> String,
) -> Result<String, serde_json::Error> {
    match format {
        Format::Json => serde_json::to_string_pretty(value),
        Format::Table => Ok(table(value)),
    }
}

pub fn balances_view(snapshot: &GroupSnapshot, ledger: &Ledger) -> BalancesResponse {
    let balances = ledger
        .report()
        .iter()
        .map(|row| {
            let (user_name, user_email) = snapshot
                .membership(&row.member)
                .map(|m| (m.member.name.clone(), m.member.email.clone()))
                .unwrap_or_default();
            BalanceDetail {
                user_id: row.member.to_string(),
                user_name,
                user_email,
                balance: row.balance.amount(),
                owes: row
                    .owes
                    .iter()
                    .map(|c| OwesEntry {
                        to_user_id: c.member.to_string(),
                        to_user_name: display_name(snapshot, &c.member),
                        amount: c.amount.amount(),
                    })
                    .collect(),
                owed_by: row
                    .owed_by
                    .iter()
                    .map(|c| OwedByEntry {
                        from_user_id: c.member.to_string(),
                        from_user_name: display_name(snapshot, &c.member),
                        amount: c.amount.amount(),
                    })
                    .collect(),
            }
        })
        .collect();

    BalancesResponse {
        group_id: snapshot.group.id,
        group_name: snapshot.group.name.clone(),
        balances,
    }
}

pub fn balances(
    snapshot: &GroupSnapshot,
    ledger: &Ledger,
    report: &Report,
) -> Result<String, serde_json::Error> {
    let symbol = report.currency_symbol.as_str();
    render(&balances_view(snapshot, ledger), report.format, |view| {
        let mut out = format!("{}\n", view.group_name);
        for (detail, row) in view.balances.iter().zip(ledger.report()) {
            let _ = writeln!(
                out,
                "  {:<24} {:>14}",
                detail.user_name,
                signed(row.balance, symbol)
            );
            for (entry, debt) in detail.owes.iter().zip(&row.owes) {
                let name = entry.to_user_name.as_deref().unwrap_or(&entry.to_user_id);
                let _ = writeln!(out, "    owes {:<19} {:>14}", name, signed(debt.amount, symbol));
            }
            for (entry, credit) in detail.owed_by.iter().zip(&row.owed_by) {
                let name = entry
                    .from_user_name
                    .as_deref()
                    .unwrap_or(&entry.from_user_id);
                let _ = writeln!(
                    out,
                    "    owed by {:<16} {:>14}",
                    name,
                    signed(credit.amount, symbol)
                );
            }
        }
        out
    })
}

pub fn members(snapshot: &GroupSnapshot, report: &Report) -> Result<String, serde_json::Error> {
    let mut roster: Vec<MemberView> = snapshot
        .ordered_members()
        .iter()
        .filter_map(|id| snapshot.membership(id))
        .map(|m| MemberView {
            user_id: m.id().to_string(),
            name: m.member.name.clone(),
            role: match m.role {
                Role::Admin => MembershipRole::Admin,
                Role::Member => MembershipRole::Member,
            },
        })
        .collect();
    roster.sort_by_key(|m| m.role != MembershipRole::Admin);

    render(&roster, report.format, |roster| {
        roster
            .iter()
            .map(|m| format!("{:<24} {:<8} {}\n", m.name, m.role.as_str(), m.user_id))
            .collect()
    })
}

/// Rejection message for a member that cannot leave yet.
pub fn removal_message(name: &str, check: &RemovalCheck, symbol: &str) -> Option<String> {
    match check.standing {
        Standing::Settled => None,
        Standing::Receivable(amount) => Some(format!(
            "{name} is owed {symbol} {amount}. Settle all pending balances before removing them."
        )),
        Standing::Payable(amount) => Some(format!(
            "{name} owes {symbol} {amount}. Settle all pending balances before removing them."
        )),
    }
}

pub fn removal(
    snapshot: &GroupSnapshot,
    check: &RemovalCheck,
    report: &Report,
) -> Result<String, serde_json::Error> {
    let name = display_name(snapshot, &check.member).unwrap_or_else(|| check.member.to_string());
    let verdict = RemovalVerdict {
        user_id: check.member.to_string(),
        removable: check.is_safe(),
        balance: check.balance.amount(),
        standing: match check.standing {
            Standing::Settled => BalanceStanding::Settled,
            Standing::Receivable(_) => BalanceStanding::Receivable,
            Standing::Payable(_) => BalanceStanding::Payable,
        },
        message: removal_message(&name, check, &report.currency_symbol),
    };

    render(&verdict, report.format, |verdict| match &verdict.message {
        Some(message) => format!("cannot remove {name}: {message}"),
        None => format!("{name} can be removed"),
    })
}

pub fn split_plan(
    amount: Money,
    payer: &MemberId,
    rule: &SplitRule,
    shares: &[Share],
    report: &Report,
) -> Result<String, serde_json::Error> {
    let recorded: Money = shares.iter().map(|s| s.amount).sum();
    let view = SplitPlanResponse {
        split_type: match rule {
            SplitRule::Equal { .. } => SplitType::Equal,
            SplitRule::Single { .. } => SplitType::Single,
            SplitRule::Custom { .. } => SplitType::Custom,
        },
        amount: amount.amount(),
        paid_by: payer.to_string(),
        splits: shares
            .iter()
            .map(|s| ShareView {
                user_id: s.member.to_string(),
                amount: s.amount.amount(),
            })
            .collect(),
        absorbed_by_payer: (amount - recorded).amount(),
    };

    let symbol = report.currency_symbol.as_str();
    render(&view, report.format, |_| {
        let mut out = String::new();
        for share in shares {
            let _ = writeln!(
                out,
                "{} owes {} {:>14}",
                share.member,
                payer,
                signed(share.amount, symbol)
            );
        }
        let _ = writeln!(out, "{payer} absorbs {}", signed(amount - recorded, symbol));
        out
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ledger::{Expense, Group, Member, Membership, Payment, Split};
    use rust_decimal_macros::dec;

    use super::*;

    fn table() -> Report {
        Report {
            format: Format::Table,
            currency_symbol: "R$".to_string(),
        }
    }

    fn snapshot() -> GroupSnapshot {
        let joined = Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap();
        let market = Expense::new("Market", Money::new(dec!(120)), "ana", joined);
        GroupSnapshot::builder(Group::new("Flat 12"))
            .member(Membership::new(
                Member::new("ana", "Ana", "ana@example.com"),
                Role::Admin,
                joined,
            ))
            .member(Membership::new(
                Member::new("bia", "Bia", "bia@example.com"),
                Role::Member,
                joined,
            ))
            .expense_with_splits(
                market.clone(),
                [Split::new(market.id, "bia", Money::new(dec!(60)))],
            )
            .payment(Payment::new("bia", "ana", Money::new(dec!(20)), joined))
            .build()
    }

    #[test]
    fn balances_view_carries_names() {
        let snapshot = snapshot();
        let ledger = ledger::compute(&snapshot);

        let view = balances_view(&snapshot, &ledger);

        assert_eq!(view.group_name, "Flat 12");
        assert_eq!(view.balances[0].user_name, "Ana");
        assert_eq!(view.balances[0].balance, dec!(40));
        assert_eq!(view.balances[0].owed_by[0].from_user_name.as_deref(), Some("Bia"));
        assert_eq!(view.balances[1].balance, dec!(-40));
        assert_eq!(view.balances[1].owes[0].to_user_id, "ana");
    }

    #[test]
    fn balances_table_lists_debts() {
        let snapshot = snapshot();
        let ledger = ledger::compute(&snapshot);

        let out = balances(&snapshot, &ledger, &table()).unwrap();

        assert!(out.starts_with("Flat 12\n"));
        assert!(out.contains("R$ 40.00"));
        assert!(out.contains("-R$ 40.00"));
        assert!(out.contains("owes Ana"));
        assert!(out.contains("owed by Bia"));
    }

    #[test]
    fn removal_message_states_direction() {
        let ledger = ledger::compute(&snapshot());

        let owed = ledger.removal_check(&MemberId::from("ana"));
        let owing = ledger.removal_check(&MemberId::from("bia"));

        assert_eq!(
            removal_message("Ana", &owed, "R$").as_deref(),
            Some("Ana is owed R$ 40.00. Settle all pending balances before removing them.")
        );
        assert_eq!(
            removal_message("Bia", &owing, "R$").as_deref(),
            Some("Bia owes R$ 40.00. Settle all pending balances before removing them.")
        );
        let settled = RemovalCheck::new(MemberId::from("bia"), Money::new(dec!(0.004)));
        assert_eq!(removal_message("Bia", &settled, "R$"), None);
    }

    #[test]
    fn removal_json_verdict() {
        let snapshot = snapshot();
        let ledger = ledger::compute(&snapshot);
        let json = Report {
            format: Format::Json,
            currency_symbol: "€".to_string(),
        };

        let out = removal(&snapshot, &ledger.removal_check(&MemberId::from("bia")), &json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["removable"], false);
        assert_eq!(value["user_id"], "bia");
        assert_eq!(value["standing"], "payable");
        assert!(value["message"].as_str().unwrap().contains("Bia owes € 40.00"));
    }

    #[test]
    fn members_puts_admins_first() {
        let out = members(&snapshot(), &table()).unwrap();
        let first = out.lines().next().unwrap();
        assert!(first.starts_with("Ana"));
        assert!(first.contains("admin"));
    }
}
