use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod balance {
    use super::*;

    /// Balance report of a whole group, one entry per member.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalancesResponse {
        pub group_id: Uuid,
        pub group_name: String,
        pub balances: Vec<BalanceDetail>,
    }

    /// Net position of a member.
    ///
    /// `balance` is positive when the member is owed money and negative when
    /// they owe money.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceDetail {
        pub user_id: String,
        pub user_name: String,
        pub user_email: String,
        pub balance: Decimal,
        pub owes: Vec<OwesEntry>,
        pub owed_by: Vec<OwedByEntry>,
    }

    /// A net debt the member has to pay.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OwesEntry {
        pub to_user_id: String,
        pub to_user_name: Option<String>,
        pub amount: Decimal,
    }

    /// A net debt the member has to receive.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OwedByEntry {
        pub from_user_id: String,
        pub from_user_name: Option<String>,
        pub amount: Decimal,
    }
}

pub mod membership {
    use super::*;

    /// Role of a user in a group.
    ///
    /// - `admin`: can manage members.
    /// - `member`: regular participant.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum MembershipRole {
        Admin,
        Member,
    }

    impl MembershipRole {
        /// Returns the canonical role string.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Admin => "admin",
                Self::Member => "member",
            }
        }
    }

    /// A member with their role.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub user_id: String,
        pub name: String,
        pub role: MembershipRole,
    }

    /// Direction of an outstanding balance.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BalanceStanding {
        Settled,
        /// The group owes the user.
        Receivable,
        /// The user owes the group.
        Payable,
    }

    /// Response body for a removal request.
    ///
    /// `message` explains the rejection when `removable` is false.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RemovalVerdict {
        pub user_id: String,
        pub removable: bool,
        pub balance: Decimal,
        pub standing: BalanceStanding,
        pub message: Option<String>,
    }
}

pub mod split {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SplitType {
        Equal,
        Single,
        Custom,
    }

    /// A member's share of an expense.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShareView {
        pub user_id: String,
        pub amount: Decimal,
    }

    /// Split records that would be stored for an expense.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitPlanResponse {
        pub split_type: SplitType,
        pub amount: Decimal,
        pub paid_by: String,
        pub splits: Vec<ShareView>,
        /// What the payer keeps for themselves (their share plus rounding).
        pub absorbed_by_payer: Decimal,
    }
}
