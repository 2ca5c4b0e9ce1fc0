use std::{error::Error, fs, path::PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use ledger::{
    GroupSnapshot, MemberId, Money,
    splits::{self, PlanMode, Share, SplitRule},
};

mod report;
mod settings;

type ResultApp<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "rateio")]
#[command(about = "Balances and debt netting for shared-expense groups")]
struct Cli {
    /// Settings file (defaults to `settings.toml` in the working directory, if present).
    #[arg(long, env = "RATEIO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Per-member balances and net debts of a group.
    Balances(SnapshotArgs),
    /// Group roster with roles.
    Members(SnapshotArgs),
    /// Checks whether a member can be removed from a group.
    RemovalCheck(RemovalArgs),
    /// Plans the split records of an expense.
    Split(SplitArgs),
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    /// Group snapshot as JSON.
    #[arg(long)]
    snapshot: PathBuf,
}

#[derive(Args, Debug)]
struct RemovalArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,
    /// Member id.
    #[arg(long)]
    member: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RuleKind {
    Equal,
    Single,
    Custom,
}

#[derive(Args, Debug)]
struct SplitArgs {
    #[arg(long, value_parser = parse_money)]
    amount: Money,
    /// Member id of the payer.
    #[arg(long)]
    payer: String,
    #[arg(long, value_enum, default_value = "equal")]
    rule: RuleKind,
    /// Participant of an equal split (repeatable).
    #[arg(long = "participant")]
    participants: Vec<String>,
    /// Debtor of a single split.
    #[arg(long)]
    debtor: Option<String>,
    /// Custom share as `member=amount` (repeatable).
    #[arg(long = "share", value_parser = parse_share)]
    shares: Vec<Share>,
    /// Amend an existing expense: skips the checks done on creation.
    #[arg(long)]
    amend: bool,
}

fn parse_money(raw: &str) -> Result<Money, String> {
    raw.parse::<Money>().map_err(|err| err.to_string())
}

fn parse_share(raw: &str) -> Result<Share, String> {
    let (member, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected member=amount, got {raw}"))?;
    Ok(Share::new(member.trim(), parse_money(amount)?))
}

fn main() -> ResultApp<()> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "rateio={level},ledger={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command, &settings) {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(err) => {
            tracing::error!("{err}");
            Err(err)
        }
    }
}

fn run(command: Command, settings: &settings::Settings) -> ResultApp<String> {
    let output = match command {
        Command::Balances(args) => {
            let snapshot = load_snapshot(&args)?;
            let ledger = ledger::compute(&snapshot);
            report::balances(&snapshot, &ledger, &settings.report)?
        }
        Command::Members(args) => {
            let snapshot = load_snapshot(&args)?;
            report::members(&snapshot, &settings.report)?
        }
        Command::RemovalCheck(args) => {
            let snapshot = load_snapshot(&args.snapshot)?;
            let member = MemberId::new(args.member);
            if !snapshot.is_member(&member) {
                return Err(ledger::LedgerError::UnknownMember(member.to_string()).into());
            }
            let check = ledger::compute(&snapshot).removal_check(&member);
            tracing::info!(member = %member, balance = %check.balance, safe = check.is_safe(), "removal check");
            report::removal(&snapshot, &check, &settings.report)?
        }
        Command::Split(args) => {
            let payer = MemberId::new(args.payer);
            let rule = match args.rule {
                RuleKind::Equal => SplitRule::Equal {
                    participants: args.participants.into_iter().map(MemberId::new).collect(),
                },
                RuleKind::Single => SplitRule::Single {
                    debtor: args.debtor.map(MemberId::new),
                },
                RuleKind::Custom => SplitRule::Custom {
                    shares: args.shares,
                },
            };
            let mode = if args.amend {
                PlanMode::Amend
            } else {
                PlanMode::Create
            };
            let shares = splits::plan(args.amount, &payer, &rule, mode)?;
            report::split_plan(args.amount, &payer, &rule, &shares, &settings.report)?
        }
    };
    Ok(output)
}

fn load_snapshot(args: &SnapshotArgs) -> ResultApp<GroupSnapshot> {
    let raw = fs::read_to_string(&args.snapshot)?;
    let snapshot: GroupSnapshot = serde_json::from_str(&raw)?;
    snapshot.validate()?;
    tracing::info!(
        path = %args.snapshot.display(),
        group = %snapshot.group.name,
        members = snapshot.roster.len(),
        expenses = snapshot.expenses.len(),
        payments = snapshot.payments.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn share_needs_member_and_amount() {
        assert_eq!(
            parse_share(" bob = 12,50").unwrap(),
            Share::new("bob", Money::new(dec!(12.50)))
        );
        assert_eq!(
            parse_share("bob").unwrap_err(),
            "expected member=amount, got bob"
        );
        assert_eq!(
            parse_share("bob=1.23456").unwrap_err(),
            "Invalid amount: too many decimals"
        );
        assert!(parse_share("bob=").is_err());
    }

    #[test]
    fn money_argument_is_parsed() {
        assert_eq!(parse_money("90").unwrap(), Money::new(dec!(90)));
        assert!(parse_money("ninety").is_err());
    }

    #[test]
    fn cli_builds_a_custom_split() {
        let cli = Cli::try_parse_from([
            "rateio",
            "split",
            "--amount",
            "100",
            "--payer",
            "ana",
            "--rule",
            "custom",
            "--share",
            "bia=60",
            "--share",
            "caio=40",
        ])
        .unwrap();

        let Command::Split(args) = cli.command else {
            panic!("expected the split subcommand");
        };
        assert!(matches!(args.rule, RuleKind::Custom));
        assert_eq!(args.shares.len(), 2);
        assert!(!args.amend);
        let malformed = [
            "rateio", "split", "--amount", "1", "--payer", "ana", "--share", "bia",
        ];
        assert!(Cli::try_parse_from(malformed).is_err());
    }
}
