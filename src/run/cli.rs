use anyhow::Result;
use std::path::Path;

use crate::config::{parse_user, Config};
use crate::db::Database;
use crate::models::UserId;
use crate::parse::format_date;
use crate::report::{MonthlySeries, Summary};
use crate::store::{GroupedFilter, TransactionStore};
use crate::util::{format_amount, truncate};

const RECENT_LIMIT: usize = 20;

pub(crate) fn as_cli(args: &[String], db: Database, config: &Config) -> Result<()> {
    let rest = &args[1..];
    let user = user_flag(rest)?.unwrap_or(config.user);
    match command(rest) {
        "chat" => super::as_chat(db, config, user),
        "summary" | "s" => cli_summary(&db, user),
        "chart" => cli_chart(rest, &db, user),
        "recent" => cli_recent(rest, &db, user),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendless {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Spendless - chat-style personal finance tracker");
    println!();
    println!("Usage: spendless [command]");
    println!();
    println!("Commands:");
    println!("  (none), chat                  Start a conversation on stdin/stdout");
    println!("                                (type #<id> to pick an offered choice)");
    println!("  summary                       Print the balance summary");
    println!("  chart                         Print income, expenses and savings per month");
    println!("    --csv <path>                Export the monthly series as CSV instead");
    println!("  recent                        List the latest records");
    println!("    --installments              Only records that belong to an installment purchase");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Options:");
    println!("  --user <id>                   Act as this user (default: $SPENDLESS_USER or 1)");
}

/// The command word; options alone mean chat.
fn command(args: &[String]) -> &str {
    match args.first().map(String::as_str) {
        None | Some("--user") => "chat",
        Some(word) => word,
    }
}

/// The value after `--user`, if given.
fn user_flag(args: &[String]) -> Result<Option<UserId>> {
    flag(args, "--user").map(parse_user).transpose()
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn cli_summary(db: &Database, user: UserId) -> Result<()> {
    let summary = Summary::for_user(db, user)?;
    println!("{}", summary.render());
    println!();
    println!("  Income:   {}", format_amount(summary.income));
    println!("  Expenses: {}", format_amount(summary.expense));
    Ok(())
}

fn cli_chart(args: &[String], db: &Database, user: UserId) -> Result<()> {
    let series = MonthlySeries::for_user(db, user)?;
    match flag(args, "--csv") {
        Some(path) => {
            let months = series.write_csv(Path::new(path))?;
            println!("Exported {months} months to {path}");
        }
        None => println!("{}", series.render()),
    }
    Ok(())
}

fn cli_recent(args: &[String], db: &Database, user: UserId) -> Result<()> {
    let filter = if args.iter().any(|a| a == "--installments") {
        GroupedFilter::GroupedOnly
    } else {
        GroupedFilter::All
    };
    let records = db.list_recent(user, RECENT_LIMIT, filter)?;
    if records.is_empty() {
        println!("No records yet.");
        return Ok(());
    }
    for r in &records {
        println!(
            "{:>6}  {}  {} {:>14}  {}",
            r.id,
            format_date(r.date),
            r.kind.icon(),
            format_amount(r.amount),
            truncate(&r.description, 40)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_user_flag() {
        assert_eq!(
            user_flag(&args(&["summary", "--user", "9"])).unwrap(),
            Some(UserId(9))
        );
        assert_eq!(user_flag(&args(&["summary"])).unwrap(), None);
        assert!(user_flag(&args(&["summary", "--user", "x"])).is_err());
    }

    #[test]
    fn test_command_defaults_to_chat() {
        assert_eq!(command(&args(&[])), "chat");
        assert_eq!(command(&args(&["--user", "2"])), "chat");
        assert_eq!(command(&args(&["summary", "--user", "2"])), "summary");
        assert_eq!(command(&args(&["recent", "--installments"])), "recent");
    }

    #[test]
    fn test_flag_lookup() {
        let list = args(&["chart", "--csv", "out.csv", "--user", "2"]);
        assert_eq!(flag(&list, "--csv"), Some("out.csv"));
        assert_eq!(flag(&list, "--missing"), None);
        assert_eq!(flag(&args(&["chart", "--csv"]), "--csv"), None);
    }
}
