use anyhow::{Context, Result};
use std::path::Path;

use crate::models::{Transaction, TxnForm};
use crate::report::{self, BudgetStatus};
use crate::store::persist::Theme;
use crate::store::Store;
use crate::util::{current_month, format_amount, today_iso};

pub(crate) fn as_cli(args: &[String], store: &mut Store) -> Result<()> {
    if args.len() < 2 {
        print_usage();
        return Ok(());
    }
    match args[1].as_str() {
        "add" => cli_add(&args[2..], store),
        "edit" => cli_edit(&args[2..], store),
        "delete" | "rm" => cli_delete(&args[2..], store),
        "list" | "ls" => cli_list(&args[2..], store),
        "summary" | "s" => cli_summary(&args[2..], store),
        "trend" => cli_trend(&args[2..], store),
        "budget" => cli_budget(&args[2..], store),
        "import" => cli_import(&args[2..], store),
        "export" => cli_export(&args[2..], store),
        "theme" => cli_theme(&args[2..], store),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("tally {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Tally — local-only personal finance ledger");
    println!();
    println!("Usage: tally <command>");
    println!();
    println!("Commands:");
    println!("  add                           Record a transaction");
    println!("    --note <text>               What it was (required)");
    println!("    --amount <value>            Amount, free-form (\"1,234.56\", \"$40\")");
    println!("    --type <income|expense>     Kind of record (default: expense)");
    println!("    --category <name>           Category (required)");
    println!("    --date <YYYY-MM-DD>         Date (default: today)");
    println!("    --savings <value>           Amount set aside (income only)");
    println!("  edit <id>                     Replace a transaction (same flags as add)");
    println!("  delete <id>                   Remove a transaction");
    println!("  list [YYYY-MM]                List transactions, optionally one month");
    println!("  summary [YYYY-MM]             Monthly totals, budget, category breakdown");
    println!("  trend [YYYY-MM]               Daily expense/savings chart data");
    println!("  budget <YYYY-MM> [amount]     Show or set a month's budget");
    println!("  import <file.csv>             Merge a CSV export into the ledger");
    println!("  export [path]                 Write the ledger as CSV (transactions.csv)");
    println!("  theme [light|dark]            Show or set the display theme");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

/// Shared add/edit form handling: sanitize the raw fields, run the
/// shape check, and file the record. Validation failures surface as the
/// failing rule's message.
fn submit_form(args: &[String], id: Option<String>, store: &mut Store) -> Result<Transaction> {
    let date = flag(args, "--date").map(str::to_string).unwrap_or_else(today_iso);
    let kind = flag(args, "--type").unwrap_or("expense");
    let form = TxnForm::from_raw(
        id,
        &date,
        flag(args, "--note").unwrap_or(""),
        flag(args, "--amount").unwrap_or(""),
        kind,
        flag(args, "--category").unwrap_or(""),
        flag(args, "--savings").unwrap_or(""),
    );
    let txn = match form.validate() {
        Ok(txn) => txn,
        Err(e) => anyhow::bail!("{e}"),
    };
    store.upsert_txn(txn)
}

fn cli_add(args: &[String], store: &mut Store) -> Result<()> {
    let txn = submit_form(args, None, store)?;
    println!(
        "Added {} {} ${} [{}] ({})",
        txn.date,
        txn.note,
        format_amount(txn.amount),
        txn.category,
        txn.id
    );
    Ok(())
}

fn cli_edit(args: &[String], store: &mut Store) -> Result<()> {
    let id = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Usage: tally edit <id> --note ... --amount ..."))?;
    if !store.all_txns().iter().any(|t| t.id == id) {
        anyhow::bail!("No transaction with id {id}");
    }
    let txn = submit_form(&args[1..], Some(id), store)?;
    println!("Updated {} ({})", txn.note, txn.id);
    Ok(())
}

fn cli_delete(args: &[String], store: &mut Store) -> Result<()> {
    let id = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: tally delete <id>"))?;
    store.delete_txn(id)?;
    println!("Deleted {id}");
    Ok(())
}

fn month_arg(args: &[String]) -> String {
    args.first()
        .filter(|a| !a.starts_with('-'))
        .cloned()
        .unwrap_or_else(current_month)
}

fn cli_list(args: &[String], store: &mut Store) -> Result<()> {
    let month = args.first().filter(|a| !a.starts_with('-'));
    let txns = store.list_txns(month.map(String::as_str));
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<12} {:<28} {:<8} {:<16} {:>10} {:>10}",
        "Date", "Note", "Type", "Category", "Amount", "Savings"
    );
    println!("{}", "─".repeat(90));
    for t in &txns {
        println!(
            "{:<12} {:<28} {:<8} {:<16} {:>10} {:>10}  {}",
            t.date,
            crate::util::sanitize_text(&t.note, 28),
            t.kind,
            crate::util::sanitize_text(&t.category, 16),
            format_amount(t.amount),
            format_amount(t.savings),
            t.id,
        );
    }
    println!("{} transaction(s)", txns.len());
    Ok(())
}

fn cli_summary(args: &[String], store: &mut Store) -> Result<()> {
    let month = month_arg(args);
    let txns = store.list_txns(Some(&month));
    let summary = report::summarize(&txns);
    let budget = store.get_budget(&month);
    let progress = report::budget_progress(summary.expenses, budget);

    println!("Tally — {month}");
    println!("{}", "─".repeat(40));
    println!("  Income:     ${}", format_amount(summary.income));
    println!("  Expenses:   ${}", format_amount(summary.expenses));
    println!("  Savings:    ${}", format_amount(summary.savings_total));
    println!("  Balance:    ${}", format_amount(summary.balance));

    match progress.status {
        BudgetStatus::NoBudget => println!("  Budget:     No budget set"),
        status => {
            let tag = match status {
                BudgetStatus::Over => " (over budget)",
                BudgetStatus::Near => " (near budget)",
                _ => "",
            };
            println!(
                "  Budget:     {}% of ${}{tag}",
                progress.percent,
                format_amount(budget)
            );
        }
    }

    if !summary.category_totals.is_empty() {
        println!();
        println!("Spending by Category:");
        for (name, amount) in &summary.category_totals {
            println!("  {name:<24} ${}", format_amount(*amount));
        }
    }

    Ok(())
}

fn cli_trend(args: &[String], store: &mut Store) -> Result<()> {
    let month = month_arg(args);
    let txns = store.list_txns(Some(&month));
    let series = report::trend_series(&txns, &month);
    if series.daily_expense.is_empty() {
        println!("No calendar data for {month}");
        return Ok(());
    }

    println!("Daily trend — {month} (e = expense, s = savings)");
    let ticks: Vec<String> = series
        .ticks
        .iter()
        .map(|v| format!("${}", format_amount(*v)))
        .collect();
    println!("Scale: {}", ticks.join("  "));
    println!("{}", "─".repeat(60));

    // The engine hands out the series and scale; drawing the bars is
    // this consumer's business.
    const WIDTH: f64 = 40.0;
    for (i, (e, s)) in series
        .daily_expense
        .iter()
        .zip(series.daily_savings.iter())
        .enumerate()
    {
        if *e == 0.0 && *s == 0.0 {
            continue;
        }
        let e_bar = "e".repeat(((e / series.y_max) * WIDTH).round() as usize);
        let s_bar = "s".repeat(((s / series.y_max) * WIDTH).round() as usize);
        println!("  {:>2}  {e_bar}{s_bar}", i + 1);
    }
    Ok(())
}

fn cli_budget(args: &[String], store: &mut Store) -> Result<()> {
    let month = args
        .first()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Usage: tally budget <YYYY-MM> [amount]"))?;
    match args.get(1) {
        Some(raw) => {
            let stored = store.set_budget(&month, crate::util::parse_money(raw))?;
            println!("Budget for {month}: ${}", format_amount(stored));
        }
        None => {
            let budget = store.get_budget(&month);
            if budget > 0.0 {
                println!("Budget for {month}: ${}", format_amount(budget));
            } else {
                println!("No budget set for {month}");
            }
        }
    }
    Ok(())
}

fn cli_import(args: &[String], store: &mut Store) -> Result<()> {
    let file_path = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: tally import <file.csv>"))?;
    let path = Path::new(file_path);
    if !path.exists() {
        anyhow::bail!("File not found: {file_path}");
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {file_path}"))?;
    let records = crate::csv::parse_transactions(&text);
    let parsed = records.len();
    let (added, replaced) = store.merge_txns(records)?;
    println!("Imported {added} new transaction(s), updated {replaced} ({parsed} rows parsed)");
    Ok(())
}

fn cli_export(args: &[String], store: &mut Store) -> Result<()> {
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .cloned()
        .unwrap_or_else(|| "transactions.csv".to_string());

    let txns = store.all_txns();
    let csv = crate::csv::export_csv(txns);

    std::fs::write(&output_path, csv)
        .with_context(|| format!("Failed to write {output_path}"))?;
    println!("Exported {} transaction(s) to {output_path}", txns.len());
    Ok(())
}

fn cli_theme(args: &[String], store: &mut Store) -> Result<()> {
    match args.first() {
        Some(raw) => {
            let theme = Theme::parse(raw)
                .ok_or_else(|| anyhow::anyhow!("Unknown theme: {raw} (light|dark)"))?;
            store.set_theme(theme)?;
            println!("Theme set to {theme}");
        }
        None => println!("Theme: {}", store.theme()),
    }
    Ok(())
}
