//! Derived metrics over a queried transaction set: month summary,
//! budget progress, and the daily trend series a chart consumer draws
//! from. Nothing here renders; it only produces numbers and scales.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{Transaction, TxnType};
use crate::util::nice_ceil;

/// Totals for one queried month.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MonthSummary {
    pub income: f64,
    pub expenses: f64,
    pub savings_total: f64,
    pub balance: f64,
    /// Expense totals per category, ordered lexicographically by name.
    /// Income rows never contribute here.
    pub category_totals: Vec<(String, f64)>,
}

pub(crate) fn summarize(txns: &[Transaction]) -> MonthSummary {
    let mut income = 0.0;
    let mut expenses = 0.0;
    let mut savings_total = 0.0;
    let mut cats: BTreeMap<String, f64> = BTreeMap::new();

    for t in txns {
        match t.kind {
            TxnType::Income => {
                income += t.amount;
                savings_total += t.savings;
            }
            TxnType::Expense => {
                expenses += t.amount;
                *cats.entry(t.category.clone()).or_insert(0.0) += t.amount;
            }
        }
    }

    MonthSummary {
        income,
        expenses,
        savings_total,
        balance: income - expenses,
        category_totals: cats.into_iter().collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BudgetStatus {
    /// No budget set for the month; the percentage is meaningless.
    NoBudget,
    OnTrack,
    /// Spent more than 80% of the budget but not over it.
    Near,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BudgetProgress {
    /// Spent percentage, rounded and capped at 100.
    pub percent: u8,
    pub status: BudgetStatus,
}

pub(crate) fn budget_progress(expenses: f64, budget: f64) -> BudgetProgress {
    if budget <= 0.0 {
        return BudgetProgress {
            percent: 0,
            status: BudgetStatus::NoBudget,
        };
    }
    let percent = ((expenses / budget) * 100.0).round().clamp(0.0, 100.0) as u8;
    let status = if expenses > budget {
        BudgetStatus::Over
    } else if expenses > 0.8 * budget {
        BudgetStatus::Near
    } else {
        BudgetStatus::OnTrack
    };
    BudgetProgress { percent, status }
}

/// Chart-ready daily series for one month. Index 0 is day 1; both
/// arrays span the month's calendar length.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrendSeries {
    pub daily_expense: Vec<f64>,
    pub daily_savings: Vec<f64>,
    /// Nice upper bound covering the larger of the two series.
    pub y_max: f64,
    /// Axis tick values at 0%, 25%, 50%, 75%, and 100% of `y_max`.
    pub ticks: [f64; 5],
}

pub(crate) fn trend_series(txns: &[Transaction], month: &str) -> TrendSeries {
    let days = days_in_month(month).unwrap_or(0) as usize;
    let mut daily_expense = vec![0.0; days];
    let mut daily_savings = vec![0.0; days];

    for t in txns {
        // Day number comes from the date's last two characters; the
        // stored format is always YYYY-MM-DD, and anything else lands
        // outside 1..=days and is skipped.
        let day = day_of(&t.date);
        if day < 1 || day > days {
            continue;
        }
        match t.kind {
            TxnType::Expense => daily_expense[day - 1] += t.amount,
            TxnType::Income => daily_savings[day - 1] += t.savings,
        }
    }

    let max_val = daily_expense
        .iter()
        .chain(daily_savings.iter())
        .fold(0.0f64, |mx, v| mx.max(*v));
    let y_max = nice_ceil(max_val);
    let ticks = [0.0, 0.25 * y_max, 0.5 * y_max, 0.75 * y_max, y_max];

    TrendSeries {
        daily_expense,
        daily_savings,
        y_max,
        ticks,
    }
}

/// Calendar length of a `YYYY-MM` month (leap years included), computed
/// as the day before the first of the next month. `None` when the month
/// string does not name a real month.
pub(crate) fn days_in_month(month: &str) -> Option<u32> {
    let (y, m) = month.split_once('-')?;
    let year: i32 = y.parse().ok()?;
    let mon: u32 = m.parse().ok()?;
    NaiveDate::from_ymd_opt(year, mon, 1)?;
    let next_first = if mon == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, mon + 1, 1)
    }?;
    Some(next_first.pred_opt()?.day())
}

fn day_of(date: &str) -> usize {
    let count = date.chars().count();
    let tail: String = date.chars().skip(count.saturating_sub(2)).collect();
    tail.parse().unwrap_or(0)
}
