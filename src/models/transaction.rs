use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::util::{parse_money, sanitize_text};

pub(crate) const NOTE_MAX: usize = 80;
pub(crate) const CATEGORY_MAX: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TxnType {
    Income,
    Expense,
}

impl TxnType {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Strict parse: only the exact lowercase names are accepted.
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Lenient coercion used by CSV import: anything that is not exactly
    /// `income` is an expense.
    pub(crate) fn coerce(s: &str) -> Self {
        if s == "income" {
            Self::Income
        } else {
            Self::Expense
        }
    }
}

impl std::fmt::Display for TxnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger record. An empty `id` marks a record the store has not yet
/// assigned an identity to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Transaction {
    #[serde(default)]
    pub id: String,
    pub date: String,
    pub note: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TxnType,
    pub category: String,
    #[serde(default)]
    pub savings: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShapeError {
    InvalidDate,
    InvalidType,
    InvalidAmount,
    InvalidSavings,
    MissingCategory,
    MissingNote,
}

impl ShapeError {
    pub(crate) fn msg(&self) -> &'static str {
        match self {
            Self::InvalidDate => "Invalid date",
            Self::InvalidType => "Invalid type",
            Self::InvalidAmount => "Invalid amount",
            Self::InvalidSavings => "Invalid savings",
            Self::MissingCategory => "Category required",
            Self::MissingNote => "Note required",
        }
    }
}

impl std::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.msg())
    }
}

impl std::error::Error for ShapeError {}

/// Raw form input, before the shape check has run.
#[derive(Debug, Clone, Default)]
pub(crate) struct TxnForm {
    pub id: Option<String>,
    pub date: String,
    pub note: String,
    pub amount: f64,
    pub kind: String,
    pub category: String,
    pub savings: f64,
}

impl TxnForm {
    /// Build a form from raw field strings, applying the same field
    /// preparation the submit path applies: note capped at 80 chars,
    /// category at 40, savings parsed only for income records.
    pub(crate) fn from_raw(
        id: Option<String>,
        date: &str,
        note: &str,
        amount: &str,
        kind: &str,
        category: &str,
        savings: &str,
    ) -> Self {
        let savings = if kind == "income" {
            let raw = if savings.trim().is_empty() { "0" } else { savings };
            parse_money(raw)
        } else {
            0.0
        };
        Self {
            id,
            date: date.to_string(),
            note: sanitize_text(note, NOTE_MAX),
            amount: parse_money(amount),
            kind: kind.to_string(),
            category: sanitize_text(category, CATEGORY_MAX),
            savings,
        }
    }

    /// Check the form against the record shape rules, in a fixed order.
    /// The first failing rule wins; later rules are not evaluated.
    pub(crate) fn validate(&self) -> Result<Transaction, ShapeError> {
        if !date_pattern().is_match(&self.date) {
            return Err(ShapeError::InvalidDate);
        }
        let kind = TxnType::parse(&self.kind).ok_or(ShapeError::InvalidType)?;
        if !self.amount.is_finite() {
            return Err(ShapeError::InvalidAmount);
        }
        if kind == TxnType::Income && !self.savings.is_finite() {
            return Err(ShapeError::InvalidSavings);
        }
        if self.category.is_empty() {
            return Err(ShapeError::MissingCategory);
        }
        if self.note.is_empty() {
            return Err(ShapeError::MissingNote);
        }
        Ok(Transaction {
            id: self.id.clone().unwrap_or_default(),
            date: self.date.clone(),
            note: self.note.clone(),
            amount: self.amount,
            kind,
            category: self.category.clone(),
            savings: if kind == TxnType::Income {
                self.savings
            } else {
                0.0
            },
        })
    }
}

#[allow(clippy::unwrap_used)]
fn date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap())
}
