pub(crate) mod persist;

use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::models::Transaction;
use persist::{Backend, Config, Theme, KEY_BUDGETS, KEY_TRANSACTIONS};

/// In-memory ledger of transactions and per-month budgets, persisted
/// through a pluggable backend. The store owns both collections; callers
/// mutate them only through the methods here.
pub(crate) struct Store {
    backend: Box<dyn Backend>,
    txns: Vec<Transaction>,
    budgets: HashMap<String, f64>,
    config: Config,
}

impl Store {
    /// Load the persisted state. Missing or corrupt data degrades to
    /// empty collections so the ledger stays usable.
    pub(crate) fn open(backend: Box<dyn Backend>) -> Self {
        let txns = backend
            .load(KEY_TRANSACTIONS)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        let budgets = backend
            .load(KEY_BUDGETS)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        let config = Config::load(backend.as_ref());
        Self {
            backend,
            txns,
            budgets,
            config,
        }
    }

    // ── Transactions ──────────────────────────────────────────

    /// Transactions whose date starts with `month` (all of them when no
    /// filter is given), sorted by date ascending with ties broken by id.
    pub(crate) fn list_txns(&self, month: Option<&str>) -> Vec<Transaction> {
        let mut out: Vec<Transaction> = self
            .txns
            .iter()
            .filter(|t| month.map_or(true, |m| t.date.starts_with(m)))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        out
    }

    /// Replace the record matching `txn.id` wholesale, or assign a fresh
    /// id and append when the id is empty. Shape validation is the
    /// caller's responsibility; the store only files what it is given.
    pub(crate) fn upsert_txn(&mut self, mut txn: Transaction) -> Result<Transaction> {
        if txn.id.is_empty() {
            txn.id = new_id();
            self.txns.push(txn.clone());
        } else if let Some(slot) = self.txns.iter_mut().find(|t| t.id == txn.id) {
            *slot = txn.clone();
        }
        self.save_txns()?;
        Ok(txn)
    }

    /// Remove the record with the given id; unknown ids are a no-op.
    pub(crate) fn delete_txn(&mut self, id: &str) -> Result<()> {
        self.txns.retain(|t| t.id != id);
        self.save_txns()
    }

    /// Merge records into the ledger by id: an existing id is replaced
    /// in place, a new id is appended. Returns (added, replaced).
    pub(crate) fn merge_txns(&mut self, records: Vec<Transaction>) -> Result<(usize, usize)> {
        let mut added = 0;
        let mut replaced = 0;
        for txn in records {
            if let Some(slot) = self.txns.iter_mut().find(|t| t.id == txn.id) {
                *slot = txn;
                replaced += 1;
            } else {
                self.txns.push(txn);
                added += 1;
            }
        }
        self.save_txns()?;
        Ok((added, replaced))
    }

    /// All transactions in store (insertion) order, unsorted. Export
    /// serializes this order.
    pub(crate) fn all_txns(&self) -> &[Transaction] {
        &self.txns
    }

    // ── Budgets ───────────────────────────────────────────────

    /// The month's budget, or 0 when none has been set.
    pub(crate) fn get_budget(&self, month: &str) -> f64 {
        self.budgets.get(month).copied().unwrap_or(0.0)
    }

    /// Set the month's budget, clamping to zero when the amount is
    /// negative or not finite. Returns the stored value.
    pub(crate) fn set_budget(&mut self, month: &str, amount: f64) -> Result<f64> {
        let clamped = if amount.is_finite() {
            amount.max(0.0)
        } else {
            0.0
        };
        self.budgets.insert(month.to_string(), clamped);
        let raw = serde_json::to_string(&self.budgets).context("Failed to encode budgets")?;
        self.backend.save(KEY_BUDGETS, &raw)?;
        Ok(clamped)
    }

    // ── Configuration ─────────────────────────────────────────

    pub(crate) fn theme(&self) -> Theme {
        self.config.theme
    }

    pub(crate) fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.config.theme = theme;
        self.config.persist(self.backend.as_ref())
    }

    fn save_txns(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.txns).context("Failed to encode transactions")?;
        self.backend.save(KEY_TRANSACTIONS, &raw)
    }
}

/// A fresh record id: a random component plus a millisecond timestamp,
/// unique across the store's lifetime with overwhelming probability.
pub(crate) fn new_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    format!("{}{millis:x}", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests;
