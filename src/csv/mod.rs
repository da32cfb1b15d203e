//! Hand-rolled CSV codec for the ledger's row shape.
//!
//! Import is deliberately lenient: malformed fields are coerced to
//! best-effort defaults row by row rather than rejecting the batch, so
//! one bad line never loses the rest of the file.

use std::collections::HashMap;

use crate::models::{Transaction, TxnType};
use crate::store::new_id;

const HEADER: [&str; 7] = ["id", "date", "note", "type", "category", "amount", "savings"];

/// Serialize transactions in the order given (store order, not
/// re-sorted). Fields containing a comma, quote, or newline are quoted
/// with internal quotes doubled; everything else is written bare.
pub(crate) fn export_csv(txns: &[Transaction]) -> String {
    let mut lines = Vec::with_capacity(txns.len() + 1);
    lines.push(HEADER.join(","));
    for t in txns {
        let fields = [
            escape(&t.id),
            escape(&t.date),
            escape(&t.note),
            escape(t.kind.as_str()),
            escape(&t.category),
            escape(&t.amount.to_string()),
            escape(&t.savings.to_string()),
        ];
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Parse CSV text into ledger records. Carriage returns are dropped,
/// empty lines skipped, and the first line is the header (column names
/// matched case-insensitively, whitespace ignored). Each row gets the
/// import coercions: generated id when missing, date cut to 10 chars,
/// "General" category fallback, income only on exact type match, and
/// unparsable numbers read as 0.
pub(crate) fn parse_transactions(text: &str) -> Vec<Transaction> {
    let normalized = text.replace('\r', "");
    let lines: Vec<&str> = normalized.split('\n').filter(|l| !l.is_empty()).collect();
    if lines.is_empty() {
        return Vec::new();
    }

    let columns: HashMap<String, usize> = lines[0]
        .split(',')
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect();

    lines[1..]
        .iter()
        .map(|line| {
            let fields = split_fields(line);
            let get = |name: &str| -> &str {
                columns
                    .get(name)
                    .and_then(|&i| fields.get(i))
                    .map(String::as_str)
                    .unwrap_or("")
            };

            let id = match get("id") {
                "" => new_id(),
                other => other.to_string(),
            };
            let category = match get("category").trim() {
                "" => "General".to_string(),
                other => other.to_string(),
            };
            Transaction {
                id,
                date: get("date").chars().take(10).collect(),
                note: get("note").trim().to_string(),
                amount: parse_number(get("amount")),
                kind: TxnType::coerce(get("type")),
                category,
                savings: parse_number(get("savings")),
            }
        })
        .collect()
}

fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse().unwrap_or(0.0)
}

/// Split one line into fields with a two-state automaton. Outside
/// quotes, `,` ends a field and `"` opens a quoted run; inside quotes a
/// doubled `""` is a literal quote, a lone `"` closes the run, and
/// every other character (commas included) is literal.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if quoted {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    cur.push('"');
                    chars.next();
                } else {
                    quoted = false;
                }
            } else {
                cur.push(ch);
            }
        } else {
            match ch {
                '"' => quoted = true,
                ',' => fields.push(std::mem::take(&mut cur)),
                _ => cur.push(ch),
            }
        }
    }
    fields.push(cur);
    fields
}
