//! CSV export of the transaction history.

use crate::{
    error::{EngineError, EngineResult},
    history::TransactionHistory,
};
use chrono::{NaiveDate, SecondsFormat};
use std::path::Path;

pub const CSV_HEADER: [&str; 7] = ["TX_ID", "Sender", "Receiver", "Amount", "Fraud", "Type", "Timestamp"];

/// Render the history, most-recent-first. An empty history is an error:
/// callers must not produce an empty file.
pub fn history_to_csv(history: &TransactionHistory) -> EngineResult<String> {
    if history.is_empty() {
        return Err(EngineError::NothingToExport);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for tx in history.iter() {
        let amount = tx.amount.to_string();
        let fraud = if tx.is_fraud { "Yes" } else { "No" };
        let kind = match (tx.is_fraud, tx.fraud_type) {
            (true, Some(category)) => category.as_str(),
            (true, None)           => "N/A",
            (false, _)             => "VALID",
        };
        let timestamp = tx.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        writer.write_record([
            tx.id.as_str(),
            tx.sender.as_str(),
            tx.receiver.as_str(),
            amount.as_str(),
            fraud,
            kind,
            timestamp.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| EngineError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| EngineError::Other(anyhow::anyhow!(e)))
}

/// Write the export to `path`. Nothing is created when the history is empty.
pub fn write_history_csv(history: &TransactionHistory, path: &Path) -> EngineResult<usize> {
    let csv = history_to_csv(history)?;
    std::fs::write(path, csv)?;
    Ok(history.len())
}

pub fn default_export_filename(date: NaiveDate) -> String {
    format!("fraudnets_history_{}.csv", date.format("%Y-%m-%d"))
}
