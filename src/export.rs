//! CSV export of transaction lists.

use crate::model::Transaction;
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;

const HEADERS: [&str; 5] = ["Date", "Description", "Category", "Type", "Amount"];

/// Writes `transactions` as CSV to `writer`, one row per transaction plus a header row. Amounts
/// are written with two decimal places; quoting and escaping follow CSV conventions.
pub fn write_transactions_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(HEADERS)
        .context("failed to write CSV header")?;
    for transaction in transactions {
        csv_writer
            .write_record([
                transaction.date.to_string(),
                transaction.description.clone(),
                transaction.category.clone(),
                transaction.kind.to_string(),
                format!("{:.2}", transaction.amount.value()),
            ])
            .with_context(|| format!("failed to write CSV row for {}", transaction.id))?;
    }
    csv_writer.flush().context("failed to flush CSV output")?;
    Ok(())
}

/// Writes `transactions` as CSV to a new file at `path`.
pub async fn write_transactions_csv_file(path: &Path, transactions: &[Transaction]) -> Result<()> {
    let mut buffer = Vec::new();
    write_transactions_csv(&mut buffer, transactions)?;
    tokio::fs::write(path, buffer)
        .await
        .with_context(|| format!("unable to write to {}", path.display()))
}

/// The download file name used for an export created on `today`, e.g.
/// `transactions_2024-03-15.csv`.
pub fn csv_file_name(today: NaiveDate) -> String {
    format!("transactions_{today}.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Transaction, TransactionKind};
    use crate::test::date;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn transaction(description: &str, amount: Amount, kind: TransactionKind) -> Transaction {
        Transaction {
            id: "t1".to_string(),
            owner_id: "owner-1".to_string(),
            amount,
            category: "Groceries".to_string(),
            description: description.to_string(),
            kind,
            date: date(2024, 3, 15),
            created_at: Utc::now(),
        }
    }

    fn export_to_string(transactions: &[Transaction]) -> String {
        let mut buffer = Vec::new();
        write_transactions_csv(&mut buffer, transactions).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_header_only_for_empty_list() {
        let csv = export_to_string(&[]);
        assert_eq!(csv, "Date,Description,Category,Type,Amount\n");
    }

    #[test]
    fn test_row_content() {
        let csv = export_to_string(&[transaction(
            "Weekly shop",
            Amount::new(dec!(87.4)),
            TransactionKind::Expense,
        )]);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Date,Description,Category,Type,Amount");
        assert_eq!(lines.next().unwrap(), "2024-03-15,Weekly shop,Groceries,expense,87.40");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_description_with_comma_and_quotes_is_escaped() {
        let csv = export_to_string(&[transaction(
            "Groceries, \"fancy\" ones",
            Amount::new(dec!(10)),
            TransactionKind::Expense,
        )]);
        assert!(csv.contains("\"Groceries, \"\"fancy\"\" ones\""));
    }

    #[tokio::test]
    async fn test_write_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(csv_file_name(date(2024, 3, 15)));
        let rows = [transaction(
            "Paycheck",
            Amount::new(dec!(2500)),
            TransactionKind::Income,
        )];
        write_transactions_csv_file(&path, &rows).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Paycheck"));
        assert!(content.contains("income"));
        assert!(content.contains("2500.00"));
    }

    #[test]
    fn test_csv_file_name() {
        assert_eq!(csv_file_name(date(2024, 1, 5)), "transactions_2024-01-05.csv");
    }
}
