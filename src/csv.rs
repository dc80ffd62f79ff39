use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::machine::Receipt;
use crate::model::{MachineState, Stock};
use crate::{Amount, Command};

/// Errors that can occur when reading csv rows
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized operation '{op}'")]
    UnrecognizedOp { line: usize, op: String },

    #[error("line {line}: {op} missing value")]
    MissingValue { line: usize, op: String },

    #[error("line {line}: {op} value {value} out of range")]
    ValueOutOfRange { line: usize, op: String, value: u64 },

    #[error("failed to write receipt: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to flush receipts: {0}")]
    Flush(#[from] io::Error),
}

#[derive(Debug, Deserialize)]
struct InputRow {
    op: String,
    value: Option<u64>,
}

#[derive(Debug, Serialize)]
struct OutputRow {
    op: &'static str,
    outcome: &'static str,
    detail: Option<Amount>,
    state: MachineState,
    stock: Stock,
    credit: Amount,
}

/// Read commands from a csv file with an `op,value` header
pub fn read_commands(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Command, CsvError>>, CsvError> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.display().to_string(),
            source,
        })?;

    Ok(reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            parse_row(line, row)
        }))
}

fn parse_row(line: usize, row: InputRow) -> Result<Command, CsvError> {
    let op = row.op.to_ascii_lowercase();
    let value = |op: &str| {
        row.value.ok_or_else(|| CsvError::MissingValue {
            line,
            op: op.to_string(),
        })
    };

    match op.as_str() {
        "insert" => Ok(Command::InsertCredit {
            amount: Amount::new(value("insert")?),
        }),
        "dispense" => Ok(Command::RequestDispense),
        "eject" => Ok(Command::EjectCredit),
        "refill" => {
            let value = value("refill")?;
            let count = Stock::try_from(value).map_err(|_| CsvError::ValueOutOfRange {
                line,
                op: "refill".to_string(),
                value,
            })?;
            Ok(Command::Refill { count })
        }
        _ => Err(CsvError::UnrecognizedOp { line, op: row.op }),
    }
}

/// Writes one csv row per receipt.
pub struct ReceiptWriter<W: io::Write> {
    writer: csv::Writer<W>,
}

impl<W: io::Write> ReceiptWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    pub fn write(&mut self, receipt: &Receipt) -> Result<(), CsvError> {
        let (outcome, detail) = match &receipt.result {
            Ok(outcome) => (outcome.label(), outcome.detail()),
            Err(_) => ("invalid", None),
        };
        let snapshot = receipt.snapshot;
        self.writer.serialize(OutputRow {
            op: receipt.command.name(),
            outcome,
            detail,
            state: snapshot.state(),
            stock: snapshot.stock(),
            credit: snapshot.credit(),
        })?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<W, CsvError> {
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| CsvError::Flush(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{InsertError, MachineError, Snapshot};
    use crate::model::{DispenseOutcome, Outcome};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn read(content: &str) -> Vec<Result<Command, CsvError>> {
        let file = write_csv(content);
        read_commands(file.path()).unwrap().collect()
    }

    #[test]
    fn read_all_operations() {
        let results = read("op,value\ninsert,30\ndispense,\neject\nrefill,5\n");
        let commands: Vec<Command> = results.into_iter().map(Result::unwrap).collect();
        assert_eq!(
            commands,
            vec![
                Command::InsertCredit {
                    amount: Amount::new(30)
                },
                Command::RequestDispense,
                Command::EjectCredit,
                Command::Refill { count: 5 },
            ]
        );
    }

    #[test]
    fn read_with_whitespace_and_case() {
        let results = read("op, value\n INSERT , 10\n");
        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0],
            Ok(Command::InsertCredit { amount }) if amount == Amount::new(10)
        ));
    }

    #[test]
    fn read_zero_value_is_left_to_the_machine() {
        let results = read("op,value\ninsert,0\n");
        assert!(matches!(
            results[0],
            Ok(Command::InsertCredit { amount }) if amount.is_zero()
        ));
    }

    #[test]
    fn read_returns_error_for_unknown_op() {
        let results = read("op,value\nkick,1\n");
        let err = results[0].as_ref().unwrap_err();
        assert!(matches!(err, CsvError::UnrecognizedOp { line: 2, .. }));
    }

    #[test]
    fn read_returns_error_for_missing_value() {
        let results = read("op,value\ndispense,\nrefill,\n");
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert!(matches!(err, CsvError::MissingValue { line: 3, .. }));
    }

    #[test]
    fn read_returns_error_for_negative_value() {
        let results = read("op,value\ninsert,-5\n");
        let err = results[0].as_ref().unwrap_err();
        assert!(matches!(err, CsvError::Parse { line: 2, .. }));
    }

    #[test]
    fn read_returns_error_for_oversized_refill() {
        let results = read("op,value\nrefill,5000000000\n");
        let err = results[0].as_ref().unwrap_err();
        assert!(matches!(err, CsvError::ValueOutOfRange { line: 2, .. }));
    }

    #[test]
    fn open_missing_file_fails() {
        let result = read_commands("/nonexistent/commands.csv");
        assert!(matches!(result, Err(CsvError::Open { .. })));
    }

    #[test]
    fn write_receipts() {
        let mut writer = ReceiptWriter::new(Vec::new());
        writer
            .write(&Receipt {
                command: Command::RequestDispense,
                result: Ok(Outcome::Dispense(DispenseOutcome::Dispensed {
                    change: Amount::new(10),
                })),
                snapshot: Snapshot::with_stock(0),
            })
            .unwrap();
        writer
            .write(&Receipt {
                command: Command::InsertCredit {
                    amount: Amount::ZERO,
                },
                result: Err(MachineError::Insert(InsertError::ZeroAmount)),
                snapshot: Snapshot::with_stock(2),
            })
            .unwrap();

        let output = String::from_utf8(writer.finish().unwrap()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "op,outcome,detail,state,stock,credit");
        assert_eq!(lines[1], "dispense,dispensed,10,out_of_stock,0,0");
        assert_eq!(lines[2], "insert,invalid,,idle,2,0");
    }
}
