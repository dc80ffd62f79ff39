use std::io;
use std::process::ExitCode;

use clap::Parser;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use vend_eng::config::Cli;
use vend_eng::Receipt;
use vend_eng::csv::{CsvError, ReceiptWriter, read_commands};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.commands.extension().is_none_or(|ext| ext != "csv") {
        warn!(path = %cli.commands.display(), "input file seems to not be a csv file");
    }

    let mut machine = match cli.controller() {
        Ok(machine) => machine,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let commands = match read_commands(cli.commands.clone()) {
        Ok(commands) => commands,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let (cmd_sender, cmd_receiver) = tokio::sync::mpsc::channel(16);

    tokio::task::spawn_blocking(move || {
        for result in commands {
            match result {
                Ok(command) => {
                    if cmd_sender.blocking_send(command).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    let receipts = machine.run(ReceiverStream::new(cmd_receiver)).await;

    match write_receipts(&receipts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Write receipts to stdout in csv format
fn write_receipts(receipts: &[Receipt]) -> Result<(), CsvError> {
    let mut writer = ReceiptWriter::new(io::stdout().lock());
    for receipt in receipts {
        writer.write(receipt)?;
    }
    writer.finish()?;
    Ok(())
}
