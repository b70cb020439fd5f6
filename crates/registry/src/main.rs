mod cli;
mod logging;

use std::fs;
use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use ledger::LedgerDB;
use registry::{execute_block, Invocation, Response};

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    fs::create_dir_all(&cli.data_dir)
        .with_context(|| format!("cannot create {}", cli.data_dir.display()))?;
    let data_dir = cli
        .data_dir
        .to_str()
        .context("data directory must be valid UTF-8")?;
    let mut db = LedgerDB::open(data_dir)?;

    match cli.command {
        Command::Invoke { function, args } => {
            let block = execute_block(&mut db, &[Invocation { function, args }]);
            let response = block
                .responses
                .into_iter()
                .next()
                .context("block produced no response")?;
            print_response(&response)?;
        }
        Command::Block { file } => {
            let raw = fs::read(&file).with_context(|| format!("cannot read {}", file.display()))?;
            let invocations: Vec<Invocation> =
                serde_json::from_slice(&raw).context("invalid invocation file")?;
            let block = execute_block(&mut db, &invocations);
            let mut failed = 0;
            for (invocation, response) in invocations.iter().zip(&block.responses) {
                if response.is_ok() {
                    println!("{}: {}", invocation.function, String::from_utf8_lossy(&response.payload));
                } else {
                    failed += 1;
                    println!("{}: error: {}", invocation.function, response.message);
                }
            }
            println!("version {} app_hash {:x}", block.version, block.app_hash);
            if failed > 0 {
                bail!("{failed} of {} invocations failed", invocations.len());
            }
        }
        Command::Status => {
            println!("version {} app_hash {:x}", db.version(), db.app_hash());
        }
    }

    Ok(())
}

fn print_response(response: &Response) -> Result<()> {
    if !response.is_ok() {
        bail!("{}", response.message);
    }
    let mut stdout = io::stdout().lock();
    stdout.write_all(&response.payload)?;
    if !response.payload.is_empty() {
        writeln!(stdout)?;
    }
    Ok(())
}
