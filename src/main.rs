use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use command::{handler, Invocation, USAGE};
use wandbox::Wandbox;

mod command;
mod language;
mod render;
mod wandbox;

const USAGE_STATUS: u8 = 2;

/// On a usage error the message and usage text go to `err` and the exit
/// status is returned instead.
fn parse_or_usage<W: Write>(args: &[String], err: &mut W) -> Result<Invocation, u8> {
    Invocation::parse(args).map_err(|error| {
        // nothing sensible is left to do if stderr is gone
        let _ = writeln!(err, "{}\n{}", error, USAGE);
        USAGE_STATUS
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<ExitCode> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = match parse_or_usage(&args, &mut io::stderr()) {
        Ok(invocation) => invocation,
        Err(status) => return Ok(ExitCode::from(status)),
    };

    let wandbox = Wandbox::from_env()?;
    handler::dispatch(&invocation, &wandbox, &mut io::stdout()).await?;
    Ok(ExitCode::SUCCESS)
}
