use std::io::{self, Write};

use crate::wandbox::CompileResult;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Diagnostics in green, runtime errors in red, then the program output after
/// a reset. No newlines are added and nothing follows the program output.
pub fn render<W: Write>(result: &CompileResult, out: &mut W) -> io::Result<()> {
    write!(
        out,
        "{}{}{}{}{}{}",
        GREEN, result.compiler_message, RED, result.program_error, RESET, result.program_output
    )?;
    out.flush()
}
