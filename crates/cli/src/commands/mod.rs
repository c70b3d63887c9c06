pub mod configure;
pub mod tidy;

use anyhow::Result;
use std::io::{self, Write};

/// Print `prompt` and read one trimmed line from stdin
pub(crate) fn read_input(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
