use std::io::{BufRead, Write};

use anyhow::{Context, Result};

pub const INPUT_PROMPT: &str = "Enter the path to your Google Search Console CSV file: ";
pub const TERMS_PROMPT: &str = "Enter branded terms to exclude (comma-separated): ";

pub fn prompt_line<R, W>(prompt: &str, input: &mut R, output: &mut W) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    output
        .write_all(prompt.as_bytes())
        .context("failed to write prompt")?;
    output.flush().context("failed to flush prompt")?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read answer from stdin")?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
