//! Yes/no confirmation.
//! Interactive terminals get a dialoguer prompt; piped stdin is read as one line.

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::io::{self, BufRead, Write};

/// True only for `y` / `yes`, any case, surrounding whitespace ignored.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Print `question` and read one line from `input`. EOF counts as "no".
pub fn confirm_from<R: BufRead, W: Write>(question: &str, input: &mut R, out: &mut W) -> Result<bool> {
    write!(out, "{question} [y/N] ").context("write prompt")?;
    out.flush().context("flush prompt")?;
    let mut line = String::new();
    let n = input.read_line(&mut line).context("read answer from stdin")?;
    Ok(n > 0 && is_affirmative(&line))
}

pub fn confirm(question: &str) -> Result<bool> {
    if atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stderr) {
        let yes = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(question)
            .default(false)
            .interact()?;
        return Ok(yes);
    }
    let stdin = io::stdin();
    confirm_from(question, &mut stdin.lock(), &mut io::stdout())
}
