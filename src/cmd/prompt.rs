use std::io::{self, BufRead, Write};

use crate::error::AppResult;
use crate::workflow::catalog::Confirmer;

/// Asks for a single line on stdin; the answer is trimmed.
pub fn ask(label: &str) -> AppResult<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{label}: ")?;
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Uses the flag value when given, otherwise prompts for it.
pub fn value_or_ask(value: Option<String>, label: &str) -> AppResult<String> {
    match value {
        Some(value) => Ok(value),
        None => ask(label),
    }
}

/// Reads multi-line text until an empty line or end of input.
pub fn ask_lines(label: &str) -> AppResult<String> {
    println!("{label} (one per line, empty line to finish):");
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Confirms on stdin; anything but y/yes declines.
pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        match ask(&format!("{prompt} [s/N]")) {
            Ok(answer) => is_yes(&answer),
            Err(err) => {
                tracing::warn!(%err, "could not read confirmation");
                false
            }
        }
    }
}

/// Confirms without asking, for `--yes`.
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sí")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(is_yes("sí"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
