//! Interactive overwrite confirmation on stdin.

use async_trait::async_trait;
use dbscaffold_core::emit::OverwritePrompt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const YES_ANSWERS: &[&str] = &["y", "yes"];
const NO_ANSWERS: &[&str] = &["n", "no"];

/// Asks on the terminal before replacing an existing file.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

#[async_trait]
impl OverwritePrompt for StdinPrompt {
    async fn confirm_overwrite(&self, path: &Path) -> bool {
        let path: PathBuf = path.to_path_buf();
        let answer = tokio::task::spawn_blocking(move || {
            let mut stderr = io::stderr();
            // Prompt failures are treated as "no"
            let _ = write!(stderr, "'{}' already exists. Overwrite? [yes|no] ", path.display());
            let _ = stderr.flush();
            ask_for_confirmation(&mut io::stdin().lock(), &mut stderr)
        })
        .await;

        match answer {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                tracing::warn!("Could not read overwrite answer: {}", e);
                false
            }
            Err(e) => {
                tracing::warn!("Overwrite prompt failed: {}", e);
                false
            }
        }
    }
}

/// Reads lines until the answer is yes or no, asking again otherwise.
///
/// End of input counts as no.
pub fn ask_for_confirmation<R, W>(input: &mut R, output: &mut W) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        let answer = line.trim().to_lowercase();
        if YES_ANSWERS.contains(&answer.as_str()) {
            return Ok(true);
        }
        if NO_ANSWERS.contains(&answer.as_str()) {
            return Ok(false);
        }
        writeln!(output, "Please type yes or no and then press enter:")?;
        output.flush()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answer(input: &str) -> (bool, String) {
        let mut output = Vec::new();
        let result = ask_for_confirmation(&mut Cursor::new(input), &mut output).unwrap();
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_yes_and_no() {
        assert!(answer("y\n").0);
        assert!(answer("YES\n").0);
        assert!(!answer("n\n").0);
        assert!(!answer("No\n").0);
    }

    #[test]
    fn test_asks_again_on_other_input() {
        let (result, output) = answer("maybe\n\nyes\n");
        assert!(result);
        assert_eq!(output.matches("Please type yes or no").count(), 2);
    }

    #[test]
    fn test_end_of_input_declines() {
        assert!(!answer("").0);
        assert!(!answer("perhaps\n").0);
    }
}
