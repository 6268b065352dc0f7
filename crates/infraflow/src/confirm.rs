use async_trait::async_trait;
use colored::Colorize;
use infraflow_core::Confirmation;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Reads the answer from the terminal
pub struct StdinConfirmation;

#[async_trait]
impl Confirmation for StdinConfirmation {
    async fn ask(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt.yellow().bold());
        if let Err(e) = std::io::stdout().flush() {
            tracing::debug!(error = %e, "Failed to flush the confirmation prompt");
        }

        let mut answer = String::new();
        match BufReader::new(tokio::io::stdin()).read_line(&mut answer).await {
            Ok(0) => None,
            Ok(_) => Some(answer),
            Err(e) => {
                tracing::debug!(error = %e, "Failed to read the confirmation answer");
                None
            }
        }
    }
}
