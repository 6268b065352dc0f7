//! Operator confirmation for destructive actions

use async_trait::async_trait;

/// The only answer that lets a destroy proceed
pub const DESTROY_CONFIRMATION_TOKEN: &str = "yes";

#[async_trait]
pub trait Confirmation: Send + Sync {
    /// Show `prompt` and return the operator's answer; `None` when no answer
    /// can be read (closed input)
    async fn ask(&self, prompt: &str) -> Option<String>;
}

/// Exact token match, surrounding whitespace ignored
pub fn is_confirmed(answer: Option<&str>) -> bool {
    answer.is_some_and(|answer| answer.trim() == DESTROY_CONFIRMATION_TOKEN)
}
