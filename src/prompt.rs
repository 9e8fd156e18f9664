use async_trait::async_trait;
use dialoguer::{theme::ColorfulTheme, Input};

use crate::error::AuthError;

/// Source of answers to the interactive questions.
#[async_trait]
pub trait Prompt: Send {
    /// Asks a free-text question. An empty answer is returned as-is.
    async fn ask(&mut self, question: &str) -> Result<String, AuthError>;

    /// Asks a `(y/N)` question; only `y` counts as yes.
    async fn confirm(&mut self, question: &str) -> Result<bool, AuthError> {
        let answer = self.ask(&format!("{question} (y/N)")).await?;
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}

/// Prompts on the controlling terminal.
///
/// Reads happen on the blocking pool so that Ctrl-C stays observable while a
/// question is waiting for input.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

#[async_trait]
impl Prompt for TerminalPrompt {
    async fn ask(&mut self, question: &str) -> Result<String, AuthError> {
        let question = question.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt(question)
                .allow_empty(true)
                .interact_text()
        })
        .await
        .map_err(|e| AuthError::Prompt(std::io::Error::other(e)))??;

        Ok(answer)
    }
}
