//! Interactive prompts with CI/non-interactive fallback
//!
//! Prompts return `None` when the user cancels (Esc / Ctrl-C).

use super::context::UiContext;
use crate::error::{DashError, DashResult};
use std::io;

/// Prompt for selection from a list of options.
///
/// Returns the first option if non-interactive.
pub async fn select<T: Clone + Send + Eq + 'static>(
    ctx: &UiContext,
    message: &str,
    options: &[(T, String, String)], // (value, label, hint)
) -> DashResult<Option<T>> {
    let Some((first, _, _)) = options.first() else {
        return Err(DashError::User(format!("{}: nothing to choose from", message)));
    };

    if !ctx.is_interactive() || options.len() == 1 {
        return Ok(Some(first.clone()));
    }

    let message = message.to_string();
    let items = options.to_vec();

    let result = tokio::task::spawn_blocking(move || {
        let mut select = cliclack::select(&message);
        for (value, label, hint) in items {
            select = select.item(value, label, hint);
        }
        select.interact()
    })
    .await
    .map_err(|e| DashError::Internal(format!("Select task failed: {}", e)))?;

    cancelled_as_none(result)
}

fn cancelled_as_none<T>(result: io::Result<T>) -> DashResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(DashError::User(format!("Prompt failed: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<(String, String, String)> {
        vec![
            ("a".to_string(), "Option A".to_string(), "First".to_string()),
            ("b".to_string(), "Option B".to_string(), "Second".to_string()),
        ]
    }

    #[tokio::test]
    async fn select_non_interactive_first() {
        let ctx = UiContext::non_interactive();
        let result = select(&ctx, "Choose:", &options()).await.unwrap();
        assert_eq!(result.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn select_empty_is_an_error() {
        let ctx = UiContext::non_interactive();
        let empty: Vec<(String, String, String)> = Vec::new();
        assert!(select(&ctx, "Choose:", &empty).await.is_err());
    }

    #[test]
    fn interrupted_prompt_is_cancel() {
        let result: io::Result<bool> = Err(io::Error::new(io::ErrorKind::Interrupted, "ctrl-c"));
        assert_eq!(cancelled_as_none(result).unwrap(), None);
    }
}
