//! UI context for detecting interactive vs CI environments

use std::io::IsTerminal;

/// Width assumed when stdout is not a terminal
const FALLBACK_WIDTH: usize = 120;

/// CI indicators that force plain output
const CI_VARS: [&str; 9] = [
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TEAMCITY_VERSION",
    "TF_BUILD",
];

/// UI context that determines output behavior
#[derive(Debug, Clone)]
pub struct UiContext {
    /// Whether running in an interactive terminal
    interactive: bool,
    /// Columns available for the table grid
    width: usize,
}

impl UiContext {
    /// Detect the current environment
    pub fn detect() -> Self {
        let interactive = Self::detect_interactive();
        let width = if interactive {
            console::Term::stdout()
                .size_checked()
                .map(|(_, cols)| cols as usize)
                .unwrap_or(FALLBACK_WIDTH)
        } else {
            FALLBACK_WIDTH
        };
        Self { interactive, width }
    }

    /// Create a non-interactive context (for testing or explicit CI mode)
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            width: FALLBACK_WIDTH,
        }
    }

    /// Override the grid width
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Check if we're in an interactive terminal
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Check if we should use fancy output (spinners, colors)
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Detect if running in an interactive environment
    fn detect_interactive() -> bool {
        if !std::io::stdout().is_terminal() || !std::io::stdin().is_terminal() {
            return false;
        }

        !CI_VARS.iter().any(|var| std::env::var_os(var).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_context() {
        let ctx = UiContext::non_interactive();
        assert!(!ctx.is_interactive());
        assert!(!ctx.use_fancy_output());
        assert_eq!(ctx.width(), FALLBACK_WIDTH);
    }

    #[test]
    fn with_width() {
        let ctx = UiContext::non_interactive().with_width(60);
        assert_eq!(ctx.width(), 60);
    }
}
