//! Terminal presentation
//!
//! Uses `cliclack` for interactive prompts with automatic fallback to
//! plain output in CI/non-interactive environments.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheetdash::ui::{self, UiContext, TaskSpinner};
//!
//! let ctx = UiContext::detect();
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Loading sheet...");
//! // ... fetch ...
//! spinner.stop("Loaded");
//!
//! for line in ui::render_grid(&table, 40) {
//!     println!("{}", line);
//! }
//! ```

mod context;
mod grid;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use grid::{print_grid, render_grid};
pub use output::{
    intro, outro_success, remark, section, step_error_hint, step_info, step_ok, step_ok_detail,
    step_warn_hint,
};
pub use progress::TaskSpinner;
pub use prompts::select;
