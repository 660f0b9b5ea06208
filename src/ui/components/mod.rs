//! Reusable UI components.

mod category_filter;
mod help_bar;
mod input;

pub use category_filter::{CategoryFilter, CategoryFilterAction, CATEGORY_FILTER_HEIGHT};
pub use help_bar::{render_context_help, HintContext};
