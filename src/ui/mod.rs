//! User interface components and views.
//!
//! This module contains all TUI rendering logic: the category filter widget,
//! its text input and help bar, and the record preview.

mod components;
pub mod theme;
mod views;

pub use components::{
    render_context_help, CategoryFilter, CategoryFilterAction, HintContext, CATEGORY_FILTER_HEIGHT,
};
pub use views::PreviewView;
