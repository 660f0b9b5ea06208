//! Screen views.

mod preview;

pub use preview::PreviewView;
