//! Conflict presentation and resolution.
//!
//! The conflict subsystem is responsible for:
//! 1. **Markers** -- writing conflict regions out in git's `<<<<<<<` layout.
//! 2. **Resolution** -- recording a decision per conflict and producing the
//!    final merged document.

pub mod markers;
pub mod resolver;

pub use markers::render_with_markers;
pub use resolver::{ConflictResolver, Resolution};
