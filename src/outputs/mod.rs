//! Site source outputs besides the release store.
//!
//! # Submodules
//!
//! - [`docs`]: Copies generated documentation into a per-tag snapshot
//! - [`redirects`]: Writes the `<tag>.md` template that gives each snapshot an index page
//!
//! # Output Structure
//!
//! ```text
//! docs_dir/
//! ├── develop/
//! └── v1.0.0/
//!
//! redirects_dir/
//! ├── develop.md
//! └── v1.0.0.md
//! ```

pub mod docs;
pub mod redirects;
