//! Document indexing and stable element identity.

mod index;
mod stable_id;
mod text;

pub use index::DomIndex;
pub use stable_id::StableElementId;
pub use text::normalize_whitespace;

#[cfg(test)]
#[path = "dom_tests.rs"]
mod tests;
