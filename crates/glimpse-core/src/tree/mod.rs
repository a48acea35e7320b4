//! Visible element tree.

mod builder;
mod node;

pub use builder::TreeBuilder;
pub use node::{ElementNode, PreOrder, VisibilitySource};

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
