//! On-screen visibility.

mod classifier;
mod occlusion;

pub use classifier::{is_visible, Classification, VisibilityClassifier};

#[cfg(test)]
#[path = "visibility_tests.rs"]
mod tests;
