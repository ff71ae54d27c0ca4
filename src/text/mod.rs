//! Text vectorization and term-frequency transforms.

pub mod transform;
pub mod vectorize;

pub use transform::TfMode;
pub use vectorize::{Vocabulary, VocabularyOptions};
