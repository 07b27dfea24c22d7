//! The matching core: incremental session buffers, a prefix trie and
//! inverted index over the catalog, per-window ranking, and multi-intent
//! segmentation, orchestrated by [`SuggestionEngine`].

pub mod engine;
pub mod index;
pub mod ranker;
pub mod segmenter;
pub mod session;
pub mod tokenizer;
pub mod trie;

pub use engine::{AddReport, CombineStrategy, EngineOptions, SuggestionEngine};
pub use index::InvertedIndex;
pub use ranker::QueryWindow;
pub use segmenter::Segmenter;
pub use session::SessionStore;
pub use tokenizer::Tokenizer;
pub use trie::Trie;
