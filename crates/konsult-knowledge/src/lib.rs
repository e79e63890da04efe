//! # Konsult Knowledge
//!
//! The retrieval side of the bot: split the knowledge document into
//! overlapping passages, embed them into a flat vector index (a few hundred
//! entries at most, so linear scan is the whole search structure), persist
//! the index to disk, and answer top-k similarity queries.
//!
//! ```text
//! knowledge.txt
//!   ↓ chunker::split
//! Vec<Passage>
//!   ↓ VectorIndex::build (one embedding batch)
//! VectorIndex  ──save/load──  index.json
//!   ↓ Retriever::search(question, k)
//! top-k ScoredPassage, cosine-ranked
//! ```

pub mod chunker;
pub mod index;
pub mod retriever;

pub use index::VectorIndex;
pub use retriever::{Retriever, ScoredPassage};
