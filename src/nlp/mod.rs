mod analysis;
mod cache;
mod extract;

pub use analysis::{CooccurrenceIndex, KeywordAnalysis, KeywordOccurrence, KeywordRow};
pub use cache::load_or_analyze;
