use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::util::normalize_keyword;

/// One keyword sighting; relevance is the keyword's global score, identical
/// for every occurrence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeywordOccurrence {
    pub keyword: String,
    pub sentence: usize,
    pub relevance: f32,
}

/// Bidirectional sentence/keyword lookup. Sentence keyword lists keep their
/// in-sentence appearance order and sentence sets are ordered ascending,
/// which keeps graph expansion deterministic. Missing keys read as empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CooccurrenceIndex {
    sentence_keywords: HashMap<usize, Vec<String>>,
    keyword_sentences: HashMap<String, BTreeSet<usize>>,
}

impl CooccurrenceIndex {
    /// Per-sentence lists are deduplicated case-insensitively, first casing
    /// wins; the inverse map is keyed on normalized keyword text.
    pub fn from_sentences(sentence_keywords: HashMap<usize, Vec<String>>) -> Self {
        let mut cleaned = HashMap::with_capacity(sentence_keywords.len());
        let mut keyword_sentences: HashMap<String, BTreeSet<usize>> = HashMap::new();

        for (sentence, keywords) in sentence_keywords {
            let mut seen = HashSet::new();
            let mut list = Vec::new();
            for keyword in keywords {
                let key = normalize_keyword(&keyword);
                if key.is_empty() || !seen.insert(key.clone()) {
                    continue;
                }
                keyword_sentences.entry(key).or_default().insert(sentence);
                list.push(keyword);
            }
            cleaned.insert(sentence, list);
        }

        Self {
            sentence_keywords: cleaned,
            keyword_sentences,
        }
    }

    pub fn keywords_in_sentence(&self, sentence: usize) -> &[String] {
        self.sentence_keywords
            .get(&sentence)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sentence indices containing the keyword, ascending.
    pub fn sentences_with(&self, keyword: &str) -> impl Iterator<Item = usize> + '_ {
        self.keyword_sentences
            .get(&normalize_keyword(keyword))
            .into_iter()
            .flatten()
            .copied()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeywordRow {
    pub keyword: String,
    pub relevance: f32,
    pub count: usize,
}

/// Everything the UI and the graph builder consume about one analyzed text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub source_name: String,
    pub sentences: Vec<String>,
    /// Ranked rows, relevance descending.
    pub keywords: Vec<KeywordRow>,
    /// Normalized keyword text to relevance.
    pub relevance: HashMap<String, f32>,
    pub min_relevance: f32,
    pub max_relevance: f32,
    pub index: CooccurrenceIndex,
}

impl KeywordAnalysis {
    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn relevance_of(&self, keyword: &str) -> Option<f32> {
        self.relevance.get(&normalize_keyword(keyword)).copied()
    }

    pub fn sentences_containing(&self, keyword: &str) -> Vec<usize> {
        self.index.sentences_with(keyword).collect()
    }

    /// Occurrence seed list for a set of displayed sentences: their keywords
    /// in appearance order, deduplicated case-insensitively.
    pub fn occurrences_in(&self, sentences: &[usize]) -> Vec<KeywordOccurrence> {
        let mut seen = HashSet::new();
        let mut occurrences = Vec::new();
        for &sentence in sentences {
            for keyword in self.index.keywords_in_sentence(sentence) {
                let key = normalize_keyword(keyword);
                if !seen.insert(key.clone()) {
                    continue;
                }
                occurrences.push(KeywordOccurrence {
                    keyword: keyword.clone(),
                    sentence,
                    relevance: self.relevance.get(&key).copied().unwrap_or(0.0),
                });
            }
        }
        occurrences
    }

    /// Short root label for the relationship graph.
    pub fn summary_of(&self, sentence: usize) -> String {
        self.sentences
            .get(sentence)
            .map(|text| crate::util::truncate_label(text, 48))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> CooccurrenceIndex {
        let mut sentences = HashMap::new();
        sentences.insert(0, vec!["fox".to_string(), "quick".to_string()]);
        sentences.insert(1, vec!["Fox".to_string(), "lazy".to_string(), "fox".to_string()]);
        CooccurrenceIndex::from_sentences(sentences)
    }

    #[test]
    fn index_is_self_consistent() {
        let index = sample_index();
        for sentence in [0usize, 1] {
            for keyword in index.keywords_in_sentence(sentence) {
                assert!(
                    index.sentences_with(keyword).any(|s| s == sentence),
                    "inverse lookup missing {keyword} in {sentence}"
                );
            }
        }
    }

    #[test]
    fn per_sentence_lists_are_deduplicated_case_insensitively() {
        let index = sample_index();
        assert_eq!(index.keywords_in_sentence(1), &["Fox", "lazy"]);
    }

    #[test]
    fn sentences_with_is_ascending_and_case_insensitive() {
        let index = sample_index();
        assert_eq!(index.sentences_with("FOX").collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn missing_lookups_read_as_empty() {
        let index = sample_index();
        assert!(index.keywords_in_sentence(99).is_empty());
        assert_eq!(index.sentences_with("absent").count(), 0);
    }

    #[test]
    fn occurrences_in_dedups_across_sentences() {
        let mut relevance = HashMap::new();
        relevance.insert("fox".to_string(), 1.0_f32);
        relevance.insert("quick".to_string(), 0.5);
        relevance.insert("lazy".to_string(), 0.5);
        let analysis = KeywordAnalysis {
            source_name: "sample".to_string(),
            sentences: vec!["s0.".to_string(), "s1.".to_string()],
            keywords: Vec::new(),
            relevance,
            min_relevance: 0.5,
            max_relevance: 1.0,
            index: sample_index(),
        };

        let occurrences = analysis.occurrences_in(&[0, 1]);
        let keywords: Vec<&str> = occurrences.iter().map(|o| o.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["fox", "quick", "lazy"]);
        assert_eq!(occurrences[0].sentence, 0);
        assert_eq!(occurrences[2].sentence, 1);
    }
}
