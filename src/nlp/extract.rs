use std::collections::HashMap;

use super::analysis::{CooccurrenceIndex, KeywordAnalysis, KeywordRow};

/// Keywords kept per analysis, ranked by occurrence count.
pub const MAX_KEYWORDS: usize = 64;

const MIN_TOKEN_CHARS: usize = 3;

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "has", "have",
    "her", "his", "him", "its", "one", "our", "out", "she", "was", "were", "they", "them", "this",
    "that", "these", "those", "with", "will", "would", "could", "should", "than", "then", "there",
    "their", "what", "when", "where", "which", "while", "who", "whom", "why", "how", "from",
    "into", "onto", "over", "under", "about", "above", "after", "again", "also", "been", "before",
    "being", "between", "both", "because", "does", "doing", "down", "during", "each", "few",
    "more", "most", "other", "some", "such", "only", "own", "same", "too", "very", "just", "your",
    "yours", "ours", "here", "may", "might", "must", "shall", "upon", "within", "without",
];

/// Split on periods, trim, drop empty fragments and lone dots, collapse
/// whitespace runs, re-append the terminal dot.
pub fn split_sentences(page: &str) -> Vec<String> {
    page.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| {
            let mut collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
            collapsed.push('.');
            collapsed
        })
        .collect()
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Lowercased candidate keywords of one sentence, in appearance order.
pub fn tokenize(sentence: &str) -> Vec<String> {
    sentence
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_lowercase)
        .filter(|token| !is_stopword(token))
        .collect()
}

/// Full analysis pass: sentences, keywords ranked by occurrence count with
/// relevance normalized into (0, 1], and the co-occurrence index.
pub fn analyze(source_name: &str, text: &str) -> KeywordAnalysis {
    let sentences = split_sentences(text);

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut next_rank = 0usize;
    for sentence in &sentences {
        for token in tokenize(sentence) {
            *counts.entry(token.clone()).or_default() += 1;
            first_seen.entry(token).or_insert_with(|| {
                let rank = next_rank;
                next_rank += 1;
                rank
            });
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| first_seen[&a.0].cmp(&first_seen[&b.0])));
    ranked.truncate(MAX_KEYWORDS);

    let max_count = ranked.first().map(|(_, count)| *count).unwrap_or(0);
    let mut keywords = Vec::with_capacity(ranked.len());
    let mut relevance = HashMap::with_capacity(ranked.len());
    for (keyword, count) in ranked {
        let score = count as f32 / max_count as f32;
        relevance.insert(keyword.clone(), score);
        keywords.push(KeywordRow {
            keyword,
            relevance: score,
            count,
        });
    }

    let min_relevance = keywords.last().map(|row| row.relevance).unwrap_or(0.0);
    let max_relevance = keywords.first().map(|row| row.relevance).unwrap_or(0.0);

    let sentence_keywords = sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| {
            let kept = tokenize(sentence)
                .into_iter()
                .filter(|token| relevance.contains_key(token))
                .collect::<Vec<_>>();
            (index, kept)
        })
        .collect::<HashMap<_, _>>();

    KeywordAnalysis {
        source_name: source_name.to_string(),
        sentences,
        keywords,
        relevance,
        min_relevance,
        max_relevance,
        index: CooccurrenceIndex::from_sentences(sentence_keywords),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_collapses_spaces_and_restores_the_dot() {
        let sentences = split_sentences("The  quick   brown fox. . Jumps over.  ");
        assert_eq!(sentences, vec!["The quick brown fox.", "Jumps over."]);
    }

    #[test]
    fn split_drops_empty_fragments() {
        assert!(split_sentences("...").is_empty());
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn tokenize_filters_stopwords_and_short_tokens() {
        let tokens = tokenize("The quick brown fox is on it.");
        assert_eq!(tokens, vec!["quick", "brown", "fox"]);
    }

    #[test]
    fn analyze_normalizes_relevance_to_a_unit_maximum() {
        let analysis = analyze(
            "sample",
            "Foxes chase rabbits. Foxes sleep. Rabbits hide from foxes.",
        );

        assert_eq!(analysis.max_relevance, 1.0);
        assert!(analysis.min_relevance > 0.0);
        let top = &analysis.keywords[0];
        assert_eq!(top.keyword, "foxes");
        assert_eq!(top.count, 3);
        assert_eq!(top.relevance, 1.0);
        for row in &analysis.keywords {
            assert!(row.relevance > 0.0 && row.relevance <= 1.0);
        }
    }

    #[test]
    fn analyze_ranks_ties_by_first_appearance() {
        let analysis = analyze("sample", "alpha beta. beta alpha. gamma alpha beta gamma.");
        let keywords: Vec<&str> = analysis
            .keywords
            .iter()
            .map(|row| row.keyword.as_str())
            .collect();
        assert_eq!(keywords, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn analyze_index_matches_the_sentences() {
        let analysis = analyze("sample", "Foxes chase rabbits. Rabbits hide.");
        assert_eq!(
            analysis.index.keywords_in_sentence(0),
            &["foxes", "chase", "rabbits"]
        );
        assert_eq!(
            analysis.sentences_containing("rabbits"),
            vec![0, 1]
        );
    }

    #[test]
    fn empty_text_yields_an_empty_analysis() {
        let analysis = analyze("empty", "");
        assert_eq!(analysis.sentence_count(), 0);
        assert_eq!(analysis.keyword_count(), 0);
        assert_eq!(analysis.max_relevance, 0.0);
    }
}
