use std::collections::HashSet;

use crate::nlp::{CooccurrenceIndex, KeywordOccurrence};
use crate::util::normalize_keyword;

use super::diagram::Diagram;
use super::node::{Node, NodeId};

pub const DEPTH_LIMIT: usize = 3;
pub const FAN_OUT_LIMIT: usize = 5;

/// Builds a bounded tree of keyword nodes from co-occurrence data. A keyword
/// placed anywhere in the tree is never placed again, so the output is a
/// finite tree with no repeated keyword.
#[derive(Clone, Copy, Debug)]
pub struct RelationshipGraphBuilder {
    depth_limit: usize,
    fan_out: usize,
}

impl Default for RelationshipGraphBuilder {
    fn default() -> Self {
        Self {
            depth_limit: DEPTH_LIMIT,
            fan_out: FAN_OUT_LIMIT,
        }
    }
}

impl RelationshipGraphBuilder {
    pub fn new(depth_limit: usize, fan_out: usize) -> Self {
        Self {
            depth_limit,
            fan_out,
        }
    }

    /// Replaces the diagram's content with a fresh tree expanded from
    /// `seeds` and runs one `arrange`. An empty seed list yields just the
    /// root.
    pub fn build(
        &self,
        diagram: &mut Diagram,
        root_label: &str,
        seeds: &[KeywordOccurrence],
        index: &CooccurrenceIndex,
    ) -> NodeId {
        diagram.clear();
        let root = diagram.insert(Node::label(root_label));

        let mut placed: HashSet<String> = seeds
            .iter()
            .map(|seed| normalize_keyword(&seed.keyword))
            .collect();
        let level = seeds
            .iter()
            .map(|seed| seed.keyword.clone())
            .collect::<Vec<_>>();

        self.expand(diagram, root, &level, 1, &mut placed, index);
        diagram.arrange();
        root
    }

    /// Children of `parent` come from the first `fan_out` keywords of
    /// `level`; the rest are dropped, not deferred. Keywords co-occurring
    /// with a child are claimed into `placed` once across the whole build.
    fn expand(
        &self,
        diagram: &mut Diagram,
        parent: NodeId,
        level: &[String],
        depth: usize,
        placed: &mut HashSet<String>,
        index: &CooccurrenceIndex,
    ) {
        for keyword in level.iter().take(self.fan_out) {
            let child = diagram.insert(Node::label(keyword.clone()));
            diagram.add_child(parent, child);

            let mut discovered = Vec::new();
            for sentence in index.sentences_with(keyword) {
                for other in index.keywords_in_sentence(sentence) {
                    if placed.insert(normalize_keyword(other)) {
                        discovered.push(other.clone());
                    }
                }
            }

            if !discovered.is_empty() && depth < self.depth_limit {
                self.expand(diagram, child, &discovered, depth + 1, placed, index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn occurrence(keyword: &str, sentence: usize, relevance: f32) -> KeywordOccurrence {
        KeywordOccurrence {
            keyword: keyword.to_string(),
            sentence,
            relevance,
        }
    }

    fn index_from(entries: Vec<(usize, Vec<&str>)>) -> CooccurrenceIndex {
        let mut sentence_keywords = HashMap::new();
        for (sentence, keywords) in entries {
            sentence_keywords.insert(
                sentence,
                keywords.iter().map(|k| k.to_string()).collect::<Vec<_>>(),
            );
        }
        CooccurrenceIndex::from_sentences(sentence_keywords)
    }

    fn label_of(diagram: &Diagram, id: NodeId) -> String {
        diagram
            .node(id)
            .and_then(|node| node.label_text())
            .unwrap_or_default()
            .to_string()
    }

    fn child_labels(diagram: &Diagram, id: NodeId) -> Vec<String> {
        diagram
            .children(id)
            .iter()
            .map(|&child| label_of(diagram, child))
            .collect()
    }

    #[test]
    fn quick_brown_fox_scenario() {
        let index = index_from(vec![(5, vec!["fox", "quick"]), (9, vec!["fox", "lazy"]), (3, vec!["quick"])]);
        let seeds = [occurrence("fox", 5, 0.9), occurrence("quick", 3, 0.4)];

        let mut diagram = Diagram::new();
        let builder = RelationshipGraphBuilder::default();
        let root = builder.build(&mut diagram, "The quick brown fox...", &seeds, &index);

        assert_eq!(label_of(&diagram, root), "The quick brown fox...");
        assert_eq!(child_labels(&diagram, root), vec!["fox", "quick"]);

        let fox = diagram.children(root)[0];
        assert_eq!(child_labels(&diagram, fox), vec!["lazy"]);

        let quick = diagram.children(root)[1];
        assert!(diagram.children(quick).is_empty());
    }

    #[test]
    fn empty_seed_list_yields_a_bare_root() {
        let index = index_from(Vec::new());
        let mut diagram = Diagram::new();
        let root = RelationshipGraphBuilder::default().build(&mut diagram, "summary", &[], &index);

        assert_eq!(diagram.len(), 1);
        assert!(diagram.children(root).is_empty());
    }

    #[test]
    fn keyword_with_no_sentences_becomes_a_leaf() {
        let index = index_from(Vec::new());
        let seeds = [occurrence("orphan", 0, 0.5)];

        let mut diagram = Diagram::new();
        let root = RelationshipGraphBuilder::default().build(&mut diagram, "root", &seeds, &index);

        assert_eq!(diagram.len(), 2);
        let leaf = diagram.children(root)[0];
        assert!(diagram.children(leaf).is_empty());
    }

    #[test]
    fn no_keyword_appears_twice_anywhere_in_the_tree() {
        let index = index_from(vec![
            (0, vec!["alpha", "beta", "gamma"]),
            (1, vec!["beta", "delta", "alpha"]),
            (2, vec!["gamma", "delta", "epsilon"]),
        ]);
        let seeds = [occurrence("alpha", 0, 0.8), occurrence("beta", 0, 0.6)];

        let mut diagram = Diagram::new();
        let root = RelationshipGraphBuilder::default().build(&mut diagram, "root", &seeds, &index);

        let mut seen = HashSet::new();
        for (id, node) in diagram.nodes() {
            if id == root {
                continue;
            }
            let label = normalize_keyword(node.label_text().unwrap());
            assert!(seen.insert(label), "keyword repeated in tree");
        }
    }

    #[test]
    fn first_branch_claims_shared_cooccurrences() {
        // alpha and beta share sentence 0; alpha is expanded first, so it
        // claims gamma and beta never re-discovers it.
        let index = index_from(vec![(0, vec!["alpha", "beta", "gamma"])]);
        let seeds = [occurrence("alpha", 0, 0.8), occurrence("beta", 0, 0.6)];

        let mut diagram = Diagram::new();
        let root = RelationshipGraphBuilder::default().build(&mut diagram, "root", &seeds, &index);

        let alpha = diagram.children(root)[0];
        let beta = diagram.children(root)[1];
        assert_eq!(child_labels(&diagram, alpha), vec!["gamma"]);
        assert!(diagram.children(beta).is_empty());
    }

    #[test]
    fn fan_out_is_capped_at_five() {
        let keywords: Vec<String> = (0..8).map(|i| format!("kw{i}")).collect();
        let refs: Vec<&str> = keywords.iter().map(String::as_str).collect();
        let index = index_from(vec![(0, refs)]);
        let seeds: Vec<KeywordOccurrence> = keywords
            .iter()
            .map(|k| occurrence(k, 0, 0.5))
            .collect();

        let mut diagram = Diagram::new();
        let root = RelationshipGraphBuilder::default().build(&mut diagram, "root", &seeds, &index);

        assert_eq!(diagram.children(root).len(), FAN_OUT_LIMIT);
    }

    #[test]
    fn depth_never_exceeds_the_limit() {
        // A chain of sentences, each introducing exactly one new keyword, so
        // expansion would recurse forever without the depth bound.
        let index = index_from(vec![
            (0, vec!["k1", "k2"]),
            (1, vec!["k2", "k3"]),
            (2, vec!["k3", "k4"]),
            (3, vec!["k4", "k5"]),
            (4, vec!["k5", "k6"]),
        ]);
        let seeds = [occurrence("k1", 0, 0.9)];

        let mut diagram = Diagram::new();
        let root = RelationshipGraphBuilder::default().build(&mut diagram, "root", &seeds, &index);

        let mut max_depth = 0;
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for &child in diagram.children(id) {
                stack.push((child, depth + 1));
            }
        }
        assert_eq!(max_depth, DEPTH_LIMIT);
    }

    #[test]
    fn dedup_is_case_insensitive() {
        let index = index_from(vec![(0, vec!["Fox", "FOX", "lazy"])]);
        let seeds = [occurrence("fox", 0, 0.9)];

        let mut diagram = Diagram::new();
        let root = RelationshipGraphBuilder::default().build(&mut diagram, "root", &seeds, &index);

        // Neither casing of the already-placed seed is re-discovered.
        let fox = diagram.children(root)[0];
        assert_eq!(child_labels(&diagram, fox), vec!["lazy"]);
    }

    #[test]
    fn every_non_root_node_has_exactly_one_parent() {
        let index = index_from(vec![
            (0, vec!["a", "b", "c"]),
            (1, vec!["b", "d"]),
            (2, vec!["c", "d", "e"]),
        ]);
        let seeds = [occurrence("a", 0, 0.9), occurrence("b", 1, 0.5)];

        let mut diagram = Diagram::new();
        let root = RelationshipGraphBuilder::default().build(&mut diagram, "root", &seeds, &index);

        let mut parent_counts: HashMap<NodeId, usize> = HashMap::new();
        for (_, child) in diagram.edges() {
            *parent_counts.entry(child).or_default() += 1;
        }
        for (id, _) in diagram.nodes() {
            if id == root {
                assert!(!parent_counts.contains_key(&id));
            } else {
                assert_eq!(parent_counts.get(&id), Some(&1));
            }
        }
    }
}
