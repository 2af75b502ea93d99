//! Topic co-occurrence counting.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Number of pairs kept in reports.
pub const DEFAULT_TOP_PAIRS: usize = 200;

/// Two topics seen together on the same document. `topic_a < topic_b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCount {
    pub topic_a: String,
    pub topic_b: String,
    /// Documents carrying both topics.
    pub count: u64,
    pub topic_a_count: u64,
    pub topic_b_count: u64,
}

/// Count unordered topic pairs across documents and keep the `top_n` most
/// frequent. Ties keep the order in which pairs were first seen.
pub fn count_pairs<I, L>(topic_lists: I, top_n: usize) -> Vec<PairCount>
where
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = String>,
{
    let mut totals: HashMap<String, u64> = HashMap::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut pairs: Vec<PairCount> = Vec::new();

    for topics in topic_lists {
        let unique: Vec<String> = topics.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        for topic in &unique {
            *totals.entry(topic.clone()).or_insert(0) += 1;
        }
        if unique.len() < 2 {
            continue;
        }

        for (i, a) in unique.iter().enumerate() {
            for b in &unique[i + 1..] {
                let key = (a.clone(), b.clone());
                match index.get(&key) {
                    Some(&slot) => pairs[slot].count += 1,
                    None => {
                        index.insert(key, pairs.len());
                        pairs.push(PairCount {
                            topic_a: a.clone(),
                            topic_b: b.clone(),
                            count: 1,
                            topic_a_count: 0,
                            topic_b_count: 0,
                        });
                    }
                }
            }
        }
    }

    pairs.sort_by(|x, y| y.count.cmp(&x.count));
    pairs.truncate(top_n);
    for pair in &mut pairs {
        pair.topic_a_count = totals.get(&pair.topic_a).copied().unwrap_or(0);
        pair.topic_b_count = totals.get(&pair.topic_b).copied().unwrap_or(0);
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists(docs: &[&[&str]]) -> Vec<Vec<String>> {
        docs.iter().map(|d| d.iter().map(|t| t.to_string()).collect()).collect()
    }

    #[test]
    fn test_three_topics_make_three_pairs() {
        let pairs = count_pairs(lists(&[&["C", "A", "B"]]), DEFAULT_TOP_PAIRS);
        let keys: Vec<(&str, &str)> =
            pairs.iter().map(|p| (p.topic_a.as_str(), p.topic_b.as_str())).collect();
        assert_eq!(keys, vec![("A", "B"), ("A", "C"), ("B", "C")]);
        assert!(pairs.iter().all(|p| p.count == 1));
    }

    #[test]
    fn test_reversed_order_shares_one_key() {
        let pairs = count_pairs(lists(&[&["B", "A"], &["A", "B"], &["A", "A", "B"]]), 10);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].topic_a, "A");
        assert_eq!(pairs[0].topic_b, "B");
        assert_eq!(pairs[0].count, 3);
    }

    #[test]
    fn test_ranking_and_totals() {
        let pairs = count_pairs(
            lists(&[&["דיור", "תחבורה"], &["חינוך", "בריאות"], &["חינוך", "בריאות"], &["דיור"]]),
            10,
        );
        assert_eq!(pairs[0].count, 2);
        assert_eq!((pairs[0].topic_a.as_str(), pairs[0].topic_b.as_str()), ("בריאות", "חינוך"));
        assert_eq!(pairs[0].topic_a_count, 2);
        assert_eq!(pairs[1].topic_a, "דיור");
        assert_eq!(pairs[1].topic_a_count, 2);
        assert_eq!(pairs[1].topic_b_count, 1);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let pairs = count_pairs(lists(&[&["x", "y"], &["a", "b"]]), 10);
        assert_eq!(pairs[0].topic_a, "x");
        assert_eq!(pairs[1].topic_a, "a");
    }

    #[test]
    fn test_truncated_to_top_n() {
        let pairs = count_pairs(lists(&[&["a", "b", "c", "d"]]), 2);
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_single_topic_documents_produce_nothing() {
        assert!(count_pairs(lists(&[&["a"], &[]]), 10).is_empty());
    }
}
