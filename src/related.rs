//! Tag-overlap ranking of related content. See [`rank`].

use crate::entry::Entry;
use std::collections::HashSet;

/// A candidate paired with its tag-overlap score. Only lives for the duration
/// of one [`rank`] call.
struct RankedEntry<'a, E> {
    entry: &'a E,
    score: usize,
}

/// Ranks `candidates` by how many tags they share with the target and returns
/// at most `limit` of them, best first.
///
/// * Any candidate whose id is `target_id` is skipped, wherever it appears.
/// * A candidate's score is the number of distinct tags it shares with
///   `target_tags`; a tag repeated on the candidate only counts once.
/// * Equal scores keep their relative order from `candidates`. There is no
///   secondary key, so callers who want "most recent among equally relevant"
///   pass `candidates` sorted by recency.
pub fn rank<'a, E: Entry, S: AsRef<str>>(
    target_id: &str,
    target_tags: &[S],
    candidates: &'a [E],
    limit: usize,
) -> Vec<&'a E> {
    if limit == 0 {
        return Vec::new();
    }

    let target: HashSet<&str> = target_tags.iter().map(AsRef::as_ref).collect();
    let mut ranked: Vec<RankedEntry<E>> = candidates
        .iter()
        .filter(|entry| entry.id() != target_id)
        .map(|entry| RankedEntry {
            entry,
            score: overlap(&target, entry),
        })
        .collect();

    // `sort_by` is stable, which is what preserves input order among ties.
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(limit);
    ranked.into_iter().map(|r| r.entry).collect()
}

/// Returns the tag-overlap score of `entry` against `target_tags`, as used by
/// [`rank`].
pub fn score<E: Entry, S: AsRef<str>>(target_tags: &[S], entry: &E) -> usize {
    let target: HashSet<&str> = target_tags.iter().map(AsRef::as_ref).collect();
    overlap(&target, entry)
}

fn overlap<E: Entry>(target: &HashSet<&str>, entry: &E) -> usize {
    entry
        .tags()
        .iter()
        .map(String::as_str)
        .filter(|tag| target.contains(tag))
        .collect::<HashSet<&str>>()
        .len()
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item {
        id: &'static str,
        tags: Vec<String>,
    }

    impl Entry for Item {
        fn id(&self) -> &str {
            self.id
        }

        fn tags(&self) -> &[String] {
            &self.tags
        }

        fn draft(&self) -> bool {
            false
        }
    }

    fn item(id: &'static str, tags: &[&str]) -> Item {
        Item {
            id,
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
        }
    }

    fn ids<'a>(entries: &[&'a Item]) -> Vec<&'a str> {
        entries.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_rank_by_overlap_excluding_self() {
        let candidates = vec![
            item("post-b", &["swift"]),
            item("post-c", &["swift", "ios"]),
            item("post-a", &["swift", "ios"]),
        ];
        let ranked = rank("post-a", &["swift", "ios"], &candidates, 3);
        assert_eq!(vec!["post-c", "post-b"], ids(&ranked));
    }

    #[test]
    fn test_rank_no_target_tags_keeps_input_order() {
        let candidates = vec![item("a", &["t"]), item("b", &[])];
        let no_tags: &[&str] = &[];
        let ranked = rank("x", no_tags, &candidates, 5);
        assert_eq!(vec!["a", "b"], ids(&ranked));
    }

    #[test]
    fn test_rank_zero_limit() {
        let candidates = vec![item("a", &["t"]), item("b", &["t"])];
        assert!(rank("x", &["t"], &candidates, 0).is_empty());
    }

    #[test]
    fn test_rank_empty_candidates() {
        let candidates: Vec<Item> = Vec::new();
        assert!(rank("x", &["t"], &candidates, 3).is_empty());
    }

    #[test]
    fn test_rank_truncates_to_limit() {
        let candidates = vec![
            item("a", &["rust"]),
            item("b", &["rust", "cli"]),
            item("c", &[]),
            item("d", &["cli"]),
        ];
        let ranked = rank("x", &["rust", "cli"], &candidates, 2);
        assert_eq!(vec!["b", "a"], ids(&ranked));
    }

    #[test]
    fn test_rank_ties_are_stable() {
        let candidates = vec![
            item("newest", &["swift"]),
            item("zero", &["go"]),
            item("middle", &["swift"]),
            item("oldest", &["swift"]),
        ];
        let ranked = rank("x", &["swift"], &candidates, 10);
        assert_eq!(vec!["newest", "middle", "oldest", "zero"], ids(&ranked));
    }

    #[test]
    fn test_rank_excludes_every_copy_of_self() {
        let candidates = vec![
            item("self", &["a"]),
            item("other", &["a"]),
            item("self", &["a", "b"]),
        ];
        let ranked = rank("self", &["a", "b"], &candidates, 10);
        assert_eq!(vec!["other"], ids(&ranked));
    }

    #[test]
    fn test_duplicate_tags_count_once() {
        let entry = item("a", &["swift", "swift", "ios"]);
        assert_eq!(2, score(&["swift", "ios"], &entry));
        assert_eq!(1, score(&["swift", "swift"], &entry));
    }

    #[test]
    fn test_rank_properties() {
        let candidates = vec![
            item("a", &["x"]),
            item("b", &["x", "y", "z"]),
            item("target", &["x", "y"]),
            item("c", &["y", "y"]),
            item("d", &[]),
            item("e", &["z", "x", "y"]),
        ];
        let target_tags = ["x", "y"];
        for limit in 0..8 {
            let ranked = rank("target", &target_tags, &candidates, limit);
            assert!(ranked.len() <= limit.min(candidates.len() - 1));
            assert!(ranked.iter().all(|e| e.id != "target"));
            for pair in ranked.windows(2) {
                assert!(score(&target_tags, pair[0]) >= score(&target_tags, pair[1]));
            }
        }
    }
}
