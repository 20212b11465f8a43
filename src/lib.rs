//! A compact trie, also known as a radix trie. Chains of single-child
//! nodes are merged into one node carrying a multi-symbol label, and the
//! tree is re-compacted on every removal so that no avoidable chain link
//! survives.
//!
//! ```
//! use compact_trie::CompactTrie;
//!
//! let mut trie = CompactTrie::new();
//! trie.insert("hola".chars());
//! trie.insert("hi".chars());
//!
//! assert!(trie.search("hola".chars()));
//! assert!(!trie.search("ho".chars()));
//! assert!(trie.has_prefix("ho".chars()));
//! ```

use std::hash::Hash;

use node::{Descent, Node, Removal};

mod error;
mod node;
pub mod script;

pub use crate::error::{Result, ScriptError};
pub use crate::script::{Command, Entry, Outcome, Report, Script};

#[derive(Debug, Clone)]
/// A set of words stored as a compact trie. Words are sequences of
/// symbols of type `K`, which defaults to [char] so that a [str] can be
/// passed as `text.chars()`.
///
/// The structure is single threaded. Callers sharing a trie across threads
/// should guard the whole trie with one lock.
pub struct CompactTrie<K = char> {
    /// The root node. It is never detached, but it may carry a label.
    root: Node<K>,
    /// The amount of words in the trie.
    size: usize,
}

impl<K> Default for CompactTrie<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> CompactTrie<K> {
    /// Creates a new empty [CompactTrie].
    ///
    /// ```
    /// use compact_trie::CompactTrie;
    ///
    /// let trie = CompactTrie::<char>::new();
    /// assert_eq!(trie.len(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            size: 0,
        }
    }
    /// Returns the amount of words within the [CompactTrie].
    ///
    /// ```
    /// use compact_trie::CompactTrie;
    ///
    /// let mut trie = CompactTrie::new();
    /// trie.insert("hola".chars());
    /// trie.insert("hola".chars());
    /// assert_eq!(trie.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.size
    }
    /// Returns true if no word is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Removes every word, leaving only an empty root.
    ///
    /// ```
    /// use compact_trie::CompactTrie;
    ///
    /// let mut trie = CompactTrie::from(["hola".chars()]);
    /// assert!(!trie.is_empty());
    ///
    /// trie.clear();
    /// assert!(trie.is_empty());
    /// assert!(!trie.has_prefix("h".chars()));
    /// ```
    pub fn clear(&mut self) {
        self.root = Node::new();
        self.size = 0;
    }
    /// Counts the nodes of the tree, the root included. This is mostly
    /// useful for observing how well the labels compress the stored words.
    ///
    /// ```
    /// use compact_trie::CompactTrie;
    ///
    /// let mut trie = CompactTrie::new();
    /// trie.insert("romane".chars());
    /// trie.insert("romanus".chars());
    /// // "roman" at the root, branching into "e" and "us".
    /// assert_eq!(trie.node_count(), 3);
    ///
    /// trie.remove("romane".chars());
    /// assert_eq!(trie.node_count(), 1);
    /// ```
    pub fn node_count(&self) -> usize {
        self.root.count()
    }
}

impl<K> CompactTrie<K>
where
    K: Eq + Hash + Clone,
{
    /// Puts a word in the [CompactTrie]. Returns true if the word was
    /// not already present; inserting it again changes nothing.
    ///
    /// ```
    /// use compact_trie::CompactTrie;
    ///
    /// let mut trie = CompactTrie::new();
    /// assert!(trie.insert("hola".chars()));
    /// assert!(!trie.insert("hola".chars()));
    /// assert!(trie.search("hola".chars()));
    /// ```
    pub fn insert<I>(&mut self, word: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        let word = word.into_iter().collect::<Vec<K>>();
        let added = self.root.insert(&word);
        if added {
            self.size += 1;
        }
        added
    }
    /// Deletes a word from the [CompactTrie], merging any node that is
    /// left as a plain link in a chain. Returns true if the word was present.
    /// Removing an absent word is a no-op.
    ///
    /// ```
    /// use compact_trie::CompactTrie;
    ///
    /// let mut trie = CompactTrie::from(["bu".chars(), "bubu".chars()]);
    ///
    /// assert!(trie.remove("bu".chars()));
    /// assert!(!trie.remove("bu".chars()));
    /// assert!(trie.search("bubu".chars()));
    /// ```
    pub fn remove<I>(&mut self, word: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        let word = word.into_iter().collect::<Vec<K>>();
        let removed = match self.root.remove(&word) {
            Removal::Absent => false,
            Removal::Removed => true,
            Removal::Prune => {
                tracing::trace!("last word removed, resetting root");
                self.root = Node::new();
                true
            }
        };
        if removed {
            self.size -= 1;
        }
        removed
    }
    /// Checks if a word is stored in the [CompactTrie]. The empty word is
    /// only present if it was inserted.
    ///
    /// ```
    /// use compact_trie::CompactTrie;
    ///
    /// let mut trie = CompactTrie::new();
    /// assert!(!trie.search("".chars()));
    ///
    /// trie.insert("".chars());
    /// assert!(trie.search("".chars()));
    /// ```
    pub fn search<I>(&self, word: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        let word = word.into_iter().collect::<Vec<K>>();
        matches!(self.root.descend(&word), Descent::Exact { terminal: true })
    }
    /// Same as [CompactTrie::search].
    pub fn contains<I>(&self, word: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        self.search(word)
    }
    /// Checks if any stored word starts with `prefix`. The empty prefix
    /// is a prefix of everything, even of an empty trie.
    ///
    /// ```
    /// use compact_trie::CompactTrie;
    ///
    /// let mut trie = CompactTrie::new();
    /// assert!(trie.has_prefix("".chars()));
    ///
    /// trie.insert("hola".chars());
    /// assert!(trie.has_prefix("hol".chars()));
    /// assert!(trie.has_prefix("hola".chars()));
    /// assert!(!trie.has_prefix("holas".chars()));
    /// ```
    pub fn has_prefix<I>(&self, prefix: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        let prefix = prefix.into_iter().collect::<Vec<K>>();
        !matches!(self.root.descend(&prefix), Descent::Miss)
    }
}

impl<K> PartialEq for CompactTrie<K>
where
    K: Eq + Hash,
{
    /// Two tries are equal when they store the same words. The compact form
    /// of a set of words is unique, so the trees are compared directly.
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.root == other.root
    }
}

impl<K> Eq for CompactTrie<K> where K: Eq + Hash {}

impl<I, K> Extend<I> for CompactTrie<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    /// Inserts every word of the iterator.
    ///
    /// ```
    /// use compact_trie::CompactTrie;
    ///
    /// let mut trie = CompactTrie::new();
    /// trie.extend(["hola".chars(), "hi".chars()]);
    /// assert_eq!(trie.len(), 2);
    /// ```
    #[inline]
    fn extend<T: IntoIterator<Item = I>>(&mut self, iter: T) {
        for word in iter {
            self.insert(word);
        }
    }
}

impl<I, K> FromIterator<I> for CompactTrie<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    /// ```
    /// use compact_trie::CompactTrie;
    ///
    /// let trie: CompactTrie = ["hola", "hi"].iter().map(|w| w.chars()).collect();
    /// assert!(trie.search("hi".chars()));
    /// ```
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut trie = CompactTrie::new();
        trie.extend(iter);
        trie
    }
}

impl<I, K, const N: usize> From<[I; N]> for CompactTrie<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    fn from(arr: [I; N]) -> Self {
        Self::from_iter(arr)
    }
}

#[cfg(feature = "arbitrary")]
impl<'a, K> arbitrary::Arbitrary<'a> for CompactTrie<K>
where
    K: arbitrary::Arbitrary<'a> + Eq + Hash + Clone,
{
    /// Builds a trie by inserting an arbitrary list of words.
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let mut trie = CompactTrie::new();
        for word in u.arbitrary_iter::<Vec<K>>()? {
            trie.insert(word?);
        }
        Ok(trie)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use arbitrary::Unstructured;

    use super::CompactTrie;

    /// Every word of length at most four over the test alphabet.
    fn probes() -> Vec<String> {
        let mut probes = vec![String::new()];
        let mut frontier = vec![String::new()];
        for _ in 0..4 {
            let mut next = vec![];
            for stem in &frontier {
                for c in ['a', 'b', 'c'] {
                    next.push(format!("{stem}{c}"));
                }
            }
            probes.extend(next.iter().cloned());
            frontier = next;
        }
        probes
    }

    /// A short word over a three letter alphabet, which makes shared
    /// prefixes, splits and fusions frequent.
    fn small_word(u: &mut Unstructured<'_>) -> arbitrary::Result<String> {
        let len = u.int_in_range(0..=5)?;
        (0..len).map(|_| u.choose(&['a', 'b', 'c']).copied()).collect()
    }

    fn assert_matches_twin(trie: &CompactTrie, twin: &HashSet<String>, probes: &[String]) {
        assert_eq!(trie.len(), twin.len());
        for probe in probes {
            assert_eq!(trie.search(probe.chars()), twin.contains(probe), "search {probe:?}");
            assert_eq!(
                trie.has_prefix(probe.chars()),
                probe.is_empty() || twin.iter().any(|w| w.starts_with(probe.as_str())),
                "has_prefix {probe:?}"
            );
        }
    }

    #[test]
    pub fn scenario_branching_words() {
        let mut trie = CompactTrie::new();
        trie.insert("hola".chars());
        trie.insert("hi".chars());

        assert!(trie.search("hola".chars()));
        assert!(!trie.search("ho".chars()));
        assert!(trie.has_prefix("ho".chars()));
        assert!(trie.search("hi".chars()));
    }

    #[test]
    pub fn scenario_remove_inner_word() {
        let mut trie = CompactTrie::new();
        trie.insert("bu".chars());
        trie.insert("bubu".chars());
        assert!(trie.search("bu".chars()));

        trie.remove("bu".chars());
        assert!(!trie.search("bu".chars()));
        assert!(trie.search("bubu".chars()));
        assert!(trie.has_prefix("bub".chars()));
        assert!(trie.root.is_compact(true));
    }

    #[test]
    pub fn scenario_empty_word() {
        let mut trie = CompactTrie::new();
        trie.insert("".chars());
        trie.insert("hola".chars());

        assert!(trie.search("".chars()));
        assert!(trie.search("hola".chars()));
        assert!(trie.has_prefix("".chars()));
    }

    #[test]
    pub fn scenario_double_insert_single_remove() {
        let mut trie = CompactTrie::new();
        trie.insert("hola".chars());
        trie.insert("hola".chars());
        trie.remove("hola".chars());

        assert!(!trie.search("hola".chars()));
        assert!(trie.is_empty());
    }

    #[test]
    pub fn hardcoded_session() {
        let mut trie = CompactTrie::new();
        for word in ["", "hola", "hola", "hi", "bu", "bubu", "ho", ""] {
            trie.insert(word.chars());
        }
        assert_eq!(trie.len(), 6);

        for (word, expected) in [
            ("", true),
            ("h", false),
            ("ho", true),
            ("hol", false),
            ("hola", true),
            ("he", false),
            ("hi", true),
            ("b", false),
            ("bu", true),
        ] {
            assert_eq!(trie.search(word.chars()), expected, "search {word:?}");
        }

        trie.remove("bu".chars());
        assert!(!trie.search("bu".chars()));
        assert!(!trie.search("bub".chars()));
        assert!(trie.search("bubu".chars()));
        assert!(trie.search("ho".chars()));
        assert!(!trie.search("hu".chars()));

        for (prefix, expected) in [
            ("", true),
            ("h", true),
            ("hol", true),
            ("he", false),
            ("b", true),
            ("bu", true),
            ("bub", true),
            ("bubu", true),
            ("hu", false),
        ] {
            assert_eq!(trie.has_prefix(prefix.chars()), expected, "has_prefix {prefix:?}");
        }
        assert!(trie.root.is_compact(true));
    }

    #[test]
    pub fn removing_only_word_resets_root() {
        let mut trie = CompactTrie::new();
        trie.insert("hola".chars());
        trie.remove("hola".chars());

        assert!(!trie.has_prefix("ho".chars()));
        assert!(trie.has_prefix("".chars()));
        assert_eq!(trie, CompactTrie::new());
        assert_eq!(trie.node_count(), 1);
    }

    #[test]
    pub fn equality_ignores_insertion_order() {
        let words = ["romane", "romanus", "romulus", "rubens", "ruber", "rubicon", "rubicundus"];
        let forward: CompactTrie = words.iter().map(|w| w.chars()).collect();
        let backward: CompactTrie = words.iter().rev().map(|w| w.chars()).collect();
        assert_eq!(forward, backward);

        let mut partial = forward.clone();
        partial.remove("ruber".chars());
        assert_ne!(partial, backward);
    }

    #[test]
    pub fn generic_over_bytes() {
        let mut trie = CompactTrie::<u8>::new();
        trie.insert(*b"GET /index");
        trie.insert(*b"GET /img");
        assert!(trie.search(*b"GET /img"));
        assert!(trie.has_prefix(*b"GET /i"));
        assert!(!trie.has_prefix(*b"POST"));
    }

    #[test]
    pub fn test_arbitrary_against_twin() {
        let probes = probes();
        arbtest::arbtest(|u| {
            let mut trie = CompactTrie::new();
            let mut twin = HashSet::new();

            let steps = u.int_in_range(0..=48)?;
            for _ in 0..steps {
                let word = small_word(u)?;
                if u.ratio(2, 3)? {
                    assert_eq!(trie.insert(word.chars()), twin.insert(word.clone()));
                } else {
                    assert_eq!(trie.remove(word.chars()), twin.remove(&word));
                }
                assert!(trie.root.is_compact(true), "not compact: {:?}", trie.root);
            }

            assert_matches_twin(&trie, &twin, &probes);
            Ok(())
        });
    }

    #[test]
    pub fn test_arbitrary_removal_symmetry() {
        arbtest::arbtest(|u| {
            let mut trie = CompactTrie::new();
            for _ in 0..u.int_in_range(0..=16)? {
                trie.insert(small_word(u)?.chars());
            }

            let word = small_word(u)?;
            if trie.search(word.chars()) {
                return Ok(());
            }

            let before = trie.clone();
            trie.insert(word.chars());
            trie.remove(word.chars());
            assert_eq!(trie, before);
            Ok(())
        });
    }

    #[test]
    pub fn test_arbitrary_absent_removal() {
        arbtest::arbtest(|u| {
            let mut trie = CompactTrie::new();
            for _ in 0..u.int_in_range(0..=16)? {
                trie.insert(small_word(u)?.chars());
            }

            let word = small_word(u)?;
            let before = trie.clone();
            if !trie.search(word.chars()) {
                assert!(!trie.remove(word.chars()));
                assert_eq!(trie, before);
            }
            Ok(())
        });
    }

    #[test]
    pub fn test_arbitrary_idempotent_insert() {
        arbtest::arbtest(|u| {
            let mut once = CompactTrie::new();
            for _ in 0..u.int_in_range(0..=16)? {
                once.insert(small_word(u)?.chars());
            }

            let word = small_word(u)?;
            once.insert(word.chars());
            let mut twice = once.clone();
            assert!(!twice.insert(word.chars()));
            assert_eq!(once, twice);
            Ok(())
        });
    }

    #[test]
    pub fn test_arbitrary_prefix_monotonicity() {
        arbtest::arbtest(|u| {
            let mut trie = CompactTrie::new();
            let mut words = vec![];
            for _ in 0..u.int_in_range(1..=16)? {
                let word = small_word(u)?;
                trie.insert(word.chars());
                words.push(word);
            }
            // Churn a little so that fused labels are exercised as well.
            let victim = small_word(u)?;
            trie.remove(victim.chars());
            words.retain(|w| *w != victim);

            for word in &words {
                assert!(trie.search(word.chars()));
                for end in 0..=word.len() {
                    assert!(trie.has_prefix(word[..end].chars()));
                }
            }
            Ok(())
        });
    }

    #[test]
    pub fn test_arbitrary_long_words() {
        let mut trie: CompactTrie = CompactTrie::new();
        arbtest::arbtest(|u| {
            let key: String = u.arbitrary::<[char; 32]>()?.iter().collect();
            trie.insert(key.chars());
            assert!(trie.search(key.chars()));
            assert!(trie.root.is_compact(true));

            trie.remove(key.chars());
            assert!(!trie.search(key.chars()));
            Ok(())
        });
    }

    #[cfg(feature = "arbitrary")]
    #[test]
    pub fn arbitrary_trie_is_compact() {
        use arbitrary::Arbitrary;

        arbtest::arbtest(|u| {
            let trie = CompactTrie::<u8>::arbitrary(u)?;
            assert!(trie.root.is_compact(true));
            Ok(())
        });
    }
}
