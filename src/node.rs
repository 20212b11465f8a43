use std::{collections::HashMap, hash::Hash, mem};

/// A node of the [crate::CompactTrie]. A node holds a label, which is a run
/// of symbols that would be a chain of single-child nodes in a plain trie,
/// a map of children keyed by the symbol that follows the label, and a flag
/// that marks whether the path ending at this node is a stored word.
///
/// The branching symbol lives only in the parent's map, it is never repeated
/// at the start of the child's label.
#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    /// The symbols consumed when descending into this node.
    label: Vec<K>,
    /// The children, keyed by the symbol that follows the label.
    children: HashMap<K, Node<K>>,
    /// Whether the path up to the end of this label is a stored word.
    terminal: bool,
}

/// The result of removing a word below a node, handed back to the
/// parent so that it can perform the edit on its own children map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Removal {
    /// The word was not stored, nothing changed.
    Absent,
    /// The word was removed and the node is still needed.
    Removed,
    /// The word was removed and the node carries nothing anymore, so
    /// the parent must drop it.
    Prune,
}

/// Where a read-only descent ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Descent {
    /// The query ended exactly at the end of a label.
    Exact { terminal: bool },
    /// The query ended part way through a label.
    Inside,
    /// The query diverged from every stored path.
    Miss,
}

impl<K> Default for Node<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Node<K> {
    /// Creates an empty node with no label, no children and
    /// no membership.
    pub fn new() -> Self {
        Self {
            label: Vec::new(),
            children: HashMap::new(),
            terminal: false,
        }
    }
    /// A vacant node can simply adopt whatever suffix is inserted into it.
    fn is_vacant(&self) -> bool {
        self.label.is_empty() && self.children.is_empty() && !self.terminal
    }
    /// Counts this node and every node below it.
    pub fn count(&self) -> usize {
        1 + self.children.values().map(Node::count).sum::<usize>()
    }
}

impl<K> Node<K>
where
    K: Eq + Hash,
{
    /// Walks down from this node without modifying anything.
    pub fn descend(&self, word: &[K]) -> Descent {
        let mut node = self;
        let mut word = word;
        loop {
            let k = common_prefix(&node.label, word);
            if k == word.len() {
                return if k == node.label.len() {
                    Descent::Exact {
                        terminal: node.terminal,
                    }
                } else {
                    Descent::Inside
                };
            }
            if k < node.label.len() {
                return Descent::Miss;
            }
            match node.children.get(&word[k]) {
                Some(child) => {
                    node = child;
                    word = &word[k + 1..];
                }
                None => return Descent::Miss,
            }
        }
    }

    /// Checks that the subtree is in compact form. A node that is not
    /// terminal must branch, except for the root of an empty trie which
    /// must also be unlabelled.
    #[cfg(test)]
    pub(crate) fn is_compact(&self, is_root: bool) -> bool {
        let shape = match (self.terminal, self.children.len()) {
            (true, _) => true,
            (false, 0) => is_root && self.label.is_empty(),
            (false, 1) => false,
            (false, _) => true,
        };
        shape && self.children.values().all(|child| child.is_compact(false))
    }
}

impl<K> Node<K>
where
    K: Eq + Hash + Clone,
{
    /// Inserts the remaining part of a word below this node. Returns
    /// true if the word was not stored before.
    pub fn insert(&mut self, word: &[K]) -> bool {
        if self.is_vacant() && !word.is_empty() {
            self.label = word.to_vec();
            self.terminal = true;
            return true;
        }

        let k = common_prefix(&self.label, word);
        if k < self.label.len() {
            self.split(k);
        }

        match word.get(k) {
            None => !mem::replace(&mut self.terminal, true),
            Some(key) => self
                .children
                .entry(key.clone())
                .or_default()
                .insert(&word[k + 1..]),
        }
    }

    /// Cuts the label at `at`. Everything past the cut, together with the
    /// current children and membership, moves into a new child keyed by the
    /// symbol at the cut.
    fn split(&mut self, at: usize) {
        let mut rest = self.label.split_off(at);
        let key = rest.remove(0);
        tracing::trace!(at, moved = rest.len(), "splitting label");

        let child = Node {
            label: rest,
            children: mem::take(&mut self.children),
            terminal: mem::replace(&mut self.terminal, false),
        };
        self.children.insert(key, child);
    }

    /// Removes the remaining part of a word below this node and restores
    /// compact form on the way back up.
    pub fn remove(&mut self, word: &[K]) -> Removal {
        let k = common_prefix(&self.label, word);
        if k < self.label.len() {
            return Removal::Absent;
        }

        match word.get(k) {
            None if self.terminal => {
                self.terminal = false;
                self.settle()
            }
            None => Removal::Absent,
            Some(key) => {
                let Some(child) = self.children.get_mut(key) else {
                    return Removal::Absent;
                };
                match child.remove(&word[k + 1..]) {
                    Removal::Prune => {
                        self.children.remove(key);
                        tracing::trace!(remaining = self.children.len(), "pruned child");
                        self.settle()
                    }
                    other => other,
                }
            }
        }
    }

    /// Decides what a node that just lost a word or a child turns into.
    fn settle(&mut self) -> Removal {
        if self.terminal {
            return Removal::Removed;
        }
        match self.children.len() {
            0 => Removal::Prune,
            1 => {
                self.fuse();
                Removal::Removed
            }
            _ => Removal::Removed,
        }
    }

    /// Absorbs the only child: its key and label are appended to ours and
    /// we take over its children and membership.
    fn fuse(&mut self) {
        let Some((key, child)) = mem::take(&mut self.children).into_iter().next() else {
            return;
        };
        tracing::trace!(
            label = self.label.len(),
            absorbed = child.label.len() + 1,
            "fusing single child"
        );
        self.label.push(key);
        self.label.extend(child.label);
        self.children = child.children;
        self.terminal = child.terminal;
    }
}

impl<K> PartialEq for Node<K>
where
    K: Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.terminal == other.terminal
            && self.label == other.label
            && self.children == other.children
    }
}

impl<K> Eq for Node<K> where K: Eq + Hash {}

/// Length of the longest common prefix of two symbol runs.
fn common_prefix<K: PartialEq>(left: &[K], right: &[K]) -> usize {
    left.iter()
        .zip(right)
        .take_while(|(a, b)| a == b)
        .count()
}
