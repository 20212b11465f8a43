#![no_main]

use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use compact_trie::CompactTrie;
use std::collections::HashSet;

#[derive(Arbitrary, Debug)]
pub enum Ops {
    Insert(Vec<u8>),
    Remove(Vec<u8>),
    Search(Vec<u8>),
    HasPrefix(Vec<u8>),
    Clear,
}

fuzz_target!(|data: Vec<Ops>| {
    let mut trie = CompactTrie::<u8>::new();

    let mut twin = HashSet::<Vec<u8>>::new();

    for datum in data {
        match datum {
            Ops::Insert(key) => {
                assert_eq!(trie.insert(key.iter().copied()), twin.insert(key));
            }
            Ops::Remove(key) => {
                assert_eq!(trie.remove(key.iter().copied()), twin.remove(&key));
            }
            Ops::Search(key) => {
                assert_eq!(trie.search(key.iter().copied()), twin.contains(&key));
            }
            Ops::HasPrefix(prefix) => {
                let expected = prefix.is_empty() || twin.iter().any(|k| k.starts_with(&prefix));
                assert_eq!(trie.has_prefix(prefix.iter().copied()), expected);
            }
            Ops::Clear => {
                trie.clear();
                twin.clear();
            }
        }

        assert_eq!(trie.len(), twin.len());
    }
});
