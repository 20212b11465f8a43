#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use compact_trie::CompactTrie;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    let Ok(mut trie) = CompactTrie::<u8>::arbitrary(&mut unstructured) else {
        return;
    };
    let Ok(word) = Vec::<u8>::arbitrary(&mut unstructured) else {
        return;
    };

    trie.insert(word.iter().copied());
    assert!(trie.search(word.iter().copied()));
    for end in 0..=word.len() {
        assert!(trie.has_prefix(word[..end].iter().copied()));
    }

    trie.remove(word.iter().copied());
    assert!(!trie.search(word.iter().copied()));
});
