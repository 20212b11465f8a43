use compact_trie::CompactTrie;

pub fn main() {
    let mut trie = CompactTrie::new();
    for word in ["", "hola", "hola", "hi", "bu", "bubu", "ho"] {
        trie.insert(word.chars());
    }

    println!("Stored {} words in {} nodes.", trie.len(), trie.node_count());
    for word in ["", "h", "ho", "hol", "hola", "hi", "bu", "bub"] {
        println!(
            "{word:>6}: search = {:<5} has_prefix = {}",
            trie.search(word.chars()),
            trie.has_prefix(word.chars())
        );
    }

    trie.remove("bu".chars());
    println!(
        "After removing \"bu\": search(\"bubu\") = {}, {} nodes.",
        trie.search("bubu".chars()),
        trie.node_count()
    );
}
