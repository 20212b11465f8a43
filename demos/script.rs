//! Runs a command script against a fresh trie.
//!
//! ```text
//! cargo run --example script -- demos/fixtures/commands.txt demos/fixtures/expected.txt [report.txt]
//! ```
//!
//! Set `RUST_LOG=compact_trie=debug` to log every command.

use std::{env, fs};

use compact_trie::{CompactTrie, Script};
use tracing_subscriber::EnvFilter;

fn main() -> compact_trie::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = env::args().skip(1).collect::<Vec<_>>();
    let (Some(commands), Some(expectations)) = (args.first(), args.get(1)) else {
        eprintln!("usage: script <commands> <expectations> [report]");
        std::process::exit(2);
    };

    let script = Script::from_files(commands, expectations)?;
    let report = script.run(&mut CompactTrie::new());

    match args.get(2) {
        Some(output) => fs::write(output, format!("{report}\n"))?,
        None => println!("{report}"),
    }

    if !report.passed() {
        std::process::exit(1);
    }
    Ok(())
}
