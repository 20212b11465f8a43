//! Command scripts for exercising a [CompactTrie] from text fixtures.
//!
//! A script is a comma separated list of commands such as
//! `insert("hola"),search("hola"),has_prefix("ho"),remove("hola")`, paired
//! with a comma separated list of booleans holding the expected result of
//! every query (`search` and `has_prefix`, in order). Running a script
//! produces a [Report] with a line per command and pass/fail counts.
//!
//! ```
//! use compact_trie::{CompactTrie, Script};
//!
//! let script = Script::parse(
//!     r#"insert("hola"),insert("hi"),search("ho"),has_prefix("ho")"#,
//!     "false,true",
//! ).unwrap();
//!
//! let report = script.run(&mut CompactTrie::new());
//! assert!(report.passed());
//! assert_eq!(report.insertions, 2);
//! ```

use std::{fmt, fs, path::Path};

use crate::{CompactTrie, Result, ScriptError};

/// A single operation on the trie.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Command {
    Insert(String),
    Remove(String),
    Search(String),
    HasPrefix(String),
}

impl Command {
    /// Parses a `name("word")` command. `startsWith` is accepted as another
    /// name for `has_prefix`. Returns [None] for anything not understood.
    ///
    /// ```
    /// use compact_trie::Command;
    ///
    /// assert_eq!(Command::parse(r#"remove("bu")"#), Some(Command::Remove("bu".into())));
    /// assert_eq!(Command::parse(r#"startsWith("")"#), Some(Command::HasPrefix("".into())));
    /// assert_eq!(Command::parse("insert(bu)"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let (name, rest) = text.trim().split_once('(')?;
        let word = rest
            .strip_suffix(')')?
            .trim()
            .strip_prefix('"')?
            .strip_suffix('"')?
            .to_string();

        match name.trim() {
            "insert" => Some(Command::Insert(word)),
            "remove" => Some(Command::Remove(word)),
            "search" => Some(Command::Search(word)),
            "has_prefix" | "startsWith" => Some(Command::HasPrefix(word)),
            _ => None,
        }
    }
    /// The word or prefix the command operates on.
    pub fn word(&self) -> &str {
        match self {
            Command::Insert(word)
            | Command::Remove(word)
            | Command::Search(word)
            | Command::HasPrefix(word) => word,
        }
    }
    /// Whether the command produces a result to check.
    pub fn is_query(&self) -> bool {
        matches!(self, Command::Search(_) | Command::HasPrefix(_))
    }
    /// Applies the command to a trie, returning the result for queries.
    pub fn apply(&self, trie: &mut CompactTrie) -> Option<bool> {
        match self {
            Command::Insert(word) => {
                trie.insert(word.chars());
                None
            }
            Command::Remove(word) => {
                trie.remove(word.chars());
                None
            }
            Command::Search(word) => Some(trie.search(word.chars())),
            Command::HasPrefix(prefix) => Some(trie.has_prefix(prefix.chars())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::Insert(_) => "insert",
            Command::Remove(_) => "remove",
            Command::Search(_) => "search",
            Command::HasPrefix(_) => "has_prefix",
        };
        write!(f, "{name}(\"{}\")", self.word())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Mutate(Command),
    Query { command: Command, expected: bool },
    Unrecognized(String),
}

/// A parsed command script, with every query paired with its
/// expected result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    /// Parses the command text and the expectation text. Commands may span
    /// several lines. Unrecognized commands are kept and reported when the
    /// script runs.
    ///
    /// # Errors
    /// If a quote is left open, if an expectation is not `true` or `false`,
    /// or if there are fewer expectations than queries.
    pub fn parse(commands: &str, expectations: &str) -> Result<Self> {
        let mut expected = parse_expectations(expectations)?.into_iter();

        let mut steps = vec![];
        let mut queries = 0;
        for line in commands.lines() {
            for text in split_commands(line)? {
                let step = match Command::parse(text) {
                    Some(command) if command.is_query() => {
                        let expected = expected
                            .next()
                            .ok_or(ScriptError::MissingExpectation { index: queries })?;
                        queries += 1;
                        Step::Query { command, expected }
                    }
                    Some(command) => Step::Mutate(command),
                    None => Step::Unrecognized(text.to_string()),
                };
                steps.push(step);
            }
        }

        if expected.len() > 0 {
            tracing::warn!(unused = expected.len(), "more expectations than queries");
        }
        Ok(Self { steps })
    }
    /// Reads a script from a command file and an expectation file.
    ///
    /// # Errors
    /// If either file cannot be read, or for any reason given
    /// in [Script::parse].
    pub fn from_files(
        commands: impl AsRef<Path>,
        expectations: impl AsRef<Path>,
    ) -> Result<Self> {
        let commands = fs::read_to_string(commands)?;
        let expectations = fs::read_to_string(expectations)?;
        Self::parse(&commands, &expectations)
    }
    /// The amount of commands in the script, unrecognized ones included.
    pub fn len(&self) -> usize {
        self.steps.len()
    }
    /// Returns true if the script has no commands.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
    /// Runs every command in order against `trie`.
    pub fn run(&self, trie: &mut CompactTrie) -> Report {
        let mut report = Report::default();
        for step in &self.steps {
            let entry = match step {
                Step::Mutate(command) => {
                    command.apply(trie);
                    Entry::Applied(command.clone())
                }
                Step::Query { command, expected } => {
                    let actual = command.apply(trie).unwrap_or_default();
                    Entry::Checked(Outcome {
                        command: command.clone(),
                        actual,
                        expected: *expected,
                    })
                }
                Step::Unrecognized(text) => {
                    tracing::warn!(command = %text, "unable to understand command");
                    Entry::Misunderstood(text.clone())
                }
            };
            tracing::debug!(entry = %entry, "ran command");
            report.record(entry);
        }

        tracing::info!(
            commands = report.commands,
            misunderstood = report.misunderstood,
            searches_passed = report.searches_passed,
            searches = report.searches,
            prefix_checks_passed = report.prefix_checks_passed,
            prefix_checks = report.prefix_checks,
            "script finished"
        );
        report
    }
}

/// Splits a line on the commas that are not inside a quoted word.
fn split_commands(line: &str) -> Result<Vec<&str>> {
    let mut items = vec![];
    let mut start = 0;
    let mut quote = None;
    for (column, c) in line.char_indices() {
        match c {
            '"' => quote = if quote.is_some() { None } else { Some(column) },
            ',' if quote.is_none() => {
                items.push(&line[start..column]);
                start = column + 1;
            }
            _ => {}
        }
    }
    if let Some(column) = quote {
        return Err(ScriptError::UnterminatedQuote { column });
    }
    items.push(&line[start..]);

    Ok(items
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect())
}

fn parse_expectations(text: &str) -> Result<Vec<bool>> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .enumerate()
        .map(|(index, item)| {
            item.parse::<bool>()
                .map_err(|_| ScriptError::InvalidExpectation {
                    index,
                    found: item.to_string(),
                })
        })
        .collect()
}

/// The result of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Outcome {
    pub command: Command,
    pub actual: bool,
    pub expected: bool,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        self.actual == self.expected
    }
}

/// One line of a [Report].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Entry {
    /// An insertion or removal.
    Applied(Command),
    /// A query together with its expected result.
    Checked(Outcome),
    /// Text that could not be parsed as a command.
    Misunderstood(String),
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Applied(Command::Remove(word)) => write!(f, "removed word:.....\"{word}\""),
            Entry::Applied(command) => write!(f, "inserted word:....\"{}\"", command.word()),
            Entry::Checked(outcome) => {
                let heading = match outcome.command {
                    Command::HasPrefix(_) => "checked prefix:...",
                    _ => "searched word:....",
                };
                write!(
                    f,
                    "{heading}\"{}\"\tresult: {} expected: {} passed: {}",
                    outcome.command.word(),
                    outcome.actual,
                    outcome.expected,
                    outcome.passed()
                )
            }
            Entry::Misunderstood(text) => write!(f, "Unable to understand command: {text}"),
        }
    }
}

/// The log and the counters of a script run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Report {
    pub entries: Vec<Entry>,
    pub commands: usize,
    pub misunderstood: usize,
    pub insertions: usize,
    pub removals: usize,
    pub searches: usize,
    pub searches_passed: usize,
    pub prefix_checks: usize,
    pub prefix_checks_passed: usize,
}

impl Report {
    fn record(&mut self, entry: Entry) {
        self.commands += 1;
        match &entry {
            Entry::Applied(Command::Remove(_)) => self.removals += 1,
            Entry::Applied(_) => self.insertions += 1,
            Entry::Checked(outcome) => {
                let passed = usize::from(outcome.passed());
                if let Command::HasPrefix(_) = outcome.command {
                    self.prefix_checks += 1;
                    self.prefix_checks_passed += passed;
                } else {
                    self.searches += 1;
                    self.searches_passed += passed;
                }
            }
            Entry::Misunderstood(_) => self.misunderstood += 1,
        }
        self.entries.push(entry);
    }
    /// Returns true if every query gave its expected result.
    pub fn passed(&self) -> bool {
        self.searches_passed == self.searches && self.prefix_checks_passed == self.prefix_checks
    }
    /// The queries whose result did not match the expectation.
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Checked(outcome) if !outcome.passed() => Some(outcome),
            _ => None,
        })
    }
}

/// Formats `part` as a percentage of `whole`.
fn share(part: usize, whole: usize) -> String {
    if whole == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1}%", part as f64 * 100.0 / whole as f64)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        let total = self.commands;
        writeln!(f, "-------------------------------------------------------")?;
        writeln!(f, "Summary of the experiment:")?;
        writeln!(f, "  Commands attempted:............ {total}")?;
        writeln!(
            f,
            "  Misunderstood commands:........ {} ({} of all commands)",
            self.misunderstood,
            share(self.misunderstood, total)
        )?;
        writeln!(
            f,
            "  Insertions:.................... {} ({} of all commands)",
            self.insertions,
            share(self.insertions, total)
        )?;
        writeln!(
            f,
            "  Removals:...................... {} ({} of all commands)",
            self.removals,
            share(self.removals, total)
        )?;
        writeln!(
            f,
            "  Searches:...................... {} ({} of all commands)",
            self.searches,
            share(self.searches, total)
        )?;
        writeln!(
            f,
            "    Successful searches:......... {} ({} of all searches)",
            self.searches_passed,
            share(self.searches_passed, self.searches)
        )?;
        writeln!(
            f,
            "  Prefix checks:................. {} ({} of all commands)",
            self.prefix_checks,
            share(self.prefix_checks, total)
        )?;
        write!(
            f,
            "    Successful prefix checks:.... {} ({} of all prefix checks)",
            self.prefix_checks_passed,
            share(self.prefix_checks_passed, self.prefix_checks)
        )
    }
}
