// File: src/core/tokenizer.rs
use crate::core::types::{KeyEvent, Word};
use std::collections::HashSet;

/// Keys that end the word being typed.
pub const DEFAULT_BOUNDARIES: &[&str] = &[
    "<space>", "<enter>", "<tab>", ".", ",", "!", "?", ";", ":", "(", ")", "[", "]", "{", "}",
    "\"", "'",
];

/// The key that removes the last typed character.
pub const DEFAULT_DELETE_KEY: &str = "<backspace>";

/// Word-boundary and edit rules for the tokenizer.
#[derive(Debug, Clone)]
pub struct TokenizerRules {
    pub boundaries: HashSet<KeyEvent>,
    pub delete: KeyEvent,
}

impl TokenizerRules {
    pub fn new<I, S>(boundaries: I, delete: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            boundaries: boundaries.into_iter().map(|b| KeyEvent::parse(b.as_ref())).collect(),
            delete: KeyEvent::parse(delete),
        }
    }
}

impl Default for TokenizerRules {
    fn default() -> Self {
        Self::new(DEFAULT_BOUNDARIES, DEFAULT_DELETE_KEY)
    }
}

/// Lazily turns a time-ordered stream of key events into words.
///
/// Boundary keys finish the current word, the delete key pops its last
/// character, printable characters are appended lowercased, and every other
/// event (modifiers, unknown controls) is skipped.
pub struct Tokenizer<'r, I> {
    events: I,
    rules: &'r TokenizerRules,
    current: String,
}

impl<'r, I> Tokenizer<'r, I>
where
    I: Iterator<Item = KeyEvent>,
{
    pub fn new(events: I, rules: &'r TokenizerRules) -> Self {
        Self { events, rules, current: String::new() }
    }

    fn take_current(&mut self) -> Option<Word> {
        if self.current.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.current))
        }
    }
}

impl<I> Iterator for Tokenizer<'_, I>
where
    I: Iterator<Item = KeyEvent>,
{
    type Item = Word;

    fn next(&mut self) -> Option<Word> {
        while let Some(event) = self.events.next() {
            if self.rules.boundaries.contains(&event) {
                if let Some(word) = self.take_current() {
                    return Some(word);
                }
            } else if event == self.rules.delete {
                self.current.pop();
            } else if let Some(c) = event.printable() {
                self.current.extend(c.to_lowercase());
            }
        }
        // Stream exhausted: flush whatever is still being typed.
        self.take_current()
    }
}

/// Convenience wrapper collecting every word of an event stream.
pub fn tokenize<I>(events: I, rules: &TokenizerRules) -> Vec<Word>
where
    I: IntoIterator<Item = KeyEvent>,
{
    Tokenizer::new(events.into_iter(), rules).collect()
}
