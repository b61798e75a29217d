//! Collaborator interfaces consumed by the calculator.
//!
//! The engine itself never evaluates expressions, touches storage or reads
//! the clipboard. The calculator page reaches those through the traits below;
//! hosts provide the implementations.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use thiserror_no_std::Error;

/// Failure reported by an [`Evaluator`], with a human-readable message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Unexpected '{found}' at {position}")]
    Unexpected { found: char, position: usize },
    #[error("Incomplete expression")]
    UnexpectedEnd,
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Result is not a number")]
    NotFinite,
    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("List '{0}' not found")]
    NotFound(String),
    #[error("Storage failure: {0}")]
    Io(String),
}

/// Arithmetic expression evaluator.
pub trait Evaluator {
    fn evaluate(&self, expression: &str) -> Result<f64, EvalError>;
}

impl<F> Evaluator for F
where
    F: Fn(&str) -> Result<f64, EvalError>,
{
    fn evaluate(&self, expression: &str) -> Result<f64, EvalError> {
        self(expression)
    }
}

/// Named, line-oriented list persistence.
pub trait ListStore {
    fn load_list(&mut self, name: &str) -> Result<Vec<String>, StoreError>;
    fn save_list(&mut self, name: &str, items: &[String]) -> Result<(), StoreError>;
}

/// System clipboard access.
pub trait Clipboard {
    fn text(&mut self) -> Option<String>;
    fn set_text(&mut self, text: &str);
}

/// The collaborators a calculator page talks to, bundled for one call site.
pub struct Services<E, S, C> {
    pub evaluator: E,
    pub store: S,
    pub clipboard: C,
}

/// Split stored list contents into entries, skipping blank lines.
pub fn parse_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Join entries into the stored line format.
pub fn join_lines(items: &[String]) -> String {
    let mut contents = String::new();
    for item in items {
        contents.push_str(item);
        contents.push('\n');
    }
    contents
}

/// In-memory [`ListStore`], holding each list in its stored text form.
#[derive(Debug, Default)]
pub struct MemoryStore {
    lists: Vec<(String, String)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored text of a list, as a file-backed store would hold it.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.lists
            .iter()
            .find(|(list, _)| list == name)
            .map(|(_, contents)| contents.as_str())
    }

    /// Store raw text under `name`, replacing any previous contents.
    pub fn insert_raw(&mut self, name: &str, contents: &str) {
        match self.lists.iter_mut().find(|(list, _)| list == name) {
            Some((_, existing)) => *existing = contents.to_string(),
            None => self.lists.push((name.to_string(), contents.to_string())),
        }
    }
}

impl ListStore for MemoryStore {
    fn load_list(&mut self, name: &str) -> Result<Vec<String>, StoreError> {
        self.raw(name)
            .map(parse_lines)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn save_list(&mut self, name: &str, items: &[String]) -> Result<(), StoreError> {
        self.insert_raw(name, &join_lines(items));
        Ok(())
    }
}

/// Process-local [`Clipboard`].
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn text(&mut self) -> Option<String> {
        self.contents.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.contents = Some(text.to_string());
    }
}
