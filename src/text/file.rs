use std::path::Path;
use std::rc::Rc;

use crate::diagnostics::SourceDiagnostic;
use crate::text::{Position, Reader, ReaderOptions};
use crate::ParsleyError;

/// A named source text.
///
/// Files hand out [`Reader`]s over their content and turn engine errors into positioned,
/// renderable diagnostics.
#[derive(Debug, Clone)]
pub struct File {
    name: String,
    text: Rc<str>,
}

impl File {
    pub fn new(name: impl Into<String>, text: impl Into<Rc<str>>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Reads a file from disk, naming it after its path.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(path.display().to_string(), text))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn reader(&self, options: ReaderOptions) -> Reader {
        Reader::with_options(Rc::clone(&self.text), options)
    }

    /// Formats a position as `name:line:column`.
    ///
    /// ```rust
    /// use parsley::text::{File, Position};
    /// let file = File::new("testfile", "a\nb");
    /// assert_eq!(file.position_string(Position::new(2, 2, 1)), "testfile:2:1");
    /// ```
    pub fn position_string(&self, pos: Position) -> String {
        if self.name.is_empty() {
            pos.to_string()
        } else {
            format!("{}:{}", self.name, pos)
        }
    }

    /// Formats an error as `name:line:column: message`.
    pub fn error_string(&self, err: &ParsleyError) -> String {
        match err.pos() {
            Some(pos) => format!("{}: {}", self.position_string(pos), err),
            None => format!("{}: {}", self.name, err),
        }
    }

    /// Bundles `err` with this file's source for `miette` rendering.
    pub fn diagnostic(&self, err: ParsleyError) -> SourceDiagnostic {
        SourceDiagnostic::new(err, &self.name, &self.text)
    }
}
