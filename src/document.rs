use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use indexmap::map::Iter;

use crate::error::{Error, Result, UsageError};
use crate::parser::{self, Line, Lines};
use crate::section::Section;
use crate::value::Value;

/// Parsed values: section name to key name to value.
pub type Table = IndexMap<String, IndexMap<String, Value>>;

/// All sections of one configuration source, plus the single parse of that source.
///
/// Sections registered before parsing act as a schema: their declared types constrain the parsed
/// values and their defaults fill in keys missing from the input.
#[derive(Debug, Default)]
pub struct Document {
    sections: IndexMap<String, Section>,
    file_name: Option<PathBuf>,
    content: Option<String>,
    result: Option<Table>,
}

/// Where the line cursor stands while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State<'a> {
    BeforeAnySection,
    InSection(&'a str),
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document pre-seeded with schema sections.
    ///
    /// ```
    /// use tini::{Document, Section};
    ///
    /// let doc = Document::with_sections([("server", Section::from([("timeout", 30)]))]);
    /// assert!(doc.contains_section("server"));
    /// ```
    pub fn with_sections<I, K, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<Section>,
    {
        Self {
            sections: sections
                .into_iter()
                .map(|(name, section)| (name.into(), section.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// The section called `name`, registering an empty one if there is none yet.
    pub fn section(&mut self, name: &str) -> &mut Section {
        self.sections.entry(name.to_owned()).or_default()
    }

    #[must_use]
    pub fn get_section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Register `section` under `name`, returning the section it replaces.
    pub fn set_section(
        &mut self,
        name: impl Into<String>,
        section: impl Into<Section>,
    ) -> Option<Section> {
        self.sections.insert(name.into(), section.into())
    }

    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no section is called `name`.
    pub fn remove_section(&mut self, name: &str) -> Result<Section> {
        self.sections
            .shift_remove(name)
            .ok_or_else(|| Error::key_not_found(name))
    }

    #[must_use]
    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, Section> {
        self.sections.iter()
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// The result of a successful parse.
    #[must_use]
    pub fn result(&self) -> Option<&Table> {
        self.result.as_ref()
    }

    /// Read the file at `path` and [`parse`](Self::parse) its content.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::AlreadyRead`] if this document has already been given a file,
    /// [`Error::Io`] if the file cannot be read, and any error of [`parse`](Self::parse).
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<&Table> {
        let path = path.as_ref();

        if let Some(previous) = &self.file_name {
            return Err(UsageError::AlreadyRead {
                path: previous.clone(),
            }
            .into());
        }
        self.file_name = Some(path.to_owned());

        tracing::debug!(path = %path.display(), "reading configuration file");
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;

        self.parse(content)
    }

    /// Parse `text` against the registered sections and apply their defaults.
    ///
    /// A document parses exactly once; the first error aborts the parse and leaves
    /// [`result`](Self::result) unset.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::AlreadyParsed`] on a second call, and [`Error::Parse`] for the first
    /// malformed line.
    pub fn parse(&mut self, text: impl Into<String>) -> Result<&Table> {
        if self.content.is_some() {
            return Err(UsageError::AlreadyParsed.into());
        }
        let content: &str = self.content.insert(text.into());

        let mut result = Table::new();
        let mut state = State::BeforeAnySection;

        for (n, line) in Lines::new(content) {
            match parser::classify(n, line)? {
                Line::Blank | Line::Comment => {}
                Line::Header(name) => {
                    tracing::debug!(line = n, section = name, "entering section");
                    state = State::InSection(name);
                }
                Line::KeyValue(line) => {
                    let State::InSection(name) = state else {
                        return Err(Error::parse(n, line));
                    };
                    let section = self.sections.entry(name.to_owned()).or_default();
                    let (key, value) = section.parse_key_value(n, line)?;

                    tracing::trace!(line = n, section = name, key = %key, ?value, "parsed value");
                    result
                        .entry(name.to_owned())
                        .or_default()
                        .insert(key, value);
                }
            }
        }

        let defaults = merge_defaults(&self.sections, &mut result);
        tracing::debug!(
            sections = result.len(),
            keys = result.values().map(IndexMap::len).sum::<usize>(),
            defaults,
            "parsed configuration"
        );

        Ok(&*self.result.insert(result))
    }
}

/// Insert every declared default whose key is missing from `result`, returning how many were added.
fn merge_defaults(sections: &IndexMap<String, Section>, result: &mut Table) -> usize {
    let mut added = 0;

    for (name, section) in sections {
        for (key, default) in section.defaults() {
            let values = result.entry(name.clone()).or_default();

            if !values.contains_key(key) {
                values.insert(key.to_owned(), default.clone());
                added += 1;
            }
        }
    }

    added
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Section);
    type IntoIter = Iter<'a, String, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}
