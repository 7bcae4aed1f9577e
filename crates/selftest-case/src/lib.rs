//! Test case definitions for Selftest
//!
//! A [`Suite`] is an ordered list of named script snippets. The snippets are
//! opaque here; only the external engine interprets them.

use serde::{Deserialize, Serialize};

/// A named snippet of engine code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub code: String,
}

impl TestCase {
    #[must_use]
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// Ordered collection of test cases, executed by the engine in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Suite {
    cases: Vec<TestCase>,
}

impl Suite {
    #[must_use]
    pub const fn new() -> Self {
        Self { cases: Vec::new() }
    }

    /// Append a case. Names need not be unique and may be empty.
    pub fn register(&mut self, name: impl Into<String>, code: impl Into<String>) -> &mut Self {
        self.cases.push(TestCase::new(name, code));
        self
    }

    #[must_use]
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    /// Serialize in request-file format: a pretty-printed JSON array of `{name, code}`
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.cases)
    }

    /// Load a case list written in request-file format
    ///
    /// # Errors
    ///
    /// Returns `SuiteError::Parse` if the input is not a JSON array of `{name, code}` objects
    pub fn from_json(input: &str) -> Result<Self, SuiteError> {
        let cases: Vec<TestCase> = serde_json::from_str(input)?;
        Ok(Self { cases })
    }
}

impl Extend<TestCase> for Suite {
    fn extend<I: IntoIterator<Item = TestCase>>(&mut self, iter: I) {
        self.cases.extend(iter);
    }
}

impl FromIterator<TestCase> for Suite {
    fn from_iter<I: IntoIterator<Item = TestCase>>(iter: I) -> Self {
        Self {
            cases: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Suite {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

impl IntoIterator for Suite {
    type Item = TestCase;
    type IntoIter = std::vec::IntoIter<TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.into_iter()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SuiteError {
    #[error("invalid case list: {0}")]
    Parse(#[from] serde_json::Error),
}
