//! Automatic test discovery for script sources
//!
//! Scans JavaScript files for function declarations (`function name(`) and
//! arrow bindings (`const name = (`) using a logos tokenizer, and turns each
//! one into a "should not throw" test case.

use logos::Logos;
use selftest_case::TestCase;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Script tokens relevant to declaration scanning
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    /// function keyword
    #[token("function")]
    Function,

    /// const keyword
    #[token("const")]
    Const,

    /// Identifier (keywords above win on equal length)
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,

    /// Number literal
    #[regex(r"[0-9][0-9a-zA-Z_.]*")]
    Number,

    /// String literal, single, double or template quoted
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    #[regex(r"`([^`\\]|\\.)*`")]
    String,

    /// Left parenthesis (()
    #[token("(")]
    Lparen,

    /// Assignment (=)
    #[token("=")]
    Assign,

    /// Comparison (== or ===)
    #[regex(r"===?")]
    Equality,

    /// Arrow (=>)
    #[token("=>")]
    Arrow,

    /// Line and block comments (ignored)
    #[regex(r"//[^\n]*", logos::skip)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", logos::skip)]
    Comment,

    /// Whitespace (ignored)
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Whitespace,

    /// Any other character
    Other,
}

/// How a discovered function was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeclarationKind {
    /// `function name(`
    Function,
    /// `const name = (`
    Arrow,
}

/// A callable name found in a script source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
}

impl Declaration {
    /// Build the "should not throw" case for this declaration
    #[must_use]
    pub fn to_test_case(&self) -> TestCase {
        let name = &self.name;
        TestCase::new(
            format!("Auto: {name}() should not throw"),
            format!(
                "if (typeof {name} === \"function\") {{\n  {name}();\n  expect(true).toBeTruthy();\n}} else {{\n  throw new Error(\"{name} is not a function\");\n}}\n"
            ),
        )
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DiscoveryError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DiscoveryError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Find declarations in a script source.
///
/// All `function` declarations come first in source order, followed by all
/// arrow bindings in source order. Names inside comments and string literals
/// are not reported.
#[must_use]
pub fn scan_source(source: &str) -> Vec<Declaration> {
    let tokens = tokenize(source);

    let mut declarations = Vec::new();
    for (i, window) in tokens.windows(3).enumerate() {
        if let [(Token::Function, _), (Token::Ident, name), (Token::Lparen, _)] = window {
            declarations.push(Declaration {
                name: source[name.clone()].to_string(),
                kind: DeclarationKind::Function,
            });
        }
        if let (
            [(Token::Const, _), (Token::Ident, name), (Token::Assign, _)],
            Some((Token::Lparen, _)),
        ) = (window, tokens.get(i + 3))
        {
            declarations.push(Declaration {
                name: source[name.clone()].to_string(),
                kind: DeclarationKind::Arrow,
            });
        }
    }

    // stable: keeps source order within each kind
    declarations.sort_by_key(|d| d.kind);
    declarations
}

/// Lex `source`, recovering from errors one character at a time.
///
/// An unterminated quote (a regex literal such as `/'/`, stray JSX text) makes
/// logos report an error spanning everything it tried to match as a string,
/// so lexing resumes right after the offending character instead.
fn tokenize(source: &str) -> Vec<(Token, Range<usize>)> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    'relex: while offset < source.len() {
        let mut lexer = Token::lexer(&source[offset..]);
        while let Some(token) = lexer.next() {
            let span = lexer.span();
            let start = offset + span.start;
            match token {
                Ok(token) => tokens.push((token, start..offset + span.end)),
                Err(()) => {
                    let width = source[start..].chars().next().map_or(1, char::len_utf8);
                    tokens.push((Token::Other, start..start + width));
                    offset = start + width;
                    continue 'relex;
                }
            }
        }
        break;
    }

    tokens
}

/// Discover test cases under `path`.
///
/// A file is scanned directly. A directory has every `*.js` file directly
/// inside it scanned, in file-name order; subdirectories are not entered.
/// Selection goes by extension, so a file named just `.js` is skipped.
///
/// # Errors
///
/// Returns `DiscoveryError::Io` if the path or any selected file cannot be read
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn discover(path: &Path) -> Result<Vec<TestCase>, DiscoveryError> {
    let metadata = fs::metadata(path).map_err(|e| DiscoveryError::io(path, e))?;

    let files = if metadata.is_file() {
        vec![path.to_path_buf()]
    } else if metadata.is_dir() {
        script_files(path)?
    } else {
        Vec::new()
    };

    let mut cases = Vec::new();
    for file in &files {
        let source = fs::read_to_string(file).map_err(|e| DiscoveryError::io(file, e))?;
        let declarations = scan_source(&source);
        debug!(
            file = %file.display(),
            found = declarations.len(),
            "scanned script"
        );
        cases.extend(declarations.iter().map(Declaration::to_test_case));
    }

    Ok(cases)
}

fn script_files(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let entries = fs::read_dir(dir).map_err(|e| DiscoveryError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DiscoveryError::io(dir, e))?;
        let path = entry.path();
        let is_script = path.extension().is_some_and(|ext| ext == "js");
        if is_script && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
