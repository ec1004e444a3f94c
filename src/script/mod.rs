//! The declarator script language.
//!
//! A script is a flat list of four statement kinds:
//!
//! ```text
//! project('cobol dependency test', 'cobol')
//!
//! libx = dependency('libX', required: false)
//! libxtest = dependency('libXTest', modules: ['test'], required: false)
//!
//! skip_if(not libx.found() or not libxtest.found(), 'Need libX dependency')
//!
//! executable('App', 'app.src', dependencies: libx)
//! executable('Test', 'test.src', dependencies: libxtest)
//! ```
//!
//! Malformed scripts are rejected here, before anything is resolved.

pub mod ast;
pub mod lexer;
pub mod parser;

use std::path::Path;

use anyhow::{Context, Result};
use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::core::Project;

pub use ast::{Condition, ExecutableDecl, Located, Span, Statement};

/// Default script file name.
pub const SCRIPT_NAME: &str = "declare.build";

/// A syntax or static-check error, located by byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
    pub help: Option<String>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        SyntaxError {
            message: message.into(),
            span,
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// A parse failure with the offending source attached for rendering.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("{message}")]
#[diagnostic(code(declarator::script::parse))]
pub struct ParseError {
    pub message: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: SourceSpan,
    #[help]
    pub help: Option<String>,
}

impl ParseError {
    fn new(err: SyntaxError, name: &str, source: &str) -> Self {
        ParseError {
            message: err.message,
            src: NamedSource::new(name, source.to_string()),
            span: err.span.into(),
            help: err.help,
        }
    }

    /// 1-based line of the error.
    pub fn line(&self, source: &str) -> usize {
        let offset = self.span.offset().min(source.len());
        source[..offset].matches('\n').count() + 1
    }
}

/// A parsed script.
#[derive(Debug, Clone)]
pub struct Script {
    name: String,
    statements: Vec<Located>,
}

impl Script {
    /// Parse script source. `name` is used in diagnostics.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Script, ParseError> {
        let name = name.into();
        let statements =
            parser::parse_statements(source).map_err(|e| ParseError::new(e, &name, source))?;
        tracing::debug!("parsed {} statements from {}", statements.len(), name);
        Ok(Script { name, statements })
    }

    /// Read and parse a script file.
    pub fn from_file(path: &Path) -> Result<Script> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script: {}", path.display()))?;
        Ok(Script::parse(path.display().to_string(), &source)?)
    }

    /// Name used in diagnostics (usually the file path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Statements in source order; the first is always `project()`.
    pub fn statements(&self) -> &[Located] {
        &self.statements
    }

    /// The declared project.
    pub fn project(&self) -> Option<&Project> {
        self.statements.iter().find_map(|l| match &l.statement {
            Statement::Project(project) => Some(project),
            _ => None,
        })
    }

    /// Names of the declared executables, in order.
    pub fn executable_names(&self) -> Vec<&str> {
        self.statements
            .iter()
            .filter_map(|l| match &l.statement {
                Statement::Executable(decl) => Some(decl.name.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_accessors() {
        let script = Script::parse(
            "declare.build",
            "project('p', 'c')\nexecutable('a', 'a.c')\nexecutable('b', 'b.c')\n",
        )
        .unwrap();
        assert_eq!(script.name(), "declare.build");
        assert_eq!(script.project().unwrap().name(), "p");
        assert_eq!(script.executable_names(), vec!["a", "b"]);
        assert_eq!(script.statements()[1].statement.keyword(), "executable");
    }

    #[test]
    fn test_parse_error_carries_source() {
        let source = "project('p')\nx = dependency('x', optional: true)\n";
        let err = Script::parse("bad.build", source).unwrap_err();
        assert_eq!(err.span.offset(), 33);
        assert_eq!(err.line(source), 2);
        assert!(err.help.as_deref().unwrap().contains("required"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Script::from_file(Path::new("/nonexistent/declare.build")).unwrap_err();
        assert!(err.to_string().contains("failed to read script"));
    }
}
