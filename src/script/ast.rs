//! Parsed script statements.

use std::path::PathBuf;

use crate::core::{DeclareError, DependencySpec, Project};

/// Byte range in the script source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Smallest span covering both.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.len()).into()
    }
}

/// One statement of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `project('name', 'lang', version: '1.0')`
    Project(Project),

    /// `var = dependency('name', modules: [...], required: false)`
    Dependency {
        binding: String,
        spec: DependencySpec,
    },

    /// `skip_if(condition, 'message')`
    SkipIf { condition: Condition, message: String },

    /// `executable('name', sources, dependencies: [...])`
    Executable(ExecutableDecl),
}

impl Statement {
    /// Function name as written in the script.
    pub fn keyword(&self) -> &'static str {
        match self {
            Statement::Project(_) => "project",
            Statement::Dependency { .. } => "dependency",
            Statement::SkipIf { .. } => "skip_if",
            Statement::Executable(_) => "executable",
        }
    }
}

/// A statement together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub statement: Statement,
    pub span: Span,
    /// 1-based line number
    pub line: usize,
}

/// An `executable()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableDecl {
    pub name: String,
    pub sources: Vec<PathBuf>,
    /// Dependency bindings, in declaration order
    pub dependencies: Vec<String>,
}

/// Boolean condition of a `skip_if()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Literal(bool),
    /// `var.found()`
    Found(String),
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    /// `not var.found()`
    pub fn not_found(binding: impl Into<String>) -> Self {
        Condition::Not(Box::new(Condition::Found(binding.into())))
    }

    pub fn or(self, other: Condition) -> Self {
        Condition::Or(Box::new(self), Box::new(other))
    }

    pub fn and(self, other: Condition) -> Self {
        Condition::And(Box::new(self), Box::new(other))
    }

    /// Evaluate against the `found` flags of resolved bindings.
    ///
    /// `and`/`or` short-circuit, but every binding is checked for
    /// existence first so that a typo never hides behind a short-circuit.
    pub fn evaluate<F>(&self, found: &F) -> Result<bool, DeclareError>
    where
        F: Fn(&str) -> Option<bool>,
    {
        for name in self.bindings() {
            if found(name).is_none() {
                return Err(DeclareError::UnknownBinding {
                    name: name.to_string(),
                });
            }
        }
        Ok(self.eval_checked(found))
    }

    fn eval_checked<F>(&self, found: &F) -> bool
    where
        F: Fn(&str) -> Option<bool>,
    {
        match self {
            Condition::Literal(value) => *value,
            Condition::Found(name) => found(name).unwrap_or(false),
            Condition::Not(inner) => !inner.eval_checked(found),
            Condition::And(lhs, rhs) => lhs.eval_checked(found) && rhs.eval_checked(found),
            Condition::Or(lhs, rhs) => lhs.eval_checked(found) || rhs.eval_checked(found),
        }
    }

    /// Bindings referenced by the condition, in source order.
    pub fn bindings(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_bindings(&mut out);
        out
    }

    fn collect_bindings<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Condition::Literal(_) => {}
            Condition::Found(name) => out.push(name),
            Condition::Not(inner) => inner.collect_bindings(out),
            Condition::And(lhs, rhs) | Condition::Or(lhs, rhs) => {
                lhs.collect_bindings(out);
                rhs.collect_bindings(out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<bool> {
        match name {
            "libx" => Some(true),
            "libxtest" => Some(false),
            _ => None,
        }
    }

    #[test]
    fn test_condition_or_of_not_found() {
        let cond = Condition::not_found("libx").or(Condition::not_found("libxtest"));
        assert!(cond.evaluate(&lookup).unwrap());

        let cond = Condition::not_found("libx").and(Condition::not_found("libxtest"));
        assert!(!cond.evaluate(&lookup).unwrap());
    }

    #[test]
    fn test_unknown_binding_is_reported_even_when_short_circuited() {
        let cond = Condition::Literal(true).or(Condition::Found("typo".into()));
        assert_eq!(
            cond.evaluate(&lookup).unwrap_err(),
            DeclareError::UnknownBinding {
                name: "typo".into()
            }
        );
    }

    #[test]
    fn test_bindings_in_source_order() {
        let cond = Condition::not_found("a")
            .or(Condition::Found("b".into()).and(Condition::Literal(false)));
        assert_eq!(cond.bindings(), vec!["a", "b"]);
    }

    #[test]
    fn test_span_to() {
        assert_eq!(Span::new(4, 6).to(Span::new(1, 3)), Span::new(1, 6));
        assert_eq!(Span::new(2, 2).len(), 0);
        assert!(Span::new(2, 2).is_empty());
    }
}
