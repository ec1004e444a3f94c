//! Recursive-descent parser for declarator scripts.
//!
//! Parsing happens in two steps. Calls are first read into a generic
//! shape (function name, positional arguments, keyword arguments), then
//! lowered into typed [`Statement`]s. Lowering performs the static checks:
//! argument types, unknown keywords and references to unbound variables.

use std::collections::HashSet;
use std::path::PathBuf;

use semver::VersionReq;

use crate::core::{DependencySpec, Language, Project};
use crate::script::ast::{Condition, ExecutableDecl, Located, Span, Statement};
use crate::script::lexer::{tokenize, Token, TokenKind};
use crate::script::SyntaxError;

/// Parse script source into located statements.
pub fn parse_statements(source: &str) -> Result<Vec<Located>, SyntaxError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        bound: HashSet::new(),
    };
    parser.script()
}

/// Expression as read from the source, before lowering.
#[derive(Debug, Clone)]
enum Expr {
    Str(String),
    Bool(bool),
    Ident(String),
    Array(Vec<Spanned>),
    Found(String),
    Not(Box<Spanned>),
    And(Box<Spanned>, Box<Spanned>),
    Or(Box<Spanned>, Box<Spanned>),
}

#[derive(Debug, Clone)]
struct Spanned {
    expr: Expr,
    span: Span,
}

impl Spanned {
    fn describe(&self) -> &'static str {
        match self.expr {
            Expr::Str(_) => "a string",
            Expr::Bool(_) => "a boolean",
            Expr::Ident(_) => "a variable",
            Expr::Array(_) => "an array",
            Expr::Found(_) | Expr::Not(_) | Expr::And(..) | Expr::Or(..) => "a condition",
        }
    }
}

/// A call before lowering.
struct Call {
    name: String,
    name_span: Span,
    args: Vec<Spanned>,
    kwargs: Vec<(String, Span, Spanned)>,
    span: Span,
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    /// Dependency variables assigned so far
    bound: HashSet<String>,
}

impl<'a> Parser<'a> {
    fn script(&mut self) -> Result<Vec<Located>, SyntaxError> {
        let mut statements: Vec<Located> = Vec::new();

        loop {
            if self.eat(&TokenKind::Newline) {
                continue;
            }
            if self.at(&TokenKind::Eof) {
                break;
            }

            let located = self.statement()?;

            let is_project = matches!(located.statement, Statement::Project(_));
            match (statements.is_empty(), is_project) {
                (true, false) => {
                    return Err(SyntaxError::new(
                        "first statement must be `project()`",
                        located.span,
                    )
                    .with_help("Start the script with `project('name', 'language')`"))
                }
                (false, true) => {
                    return Err(SyntaxError::new(
                        "`project()` may only be declared once",
                        located.span,
                    ))
                }
                _ => {}
            }
            statements.push(located);

            if !self.at(&TokenKind::Eof) {
                self.expect(&TokenKind::Newline, "end of line after statement")?;
            }
        }

        if statements.is_empty() {
            let end = self.source.len();
            return Err(SyntaxError::new(
                "script has no `project()` declaration",
                Span::new(0, end.min(1)),
            )
            .with_help("Start the script with `project('name', 'language')`"));
        }

        Ok(statements)
    }

    fn statement(&mut self) -> Result<Located, SyntaxError> {
        let start = self.peek().span;
        let line = self.line_of(start.start);

        let (name, name_span) = self.ident("statement")?;
        let statement = if self.eat(&TokenKind::Assign) {
            let call = self.call()?;
            if call.name != "dependency" {
                return Err(SyntaxError::new(
                    format!("cannot assign the result of `{}()`", call.name),
                    call.name_span,
                )
                .with_help("Only `dependency()` produces a value"));
            }
            let spec = self.lower_dependency(&call)?;
            self.bound.insert(name.clone());
            Statement::Dependency {
                binding: name,
                spec,
            }
        } else if self.at(&TokenKind::LParen) {
            let call = self.finish_call(name, name_span)?;
            match call.name.as_str() {
                "project" => Statement::Project(self.lower_project(&call)?),
                "skip_if" => self.lower_skip_if(&call)?,
                "executable" => Statement::Executable(self.lower_executable(&call)?),
                "dependency" => {
                    return Err(SyntaxError::new(
                        "result of `dependency()` must be assigned",
                        call.span,
                    )
                    .with_help("Write `dep = dependency(...)`"))
                }
                other => return Err(unknown_function(other, call.name_span)),
            }
        } else {
            let tok = self.peek().clone();
            return Err(SyntaxError::new(
                format!("expected `(` or `=`, found {}", tok.kind.describe()),
                tok.span,
            ));
        };

        let end = self.previous_span();
        Ok(Located {
            statement,
            span: start.to(end),
            line,
        })
    }

    // ------------------------------------------------------------------
    // Calls and expressions
    // ------------------------------------------------------------------

    fn call(&mut self) -> Result<Call, SyntaxError> {
        let (name, name_span) = self.ident("function name")?;
        self.finish_call(name, name_span)
    }

    fn finish_call(&mut self, name: String, name_span: Span) -> Result<Call, SyntaxError> {
        self.expect(&TokenKind::LParen, "`(`")?;

        let mut args = Vec::new();
        let mut kwargs: Vec<(String, Span, Spanned)> = Vec::new();

        while !self.at(&TokenKind::RParen) {
            let is_kwarg = matches!(self.peek().kind, TokenKind::Ident(_))
                && matches!(self.peek_at(1).kind, TokenKind::Colon);

            if is_kwarg {
                let (key, key_span) = self.ident("keyword argument")?;
                self.expect(&TokenKind::Colon, "`:`")?;
                if kwargs.iter().any(|(k, _, _)| *k == key) {
                    return Err(SyntaxError::new(
                        format!("keyword argument `{}` given twice", key),
                        key_span,
                    ));
                }
                let value = self.expr()?;
                kwargs.push((key, key_span, value));
            } else {
                if !kwargs.is_empty() {
                    let arg = self.expr()?;
                    return Err(SyntaxError::new(
                        "positional argument after keyword argument",
                        arg.span,
                    ));
                }
                args.push(self.expr()?);
            }

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        let close = self.expect(&TokenKind::RParen, "`)` or `,`")?;
        Ok(Call {
            name,
            name_span,
            args,
            kwargs,
            span: name_span.to(close),
        })
    }

    fn expr(&mut self) -> Result<Spanned, SyntaxError> {
        let mut lhs = self.and_expr()?;
        while self.eat_keyword("or") {
            let rhs = self.and_expr()?;
            let span = lhs.span.to(rhs.span);
            lhs = Spanned {
                expr: Expr::Or(Box::new(lhs), Box::new(rhs)),
                span,
            };
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Spanned, SyntaxError> {
        let mut lhs = self.unary()?;
        while self.eat_keyword("and") {
            let rhs = self.unary()?;
            let span = lhs.span.to(rhs.span);
            lhs = Spanned {
                expr: Expr::And(Box::new(lhs), Box::new(rhs)),
                span,
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Spanned, SyntaxError> {
        let start = self.peek().span;
        if self.eat_keyword("not") {
            let inner = self.unary()?;
            let span = start.to(inner.span);
            return Ok(Spanned {
                expr: Expr::Not(Box::new(inner)),
                span,
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Spanned, SyntaxError> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Str(value) => Ok(Spanned {
                expr: Expr::Str(value),
                span: tok.span,
            }),
            TokenKind::Ident(name) if name == "true" || name == "false" => Ok(Spanned {
                expr: Expr::Bool(name == "true"),
                span: tok.span,
            }),
            TokenKind::Ident(name) => {
                if !self.eat(&TokenKind::Dot) {
                    return Ok(Spanned {
                        expr: Expr::Ident(name),
                        span: tok.span,
                    });
                }
                let (method, method_span) = self.ident("method name")?;
                if method != "found" {
                    return Err(SyntaxError::new(
                        format!("unknown method `{}`", method),
                        method_span,
                    )
                    .with_help("Dependency objects only support `.found()`"));
                }
                self.expect(&TokenKind::LParen, "`(`")?;
                let close = self.expect(&TokenKind::RParen, "`)`")?;
                Ok(Spanned {
                    expr: Expr::Found(name),
                    span: tok.span.to(close),
                })
            }
            TokenKind::LParen => {
                let inner = self.expr()?;
                let close = self.expect(&TokenKind::RParen, "`)`")?;
                Ok(Spanned {
                    expr: inner.expr,
                    span: tok.span.to(close),
                })
            }
            TokenKind::LBracket => {
                let mut items = Vec::new();
                while !self.at(&TokenKind::RBracket) {
                    items.push(self.expr()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                let close = self.expect(&TokenKind::RBracket, "`]` or `,`")?;
                Ok(Spanned {
                    expr: Expr::Array(items),
                    span: tok.span.to(close),
                })
            }
            other => Err(SyntaxError::new(
                format!("expected a value, found {}", other.describe()),
                tok.span,
            )),
        }
    }

    // ------------------------------------------------------------------
    // Lowering
    // ------------------------------------------------------------------

    fn lower_project(&self, call: &Call) -> Result<Project, SyntaxError> {
        check_kwargs(call, &["version"])?;

        let mut args = call.args.iter();
        let name_arg = args.next().ok_or_else(|| {
            SyntaxError::new("`project()` requires a project name", call.span)
        })?;
        let name = expect_str(name_arg, "project name")?;

        let mut languages = Vec::new();
        for arg in args {
            for (tag, span) in expect_str_list(arg, "language")? {
                let lang: Language = tag
                    .parse()
                    .map_err(|e: crate::core::language::LanguageParseError| {
                        SyntaxError::new(e.to_string(), span)
                    })?;
                if !languages.contains(&lang) {
                    languages.push(lang);
                }
            }
        }

        let mut project = Project::new(name, languages);
        if let Some(version) = kwarg(call, "version") {
            project = project.with_version(expect_str(version, "version")?);
        }
        Ok(project)
    }

    fn lower_dependency(&self, call: &Call) -> Result<DependencySpec, SyntaxError> {
        check_kwargs(call, &["modules", "required", "version"])?;
        expect_arity(call, 1)?;

        let name = expect_str(&call.args[0], "dependency name")?;
        if name.is_empty() {
            return Err(SyntaxError::new(
                "dependency name must not be empty",
                call.args[0].span,
            ));
        }

        let mut spec = DependencySpec::new(name);

        if let Some(modules) = kwarg(call, "modules") {
            let modules = expect_str_list(modules, "module name")?;
            spec = spec.with_modules(modules.into_iter().map(|(m, _)| m));
        }

        if let Some(required) = kwarg(call, "required") {
            match required.expr {
                Expr::Bool(value) => spec = spec.required(value),
                _ => return Err(type_error(required, "`required`", "a boolean")),
            }
        }

        if let Some(version) = kwarg(call, "version") {
            let text = expect_str(version, "version requirement")?;
            let req = VersionReq::parse(&text).map_err(|e| {
                SyntaxError::new(
                    format!("invalid version requirement `{}`: {}", text, e),
                    version.span,
                )
            })?;
            spec = spec.with_version_req(req);
        }

        Ok(spec)
    }

    fn lower_skip_if(&self, call: &Call) -> Result<Statement, SyntaxError> {
        check_kwargs(call, &[])?;
        expect_arity(call, 2)?;

        let condition = self.lower_condition(&call.args[0])?;
        let message = expect_str(&call.args[1], "skip message")?;
        Ok(Statement::SkipIf { condition, message })
    }

    fn lower_condition(&self, arg: &Spanned) -> Result<Condition, SyntaxError> {
        Ok(match &arg.expr {
            Expr::Bool(value) => Condition::Literal(*value),
            Expr::Found(name) => {
                self.check_bound(name, arg.span)?;
                Condition::Found(name.clone())
            }
            Expr::Not(inner) => Condition::Not(Box::new(self.lower_condition(inner)?)),
            Expr::And(lhs, rhs) => Condition::And(
                Box::new(self.lower_condition(lhs)?),
                Box::new(self.lower_condition(rhs)?),
            ),
            Expr::Or(lhs, rhs) => Condition::Or(
                Box::new(self.lower_condition(lhs)?),
                Box::new(self.lower_condition(rhs)?),
            ),
            Expr::Ident(name) => {
                return Err(SyntaxError::new(
                    format!("`{}` is a dependency, not a boolean", name),
                    arg.span,
                )
                .with_help(format!("Did you mean `{}.found()`?", name)))
            }
            _ => return Err(type_error(arg, "condition", "a boolean expression")),
        })
    }

    fn lower_executable(&self, call: &Call) -> Result<ExecutableDecl, SyntaxError> {
        check_kwargs(call, &["dependencies"])?;

        let mut args = call.args.iter();
        let name_arg = args.next().ok_or_else(|| {
            SyntaxError::new("`executable()` requires a target name", call.span)
        })?;
        let name = expect_str(name_arg, "target name")?;
        if name.is_empty() {
            return Err(SyntaxError::new(
                "target name must not be empty",
                name_arg.span,
            ));
        }

        let mut sources = Vec::new();
        for arg in args {
            for (source, _) in expect_str_list(arg, "source file")? {
                sources.push(PathBuf::from(source));
            }
        }
        if sources.is_empty() {
            return Err(SyntaxError::new(
                format!("executable `{}` has no sources", name),
                call.span,
            ));
        }

        let mut dependencies = Vec::new();
        if let Some(deps) = kwarg(call, "dependencies") {
            let items: Vec<&Spanned> = match &deps.expr {
                Expr::Array(items) => items.iter().collect(),
                _ => vec![deps],
            };
            for item in items {
                match &item.expr {
                    Expr::Ident(binding) => {
                        self.check_bound(binding, item.span)?;
                        dependencies.push(binding.clone());
                    }
                    _ => return Err(type_error(item, "dependency", "a dependency variable")),
                }
            }
        }

        Ok(ExecutableDecl {
            name,
            sources,
            dependencies,
        })
    }

    fn check_bound(&self, name: &str, span: Span) -> Result<(), SyntaxError> {
        if self.bound.contains(name) {
            Ok(())
        } else {
            Err(
                SyntaxError::new(format!("unknown variable `{}`", name), span)
                    .with_help("Assign it first: `name = dependency('...')`"),
            )
        }
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.peek().kind == *kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        match &self.peek().kind {
            TokenKind::Ident(name) if name == keyword => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<Span, SyntaxError> {
        if self.at(kind) {
            Ok(self.advance().span)
        } else {
            let tok = self.peek();
            Err(SyntaxError::new(
                format!("expected {}, found {}", what, tok.kind.describe()),
                tok.span,
            ))
        }
    }

    fn ident(&mut self, what: &str) -> Result<(String, Span), SyntaxError> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok((name, tok.span))
            }
            other => Err(SyntaxError::new(
                format!("expected {}, found {}", what, other.describe()),
                tok.span,
            )),
        }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.source[..offset.min(self.source.len())]
            .matches('\n')
            .count()
            + 1
    }
}

fn kwarg<'c>(call: &'c Call, key: &str) -> Option<&'c Spanned> {
    call.kwargs
        .iter()
        .find(|(k, _, _)| k == key)
        .map(|(_, _, v)| v)
}

fn check_kwargs(call: &Call, allowed: &[&str]) -> Result<(), SyntaxError> {
    for (key, span, _) in &call.kwargs {
        if !allowed.contains(&key.as_str()) {
            let help = if allowed.is_empty() {
                format!("`{}()` takes no keyword arguments", call.name)
            } else {
                format!("Valid keyword arguments: {}", allowed.join(", "))
            };
            return Err(SyntaxError::new(
                format!("unknown keyword argument `{}` for `{}()`", key, call.name),
                *span,
            )
            .with_help(help));
        }
    }
    Ok(())
}

fn expect_arity(call: &Call, n: usize) -> Result<(), SyntaxError> {
    if call.args.len() == n {
        return Ok(());
    }
    let span = call
        .args
        .get(n)
        .map_or(call.span, |extra| extra.span.to(call.args[call.args.len() - 1].span));
    Err(SyntaxError::new(
        format!(
            "`{}()` takes {} positional argument{}, {} given",
            call.name,
            n,
            if n == 1 { "" } else { "s" },
            call.args.len()
        ),
        span,
    ))
}

fn expect_str(arg: &Spanned, what: &str) -> Result<String, SyntaxError> {
    match &arg.expr {
        Expr::Str(value) => Ok(value.clone()),
        _ => Err(type_error(arg, what, "a string")),
    }
}

/// A string or an array of strings, flattened.
fn expect_str_list(arg: &Spanned, what: &str) -> Result<Vec<(String, Span)>, SyntaxError> {
    match &arg.expr {
        Expr::Str(value) => Ok(vec![(value.clone(), arg.span)]),
        Expr::Array(items) => items
            .iter()
            .map(|item| expect_str(item, what).map(|s| (s, item.span)))
            .collect(),
        _ => Err(type_error(arg, what, "a string or array of strings")),
    }
}

fn type_error(arg: &Spanned, what: &str, expected: &str) -> SyntaxError {
    SyntaxError::new(
        format!("{} must be {}, found {}", what, expected, arg.describe()),
        arg.span,
    )
}

fn unknown_function(name: &str, span: Span) -> SyntaxError {
    SyntaxError::new(format!("unknown function `{}()`", name), span)
        .with_help("Valid statements: project, dependency, skip_if, executable")
}
