//! Tokenizer for declarator scripts.

use crate::script::ast::Span;
use crate::script::SyntaxError;

/// Token kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Str(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Dot,
    Assign,
    Newline,
    Eof,
}

impl TokenKind {
    /// How the token is named in error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier `{}`", name),
            TokenKind::Str(_) => "string".to_string(),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Colon => "`:`".to_string(),
            TokenKind::Dot => "`.`".to_string(),
            TokenKind::Assign => "`=`".to_string(),
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

/// A token with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Split a script into tokens.
///
/// Newlines inside parentheses or brackets are dropped so that calls may
/// span several lines. Consecutive newlines collapse into one token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer {
        source,
        chars: source.char_indices().peekable(),
        depth: 0,
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    depth: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn run(&mut self) -> Result<(), SyntaxError> {
        while let Some((start, c)) = self.chars.next() {
            match c {
                ' ' | '\t' | '\r' => {}
                '#' => self.skip_comment(),
                '\n' => {
                    let last_is_break = matches!(
                        self.tokens.last().map(|t| &t.kind),
                        None | Some(TokenKind::Newline)
                    );
                    if self.depth == 0 && !last_is_break {
                        self.push(TokenKind::Newline, start, start + 1);
                    }
                }
                '(' => self.open(TokenKind::LParen, start),
                '[' => self.open(TokenKind::LBracket, start),
                ')' => self.close(TokenKind::RParen, start),
                ']' => self.close(TokenKind::RBracket, start),
                ',' => self.push(TokenKind::Comma, start, start + 1),
                ':' => self.push(TokenKind::Colon, start, start + 1),
                '.' => self.push(TokenKind::Dot, start, start + 1),
                '=' => self.push(TokenKind::Assign, start, start + 1),
                '\'' => self.string(start)?,
                c if c.is_ascii_alphabetic() || c == '_' => self.ident(start),
                other => {
                    return Err(SyntaxError::new(
                        format!("unexpected character `{}`", other),
                        Span::new(start, start + other.len_utf8()),
                    ))
                }
            }
        }

        let end = self.source.len();
        self.push(TokenKind::Eof, end, end);
        Ok(())
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            span: Span::new(start, end),
        });
    }

    fn open(&mut self, kind: TokenKind, start: usize) {
        self.depth += 1;
        self.push(kind, start, start + 1);
    }

    fn close(&mut self, kind: TokenKind, start: usize) {
        self.depth = self.depth.saturating_sub(1);
        self.push(kind, start, start + 1);
    }

    fn skip_comment(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '\n' {
                break;
            }
            self.chars.next();
        }
    }

    fn ident(&mut self, start: usize) {
        let mut end = start + 1;
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                end = i + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        let name = self.source[start..end].to_string();
        self.push(TokenKind::Ident(name), start, end);
    }

    fn string(&mut self, start: usize) -> Result<(), SyntaxError> {
        let mut value = String::new();

        while let Some((i, c)) = self.chars.next() {
            match c {
                '\'' => {
                    self.push(TokenKind::Str(value), start, i + 1);
                    return Ok(());
                }
                '\n' => break,
                '\\' => match self.chars.next() {
                    Some((_, '\'')) => value.push('\''),
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((j, other)) => {
                        return Err(SyntaxError::new(
                            format!("unknown escape sequence `\\{}`", other),
                            Span::new(i, j + other.len_utf8()),
                        ))
                    }
                    None => break,
                },
                other => value.push(other),
            }
        }

        let end = self
            .source
            .get(start..)
            .and_then(|rest| rest.find('\n'))
            .map_or(self.source.len(), |n| start + n);
        Err(SyntaxError::new("unterminated string", Span::new(start, end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_call() {
        assert_eq!(
            kinds("x = dependency('libX', required: false)\n"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Assign,
                TokenKind::Ident("dependency".into()),
                TokenKind::LParen,
                TokenKind::Str("libX".into()),
                TokenKind::Comma,
                TokenKind::Ident("required".into()),
                TokenKind::Colon,
                TokenKind::Ident("false".into()),
                TokenKind::RParen,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_newlines_inside_parens_are_dropped() {
        let tokens = kinds("executable('App',\n  ['a.cob',\n   'b.cob'])\n\n\n");
        let newlines = tokens
            .iter()
            .filter(|k| **k == TokenKind::Newline)
            .count();
        assert_eq!(newlines, 1);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        assert_eq!(
            kinds("# leading comment\n\nproject('p') # trailing\n"),
            vec![
                TokenKind::Ident("project".into()),
                TokenKind::LParen,
                TokenKind::Str("p".into()),
                TokenKind::RParen,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r"'it\'s \\ fine'"),
            vec![TokenKind::Str(r"it's \ fine".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("project('oops\n").unwrap_err();
        assert_eq!(err.message, "unterminated string");
        assert_eq!(err.span, Span::new(8, 13));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("x = 42").unwrap_err();
        assert!(err.message.contains("`4`"));
        assert_eq!(err.span, Span::new(4, 5));
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("skip_if(true, 'm')").unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 7));
        assert_eq!(tokens[4].span, Span::new(14, 17));
    }
}
