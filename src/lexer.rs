// File: src/lexer.rs
//
// Lexical analyzer (tokenizer) for the Slate programming language.
// Converts source code text into a stream of tokens for parsing.
//
// Supports:
// - Keywords: program, begin, end, if, then, else, while, do, print, print_line, return, and, or, not
// - Labels (identifiers), integer literals, boolean literals
// - String literals delimited by double quotes (may not span lines)
// - Operators: +, -, *, /, %, :, <, >, =, :=, ==, <=, >=
// - Punctuation: ( ) { } ; ,
//
// The source is processed line by line; columns are 1-based and reset at the
// start of each line.

use crate::errors::{SlateError, SourceLocation};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// The lexical class of a token. The literal text is kept separately on the
/// token itself so the parser can match on either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Operator,
    Punctuation,
    Label,
    IntLiteral,
    BoolLiteral,
    StringLiteral,
    Eof,
}

/// A single token: lexical class, literal text, and 1-based source position.
/// Immutable once created; produced by the lexer and consumed by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

static KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "program",
        "begin",
        "end",
        "if",
        "then",
        "else",
        "while",
        "do",
        "print",
        "print_line",
        "return",
        "and",
        "or",
        "not",
    ]
    .into_iter()
    .collect()
});

static TWO_CHAR_OPERATORS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| [":=", "==", "!=", "<=", ">="].into_iter().collect());

const ONE_CHAR_OPERATORS: &str = "+-*/%:<>=";

const PUNCTUATION: &str = "(){};,";

/// Tokenizes Slate source code into a vector of tokens.
///
/// Processes the input line by line, recognizing integer literals, labels,
/// keywords, boolean literals, string literals, operators, and punctuation.
/// Two-character operators are matched before their one-character prefixes.
///
/// # Arguments
/// * `source` - The Slate source code as a string
///
/// # Returns
/// A vector of tokens ending with a synthetic Eof token, or a lex error on
/// an unterminated string literal or unrecognized character
pub fn tokenize(source: &str) -> Result<Vec<Token>, SlateError> {
    let mut tokens = Vec::new();
    let mut line_count = 0;

    for (line_idx, line) in source.lines().enumerate() {
        line_count = line_idx + 1;
        let line_num = line_idx + 1;
        let chars: Vec<char> = line.chars().collect();
        let mut col = 0;

        while col < chars.len() {
            let c = chars[col];

            if c.is_whitespace() {
                col += 1;
            } else if c.is_ascii_digit() {
                let start = col;
                while col < chars.len() && chars[col].is_ascii_digit() {
                    col += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::IntLiteral,
                    text: chars[start..col].iter().collect(),
                    line: line_num,
                    column: start + 1,
                });
            } else if c.is_alphabetic() {
                let start = col;
                while col < chars.len() && (chars[col].is_alphanumeric() || chars[col] == '_') {
                    col += 1;
                }
                let lexeme: String = chars[start..col].iter().collect();
                let kind = if lexeme == "true" || lexeme == "false" {
                    TokenKind::BoolLiteral
                } else if KEYWORDS.contains(lexeme.as_str()) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Label
                };
                tokens.push(Token {
                    kind,
                    text: lexeme,
                    line: line_num,
                    column: start + 1,
                });
            } else if c == '"' {
                let start = col;
                col += 1;
                let mut literal = String::new();
                let mut closed = false;
                while col < chars.len() {
                    let ch = chars[col];
                    col += 1;
                    if ch == '"' {
                        closed = true;
                        break;
                    }
                    literal.push(ch);
                }
                if !closed {
                    return Err(SlateError::lex_error(
                        "String literal wasn't closed properly".to_string(),
                        SourceLocation::new(line_num, start + 1),
                    ));
                }
                tokens.push(Token {
                    kind: TokenKind::StringLiteral,
                    text: literal,
                    line: line_num,
                    column: start + 1,
                });
            } else if let Some(op) = extract_operator(&chars, col) {
                tokens.push(Token {
                    kind: TokenKind::Operator,
                    text: op.to_string(),
                    line: line_num,
                    column: col + 1,
                });
                col += op.len();
            } else if PUNCTUATION.contains(c) {
                tokens.push(Token {
                    kind: TokenKind::Punctuation,
                    text: c.to_string(),
                    line: line_num,
                    column: col + 1,
                });
                col += 1;
            } else {
                return Err(SlateError::lex_error(
                    format!("Invalid character '{}'", c),
                    SourceLocation::new(line_num, col + 1),
                ));
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        text: String::new(),
        line: line_count + 1,
        column: 1,
    });

    Ok(tokens)
}

/// Matches the operator at the given position, trying the two-character
/// lexeme before falling back to a single character.
fn extract_operator(chars: &[char], col: usize) -> Option<&'static str> {
    if col + 1 < chars.len() {
        let two: String = chars[col..col + 2].iter().collect();
        if let Some(op) = TWO_CHAR_OPERATORS.get(two.as_str()) {
            return Some(op);
        }
    }

    let c = chars[col];
    if ONE_CHAR_OPERATORS.contains(c) {
        // Index back into the static so the return type stays 'static
        let pos = ONE_CHAR_OPERATORS.find(c).unwrap();
        return Some(&ONE_CHAR_OPERATORS[pos..pos + 1]);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_texts(src: &str) -> Vec<(TokenKind, String)> {
        tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_tokenize_simple_program() {
        let toks = kinds_and_texts("program begin end;");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Keyword, "program".to_string()),
                (TokenKind::Keyword, "begin".to_string()),
                (TokenKind::Keyword, "end".to_string()),
                (TokenKind::Punctuation, ";".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_two_char_operator_wins_over_one_char() {
        let toks = kinds_and_texts("x := 1; y : Integer");
        assert!(toks.contains(&(TokenKind::Operator, ":=".to_string())));
        assert!(toks.contains(&(TokenKind::Operator, ":".to_string())));
    }

    #[test]
    fn test_comparison_operators() {
        let toks = kinds_and_texts("a == b != c <= d >= e < f > g");
        let ops: Vec<&str> = toks
            .iter()
            .filter(|(k, _)| *k == TokenKind::Operator)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(ops, vec!["==", "!=", "<=", ">=", "<", ">"]);
    }

    #[test]
    fn test_bare_bang_is_lex_error() {
        let err = tokenize("x := !true;").unwrap_err();
        assert_eq!(err.kind, crate::errors::ErrorKind::LexError);
        assert!(err.message.contains("Invalid character"));
    }

    #[test]
    fn test_bool_literals_and_keywords() {
        let toks = kinds_and_texts("if true and not false then");
        assert_eq!(toks[0], (TokenKind::Keyword, "if".to_string()));
        assert_eq!(toks[1], (TokenKind::BoolLiteral, "true".to_string()));
        assert_eq!(toks[2], (TokenKind::Keyword, "and".to_string()));
        assert_eq!(toks[3], (TokenKind::Keyword, "not".to_string()));
        assert_eq!(toks[4], (TokenKind::BoolLiteral, "false".to_string()));
        assert_eq!(toks[5], (TokenKind::Keyword, "then".to_string()));
    }

    #[test]
    fn test_label_with_underscore_and_digits() {
        let toks = kinds_and_texts("my_var2 := 7;");
        assert_eq!(toks[0], (TokenKind::Label, "my_var2".to_string()));
        assert_eq!(toks[2], (TokenKind::IntLiteral, "7".to_string()));
    }

    #[test]
    fn test_string_literal() {
        let toks = kinds_and_texts("print \"hello world\";");
        assert_eq!(
            toks[1],
            (TokenKind::StringLiteral, "hello world".to_string())
        );
    }

    #[test]
    fn test_unterminated_string_is_lex_error() {
        let err = tokenize("print \"oops;\nprint_line;").unwrap_err();
        assert_eq!(err.kind, crate::errors::ErrorKind::LexError);
        assert_eq!(err.location.line, 1);
        assert_eq!(err.location.column, 7);
    }

    #[test]
    fn test_invalid_character_is_lex_error() {
        let err = tokenize("x := 1 @ 2;").unwrap_err();
        assert_eq!(err.kind, crate::errors::ErrorKind::LexError);
        assert_eq!(err.location.line, 1);
        assert_eq!(err.location.column, 8);
    }

    #[test]
    fn test_positions_are_one_based_and_reset_per_line() {
        let toks = tokenize("program\nbegin\nend;").unwrap();
        assert_eq!((toks[0].line, toks[0].column), (1, 1));
        assert_eq!((toks[1].line, toks[1].column), (2, 1));
        assert_eq!((toks[2].line, toks[2].column), (3, 1));
        assert_eq!((toks[3].line, toks[3].column), (3, 4));
    }

    #[test]
    fn test_retokenizing_token_text_is_stable() {
        // Lexer idempotence on literals: feeding a token's text back through
        // the lexer reproduces the same (kind, text) pair.
        let toks = tokenize("program x : Integer ; begin x := 42 ; end ;").unwrap();
        for tok in toks.iter().filter(|t| t.kind != TokenKind::Eof) {
            let source = if tok.kind == TokenKind::StringLiteral {
                format!("\"{}\"", tok.text)
            } else {
                tok.text.clone()
            };
            let again = tokenize(&source).unwrap();
            assert_eq!(again[0].kind, tok.kind);
            assert_eq!(again[0].text, tok.text);
        }
    }
}
