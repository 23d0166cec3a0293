//! Lexical analysis for the chart DSL.
//!
//! Tokenization uses logos. The surface is deliberately tiny: identifiers,
//! the five punctuation marks `. , ; { }`, skipped whitespace and comments.
//! Anything else is a lexical error.
//!
//! Keywords (`state`, `entry`, `exit`, `start`, `event`, `if`, `dst`, `act`)
//! are *not* token kinds: they are ordinary identifiers whose meaning depends
//! on the recognizer state, so a state or action may legally be named
//! `entry`. The parser inspects identifier text through the `is_keyword`
//! guard.
//!
//! # Examples
//!
//! ```
//! # use hsmc::lexer::Token;
//! # use logos::Logos;
//! let tokens: Vec<_> = Token::lexer("state A { entry f; }")
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(tokens.len(), 7);
//! ```

use logos::Logos;

/// Chart DSL token.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")] // Skip whitespace
#[logos(skip r"//[^\n]*")] // Skip line comments
#[logos(skip r"/\*([^*]|\*[^/])*\*/")] // Skip block comments
pub enum Token {
    /// Punctuation `.`
    #[token(".")]
    Dot,
    /// Punctuation `,`
    #[token(",")]
    Comma,
    /// Punctuation `;`
    #[token(";")]
    Semi,
    /// Delimiter `{`
    #[token("{")]
    LBrace,
    /// Delimiter `}`
    #[token("}")]
    RBrace,

    /// Identifier: leading letter, then letters, digits, underscores.
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

impl Token {
    /// Guard: any identifier, keywords included.
    pub fn is_ident(&self) -> bool {
        matches!(self, Token::Ident(_))
    }

    /// Guard: identifier with exactly this text.
    pub fn is_keyword(&self, word: &str) -> bool {
        matches!(self, Token::Ident(text) if text == word)
    }

    /// Guard: `{`.
    pub fn is_lbrace(&self) -> bool {
        matches!(self, Token::LBrace)
    }

    /// Guard: `}`.
    pub fn is_rbrace(&self) -> bool {
        matches!(self, Token::RBrace)
    }

    /// Guard: `,`.
    pub fn is_comma(&self) -> bool {
        matches!(self, Token::Comma)
    }

    /// Guard: `;`.
    pub fn is_semi(&self) -> bool {
        matches!(self, Token::Semi)
    }

    /// Guard: `.`.
    pub fn is_dot(&self) -> bool {
        matches!(self, Token::Dot)
    }

    /// Identifier text, or the empty string for punctuation.
    ///
    /// The tree builder only reads text from tokens matched by identifier
    /// guards, so punctuation never reaches a name field.
    pub fn text(&self) -> &str {
        match self {
            Token::Ident(text) => text,
            _ => "",
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Dot => f.write_str("."),
            Token::Comma => f.write_str(","),
            Token::Semi => f.write_str(";"),
            Token::LBrace => f.write_str("{"),
            Token::RBrace => f.write_str("}"),
            Token::Ident(text) => f.write_str(text),
        }
    }
}
