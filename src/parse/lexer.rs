use logos::{Lexer as LogosLexer, Logos};
use logos_iter::{LogosIter, PeekableLexer};
use std::fmt;

pub type Lexer<'a> = PeekableLexer<'a, LogosLexer<'a, TokenKind>, TokenKind>;

pub fn lexer(s: &str) -> Lexer {
    TokenKind::lexer(s).peekable_lexer()
}

#[derive(Logos, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[0-9]+", parse_integer)]
    Integer(u64),

    #[token("d")]
    Dice,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,

    // Everything else is noise between dice terms.
    #[error]
    Error,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer(_) => "<integer>",
            Self::Dice => "'d'",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Error => "<other>",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Anything too large for a u64 is far past every limit anyway.
fn parse_integer(lex: &mut LogosLexer<TokenKind>) -> u64 {
    lex.slice().bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    })
}
