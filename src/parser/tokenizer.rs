use super::error::LexError;
use super::locations::Span;
use const_format::concatcp;
use derivative::Derivative;
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Clone, Default, Debug, Derivative)]
#[derivative(PartialEq)]
pub struct Token {
    pub(crate) typ: TokenType,
    pub(crate) lexeme: String,
    pub(crate) number: f64,
    #[derivative(PartialEq = "ignore")]
    pub(crate) span: Span,
}

impl Token {
    pub fn typ(&self) -> TokenType {
        self.typ
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// The numeric payload, present only on `NUMBER` tokens.
    pub fn number(&self) -> Option<f64> {
        match self.typ {
            TokenType::NUMBER => Some(self.number),
            _ => None,
        }
    }

    fn end_marker(span: Span) -> Self {
        Self {
            typ: TokenType::ENDMARKER,
            lexeme: "".to_string(),
            number: 0.0,
            span,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}('{}')", self.typ, self.lexeme)
    }
}

#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TokenType {
    LPAR,
    RPAR,
    NUMBER,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    AND,
    OR,
    NOT,
    EQUAL,
    GREATER,
    GREATEREQUAL,
    LESS,
    LESSEQUAL,
    TRUE,
    FALSE,
    IF,
    DEFINE,
    NAME,
    ENDMARKER,
    #[default]
    ERRORTOKEN,
}

impl TokenType {
    /// Tokens that may only appear right after an opening parenthesis.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Self::PLUS
                | Self::MINUS
                | Self::STAR
                | Self::SLASH
                | Self::AND
                | Self::OR
                | Self::NOT
                | Self::EQUAL
                | Self::GREATER
                | Self::GREATEREQUAL
                | Self::LESS
                | Self::LESSEQUAL
                | Self::IF
                | Self::DEFINE
        )
    }

    fn is_arithmetic(&self) -> bool {
        matches!(self, Self::PLUS | Self::MINUS | Self::STAR | Self::SLASH)
    }
}

macro_rules! alternative {
    ($t:expr) => {{
        $t
    }};
    ($t:expr, $($ts:expr),+) => {{
        concatcp!($t, "|", alternative!($($ts),+))
    }}
}

macro_rules! group {
    ($($ts:expr),+) => {{
        concatcp!(r"(?:", alternative!($($ts),+), ")")
    }}
}

macro_rules! keyword {
    ($t:expr) => {{
        concatcp!("^", $t, r"\b")
    }};
}

const S_WHITESPACE: &str = r"^\s+";
const S_SIGN: &str = r"[\-\+]?";
const S_FRACTION: &str = concatcp!(S_SIGN, r"0\.[0-9]+");
const S_ZERO: &str = r"0";
const S_DECIMAL: &str = concatcp!(S_SIGN, r"[1-9][0-9]*(?:\.[0-9]*)?");
// Alternatives are tried left to right, so the order here is significant.
const S_NUMBER: &str = concatcp!("^", group!(S_FRACTION, S_ZERO, S_DECIMAL));
const S_NAME: &str = r"^[a-zA-Z][a-zA-Z0-9_]*";

const TOKEN_PATTERNS: [(&str, TokenType); 20] = [
    (r"^\(", TokenType::LPAR),
    (r"^\)", TokenType::RPAR),
    (S_NUMBER, TokenType::NUMBER),
    (r"^\+", TokenType::PLUS),
    (r"^\-", TokenType::MINUS),
    (r"^\*", TokenType::STAR),
    (r"^/", TokenType::SLASH),
    (keyword!("and"), TokenType::AND),
    (keyword!("or"), TokenType::OR),
    (keyword!("not"), TokenType::NOT),
    (r"^=", TokenType::EQUAL),
    (r"^>=", TokenType::GREATEREQUAL),
    (r"^<=", TokenType::LESSEQUAL),
    (r"^>", TokenType::GREATER),
    (r"^<", TokenType::LESS),
    (keyword!("true"), TokenType::TRUE),
    (keyword!("false"), TokenType::FALSE),
    (keyword!("if"), TokenType::IF),
    (keyword!("define"), TokenType::DEFINE),
    (S_NAME, TokenType::NAME),
];

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_WHITESPACE).expect("Error compiling regex."));
static PATTERNS: Lazy<Vec<(Regex, TokenType)>> = Lazy::new(|| {
    TOKEN_PATTERNS
        .iter()
        .map(|(pattern, typ)| (Regex::new(pattern).expect("Error compiling regex."), *typ))
        .collect()
});

/// Pull-based tokenizer over a single source line.
pub struct Tokenizer<'a> {
    line: &'a str,
    start: usize,
    previous: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            start: 0,
            previous: None,
        }
    }

    fn with_previous(line: &'a str, previous: Option<Token>) -> Self {
        Self {
            line,
            start: 0,
            previous,
        }
    }

    /// The part of the line that has not been consumed yet.
    pub fn remainder(&self) -> &'a str {
        &self.line[self.start..]
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let mut had_whitespace = false;
        if let Some(m) = WHITESPACE.find(self.remainder()) {
            self.start += m.end();
            had_whitespace = true;
        }
        if self.remainder().is_empty() {
            return Ok(Token::end_marker(Span::new(self.start, self.start)));
        }

        let rest = self.remainder();
        let Some((m, typ)) = PATTERNS
            .iter()
            .find_map(|(regex, typ)| regex.find(rest).map(|m| (m, *typ)))
        else {
            return Err(LexError::InvalidToken {
                remainder: rest.to_string(),
                span: Span::new(self.start, self.line.len()),
            });
        };

        let end = self.start + m.end();
        let lexeme = m.as_str().to_string();
        let span = Span::new(self.start, end);
        let number = match typ {
            TokenType::NUMBER => lexeme.parse::<f64>().map_err(|_| LexError::InvalidToken {
                remainder: rest.to_string(),
                span,
            })?,
            _ => 0.0,
        };
        self.start = end;

        if let Some(previous) = &self.previous {
            if typ == TokenType::NUMBER && !had_whitespace && previous.typ.is_arithmetic() {
                return Err(LexError::AmbiguousAdjacentToken {
                    lexeme: format!("{}{}", previous.lexeme, lexeme),
                    span: previous.span.till(&span),
                });
            }
        }

        let token = Token {
            typ,
            lexeme,
            number,
            span,
        };
        trace!("token {token} at {}", token.span);
        self.previous = Some(token.clone());
        Ok(token)
    }
}

/// Lex a single token from the front of `remainder`, returning it together with
/// whatever input is left. `previous` is the token lexed just before, if any.
pub fn next_token<'a>(
    remainder: &'a str,
    previous: Option<&Token>,
) -> Result<(Token, &'a str), LexError> {
    let mut tokenizer = Tokenizer::with_previous(remainder, previous.cloned());
    let token = tokenizer.next_token()?;
    Ok((token, tokenizer.remainder()))
}

/// Lex a whole source line. The end marker is not part of the result, so a
/// blank line yields no tokens at all.
pub fn tokenize(line: &str) -> Result<Vec<Token>, LexError> {
    let mut tokenizer = Tokenizer::new(line);
    let mut tokens = vec![];
    loop {
        let token = tokenizer.next_token()?;
        if token.typ == TokenType::ENDMARKER {
            return Ok(tokens);
        }
        tokens.push(token);
    }
}
