//! Pattern layouts.
//!
//! | Token | Expands to |
//! |-------|------------|
//! | `%m`  | the message |
//! | `%n`  | a newline |
//! | `%p`  | level name (`DEBUG` ... `FATAL`) |
//! | `%c`  | logger name (`root` for the root logger) |
//! | `%d`  | UTC timestamp, RFC 3339 with milliseconds |
//! | `%%`  | a literal `%` |

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use rcl_logging_interface::Level;

/// Layout used when nothing else is configured.
pub const DEFAULT_PATTERN: &str = "%m%n";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Message,
    Newline,
    Level,
    Logger,
    Date,
}

/// Pattern that cannot be compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// `%` followed by a character that is not a known conversion
    #[error("unknown conversion '%{found}' at offset {position}")]
    Unknown { position: usize, found: char },

    /// `%` at the very end of the pattern
    #[error("dangling '%' at offset {position}")]
    Dangling { position: usize },
}

/// A compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternLayout {
    tokens: Vec<Token>,
    has_date: bool,
}

impl PatternLayout {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.char_indices();

        while let Some((position, c)) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            let token = match chars.next() {
                Some((_, '%')) => {
                    literal.push('%');
                    continue;
                }
                Some((_, 'm')) => Token::Message,
                Some((_, 'n')) => Token::Newline,
                Some((_, 'p')) => Token::Level,
                Some((_, 'c')) => Token::Logger,
                Some((_, 'd')) => Token::Date,
                Some((_, found)) => return Err(PatternError::Unknown { position, found }),
                None => return Err(PatternError::Dangling { position }),
            };
            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(token);
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        let has_date = tokens.contains(&Token::Date);
        Ok(Self { tokens, has_date })
    }

    /// Render one event, reading the clock only if the pattern needs it.
    pub fn format(&self, level: Level, logger: &str, msg: &str) -> String {
        let now = self.has_date.then(Utc::now);
        self.format_at(now, level, logger, msg)
    }

    pub fn format_at(
        &self,
        now: Option<DateTime<Utc>>,
        level: Level,
        logger: &str,
        msg: &str,
    ) -> String {
        let mut out = String::with_capacity(msg.len() + 1);
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Message => out.push_str(msg),
                Token::Newline => out.push('\n'),
                Token::Level => out.push_str(level.as_str()),
                Token::Logger => out.push_str(logger),
                Token::Date => {
                    let now = now.unwrap_or_else(Utc::now);
                    out.push_str(&now.to_rfc3339_opts(SecondsFormat::Millis, true));
                }
            }
        }
        out
    }
}

impl Default for PatternLayout {
    fn default() -> Self {
        Self {
            tokens: vec![Token::Message, Token::Newline],
            has_date: false,
        }
    }
}
