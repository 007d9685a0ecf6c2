//! Hourly quote of the day.
//!
//! The quote service answers with a JSON array holding one object with
//! `text` and `author` string fields. The quote is shown as
//! `"<text>" - <author>`, wrapped at [`QUOTE_LINE_WIDTH`] columns. Quotes
//! that need more than [`QUOTE_MAX_LINES`] lines are skipped and whatever
//! was on screen stays there.

use core::fmt::Write;

use embassy_time::Instant;
use heapless::String;

use crate::config::{
    QUOTE_LINE_WIDTH, QUOTE_MAX_LINES, QUOTE_PLACEHOLDER, QUOTE_REFRESH_PERIOD,
    QUOTE_RESPONSE_LEN, QUOTE_TEXT_CAPACITY, QUOTE_TIMEOUT,
};
use crate::error::{Fatal, QuoteError, TransportError};
use crate::transport::Transport;

/// Wrapped quote as shown on screen.
pub type DisplayText = String<QUOTE_TEXT_CAPACITY>;

const AUTHOR_CAPACITY: usize = 64;

/// Decoded quote fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String<QUOTE_TEXT_CAPACITY>,
    pub author: String<AUTHOR_CAPACITY>,
}

impl Quote {
    /// `"<text>" - <author>` on one line.
    pub fn attributed(&self) -> Result<String<QUOTE_TEXT_CAPACITY>, QuoteError> {
        let mut line = String::new();
        write!(line, "\"{}\" - {}", self.text, self.author).map_err(|_| QuoteError::Overflow)?;
        Ok(line)
    }
}

/// Extract the first quote from a quote service response.
pub fn parse_quote(json: &str) -> Result<Quote, QuoteError> {
    Ok(Quote {
        text: string_field(json, "text")?,
        author: string_field(json, "author")?,
    })
}

/// Greedy word wrap: each line takes words while it stays within `width`
/// characters. A single word wider than `width` gets a line of its own.
/// Lines are joined with `\n`.
pub fn wrap_nicely<const N: usize>(text: &str, width: usize) -> Result<String<N>, QuoteError> {
    let mut out = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let len = word.chars().count();
        if !out.is_empty() {
            if line_len + 1 + len <= width {
                out.push(' ').map_err(|_| QuoteError::Overflow)?;
                line_len += 1;
            } else {
                out.push('\n').map_err(|_| QuoteError::Overflow)?;
                line_len = 0;
            }
        }
        out.push_str(word).map_err(|_| QuoteError::Overflow)?;
        line_len += len;
    }
    Ok(out)
}

/// Value of the first string member named `key`, escapes decoded.
fn string_field<const N: usize>(json: &str, key: &str) -> Result<String<N>, QuoteError> {
    let mut rest = json;
    while let Some(at) = rest.find('"') {
        let (token, after) = scan_string(&rest[at + 1..])?;
        let after = after.trim_start();
        match after.strip_prefix(':') {
            Some(value) if token == key => {
                let body = value
                    .trim_start()
                    .strip_prefix('"')
                    .ok_or(QuoteError::Parse)?;
                let (raw, _) = scan_string(body)?;
                return unescape(raw);
            }
            Some(value) => rest = value,
            None => rest = after,
        }
    }
    Err(QuoteError::Parse)
}

/// Split `s` (just past an opening quote) at its closing quote.
fn scan_string(s: &str) -> Result<(&str, &str), QuoteError> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Ok((&s[..i], &s[i + 1..])),
            _ => i += 1,
        }
    }
    Err(QuoteError::Parse)
}

fn unescape<const N: usize>(raw: &str) -> Result<String<N>, QuoteError> {
    let mut out = String::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        let decoded = if c == '\\' {
            match chars.next().ok_or(QuoteError::Parse)? {
                '"' => '"',
                '\\' => '\\',
                '/' => '/',
                'b' => '\u{8}',
                'f' => '\u{c}',
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                'u' => {
                    let high = hex4(&mut chars)?;
                    if (0xD800..0xDC00).contains(&high) {
                        // Surrogate pair: the low half must follow.
                        if chars.next() != Some('\\') || chars.next() != Some('u') {
                            return Err(QuoteError::Parse);
                        }
                        let low = hex4(&mut chars)?;
                        if !(0xDC00..0xE000).contains(&low) {
                            return Err(QuoteError::Parse);
                        }
                        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                        char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
                    } else {
                        char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER)
                    }
                }
                _ => return Err(QuoteError::Parse),
            }
        } else {
            c
        };
        out.push(decoded).map_err(|_| QuoteError::Overflow)?;
    }
    Ok(out)
}

fn hex4(chars: &mut core::str::Chars<'_>) -> Result<u32, QuoteError> {
    let mut value = 0;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or(QuoteError::Parse)?;
        value = value * 16 + digit;
    }
    Ok(value)
}

/// Fetches a new quote at most once per [`QUOTE_REFRESH_PERIOD`].
pub struct ContentRefresher {
    url: &'static str,
    last_refresh: Option<Instant>,
    displayed: DisplayText,
}

impl ContentRefresher {
    /// Starts out showing [`QUOTE_PLACEHOLDER`]; the first call to
    /// [`maybe_refresh`](Self::maybe_refresh) fetches.
    pub fn new(url: &'static str) -> Self {
        let mut displayed = String::new();
        // Placeholder is a short literal.
        let _ = displayed.push_str(QUOTE_PLACEHOLDER);
        Self {
            url,
            last_refresh: None,
            displayed,
        }
    }

    /// Text currently on screen.
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn last_refresh(&self) -> Option<Instant> {
        self.last_refresh
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= QUOTE_REFRESH_PERIOD,
        }
    }

    /// Fetch a new quote if the hour is up.
    ///
    /// Returns the new text when the screen should change. Failed or
    /// oversized quotes leave the old text in place and still restart the
    /// hour.
    pub async fn maybe_refresh<T: Transport>(
        &mut self,
        transport: &mut T,
        now: Instant,
    ) -> Result<Option<&str>, Fatal> {
        if !self.is_due(now) {
            return Ok(None);
        }
        self.last_refresh = Some(now);

        match self.fetch(transport).await {
            Ok(text) => {
                info!("New quote ({} lines)", text.lines().count());
                self.displayed = text;
                Ok(Some(self.displayed.as_str()))
            }
            Err(QuoteError::Transport(TransportError::OutOfMemory)) => {
                error!("Out of memory while fetching quote");
                Err(Fatal::OutOfMemory)
            }
            Err(QuoteError::Overflow) => {
                info!("Quote too long for the screen, keeping the current one");
                Ok(None)
            }
            Err(e) => {
                warn!("Couldn't get quote ({}), try again later", e);
                Ok(None)
            }
        }
    }

    /// One fetch, formatted and wrapped, without touching the timer.
    pub async fn fetch<T: Transport>(&self, transport: &mut T) -> Result<DisplayText, QuoteError> {
        let mut buf = [0u8; QUOTE_RESPONSE_LEN];
        let body = transport.get(self.url, QUOTE_TIMEOUT, &mut buf).await?;

        let quote = parse_quote(body)?;
        let wrapped: DisplayText = wrap_nicely(&quote.attributed()?, QUOTE_LINE_WIDTH)?;

        if wrapped.lines().count() > QUOTE_MAX_LINES {
            return Err(QuoteError::Overflow);
        }
        Ok(wrapped)
    }
}
