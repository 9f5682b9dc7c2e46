//! HTML synthesis from plain text.
//!
//! Plain-text show notes are turned into paragraphs. A small token scan
//! recognises `**bold**`, `*italic*` and `[quote]` / `[/quote]` regions. The
//! scan is a single pass over a token stream; markers that are never closed
//! are closed at the end of their paragraph instead of spilling into the rest
//! of the output.

use super::timestamps::highlight_timestamps_in_text;

const QUOTE_OPEN: &str = "[quote]";
const QUOTE_CLOSE: &str = "[/quote]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Bold,
    Italic,
    QuoteOpen,
    QuoteClose,
    LineBreak,
    ParagraphBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Inline {
    Bold,
    Italic,
}

impl Inline {
    fn tag(self) -> &'static str {
        match self {
            Inline::Bold => "strong",
            Inline::Italic => "em",
        }
    }
}

/// A `*` run counts as a marker unless it stands alone between whitespace
/// (a bullet or a multiplication sign).
fn is_marker(text: &str, start: usize, len: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[start + len..].chars().next();
    !(before.map_or(true, char::is_whitespace) && after.map_or(true, char::is_whitespace))
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];
        let (token, len) = if rest.starts_with(QUOTE_OPEN) {
            (Some(Token::QuoteOpen), QUOTE_OPEN.len())
        } else if rest.starts_with(QUOTE_CLOSE) {
            (Some(Token::QuoteClose), QUOTE_CLOSE.len())
        } else if rest.starts_with("**") {
            if is_marker(text, i, 2) {
                (Some(Token::Bold), 2)
            } else {
                (None, 2)
            }
        } else if rest.starts_with('*') && !rest.starts_with("**") && is_marker(text, i, 1) {
            (Some(Token::Italic), 1)
        } else if rest.starts_with('\n') {
            let ws_len = rest
                .char_indices()
                .find(|(_, c)| !c.is_whitespace())
                .map_or(rest.len(), |(idx, _)| idx);
            let newlines = rest[..ws_len].matches('\n').count();
            let token = if newlines >= 2 {
                Token::ParagraphBreak
            } else {
                Token::LineBreak
            };
            (Some(token), ws_len)
        } else {
            let step = rest.chars().next().map_or(1, char::len_utf8);
            (None, step)
        };

        if let Some(token) = token {
            if text_start < i {
                tokens.push(Token::Text(&text[text_start..i]));
            }
            tokens.push(token);
            text_start = i + len;
        }
        i += len;
    }
    if text_start < text.len() {
        tokens.push(Token::Text(&text[text_start..]));
    }
    tokens
}

#[derive(Default)]
struct Synthesizer {
    out: String,
    quote: Option<String>,
    paragraph: String,
    open: Vec<Inline>,
    has_text: bool,
    pending_break: bool,
}

impl Synthesizer {
    fn text(&mut self, text: &str) {
        let text = if self.has_text {
            text
        } else {
            text.trim_start()
        };
        if text.is_empty() {
            return;
        }
        self.write_pending_break();
        self.paragraph.push_str(&highlight_timestamps_in_text(text));
        self.has_text = true;
    }

    fn toggle(&mut self, marker: Inline) {
        match self.open.iter().rposition(|m| *m == marker) {
            Some(pos) => {
                // Close what was opened inside the marker, then reopen it outside
                let inner: Vec<Inline> = self.open.drain(pos + 1..).collect();
                for m in inner.iter().rev() {
                    self.close_tag(*m);
                }
                self.open.pop();
                self.close_tag(marker);
                for m in inner {
                    self.open_tag(m);
                    self.open.push(m);
                }
            }
            None => {
                self.write_pending_break();
                self.open_tag(marker);
                self.open.push(marker);
            }
        }
    }

    fn write_pending_break(&mut self) {
        if self.pending_break {
            self.paragraph.push_str("<br>");
            self.pending_break = false;
        }
    }

    fn open_tag(&mut self, marker: Inline) {
        self.paragraph.push('<');
        self.paragraph.push_str(marker.tag());
        self.paragraph.push('>');
    }

    fn close_tag(&mut self, marker: Inline) {
        self.paragraph.push_str("</");
        self.paragraph.push_str(marker.tag());
        self.paragraph.push('>');
    }

    fn line_break(&mut self) {
        if self.has_text {
            self.pending_break = true;
        }
    }

    fn flush_paragraph(&mut self) {
        while let Some(marker) = self.open.pop() {
            self.close_tag(marker);
        }
        let paragraph = std::mem::take(&mut self.paragraph);
        if self.has_text {
            let target = self.quote.as_mut().unwrap_or(&mut self.out);
            target.push_str("<p>");
            target.push_str(paragraph.trim_end());
            target.push_str("</p>");
        }
        self.has_text = false;
        self.pending_break = false;
    }

    fn open_quote(&mut self) {
        self.flush_paragraph();
        // A second open before a close force-closes the first quote
        self.close_quote();
        self.quote = Some(String::new());
    }

    fn close_quote(&mut self) {
        self.flush_paragraph();
        if let Some(quote) = self.quote.take() {
            if !quote.is_empty() {
                self.out.push_str("<blockquote>");
                self.out.push_str(&quote);
                self.out.push_str("</blockquote>");
            }
        }
    }

    fn finish(mut self) -> String {
        self.close_quote();
        self.out
    }
}

/// Builds HTML paragraphs from plain text.
///
/// Blank lines separate paragraphs, single newlines become `<br>`, timestamps
/// are highlighted. The input is escaped before any markup is added.
///
/// ```
/// use podcast_feed::content::synthesize_html;
///
/// assert_eq!(
///     synthesize_html("**Intro** with *guests*\n\nPart two"),
///     "<p><strong>Intro</strong> with <em>guests</em></p><p>Part two</p>"
/// );
/// ```
pub fn synthesize_html(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let escaped = html_escape::encode_text(&normalized);

    let mut synth = Synthesizer::default();
    for token in tokenize(&escaped) {
        match token {
            Token::Text(text) => synth.text(text),
            Token::Bold => synth.toggle(Inline::Bold),
            Token::Italic => synth.toggle(Inline::Italic),
            Token::LineBreak => synth.line_break(),
            Token::ParagraphBreak => synth.flush_paragraph(),
            Token::QuoteOpen => synth.open_quote(),
            Token::QuoteClose => synth.close_quote(),
        }
    }
    synth.finish()
}
