//! Output sizing (truncate / chunk) and rendering to plain text or Telegram HTML.
//!
//! Replies are kept as [`RichText`]: literal text plus code spans holding
//! advisory bodies verbatim. HTML is rendered from the spans directly, so a
//! body is escaped exactly once and never re-parsed.

/// One run of reply text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Span {
    Text(String),
    /// An advisory body, shown as inline code.
    Code(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RichText(Vec<Span>);

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.0.last_mut() {
            Some(Span::Text(prev)) => prev.push_str(text),
            _ => self.0.push(Span::Text(text.to_string())),
        }
    }

    pub fn push_code(&mut self, code: &str) {
        self.0.push(Span::Code(code.to_string()));
    }

    pub fn append(&mut self, other: RichText) {
        for span in other.0 {
            match span {
                Span::Text(t) => self.push_text(&t),
                Span::Code(c) => self.0.push(Span::Code(c)),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Body of the first code span, if any.
    pub fn first_code(&self) -> Option<&str> {
        self.0.iter().find_map(|s| match s {
            Span::Code(c) => Some(c.as_str()),
            Span::Text(_) => None,
        })
    }

    /// Plain text with each code span wrapped in backticks.
    pub fn plain(&self) -> String {
        let mut out = String::new();
        for span in &self.0 {
            match span {
                Span::Text(t) => out.push_str(t),
                Span::Code(c) => {
                    out.push('`');
                    out.push_str(c);
                    out.push('`');
                }
            }
        }
        out
    }

    /// Length of [`Self::plain`] in characters.
    pub fn char_len(&self) -> usize {
        self.0
            .iter()
            .map(|s| match s {
                Span::Text(t) => t.chars().count(),
                Span::Code(c) => c.chars().count() + 2,
            })
            .sum()
    }

    /// Cut to at most `max_len` plain characters. A cut code span keeps both
    /// markers; one with no room for a body character is dropped.
    pub fn truncated(&self, max_len: usize) -> RichText {
        let mut out = RichText::new();
        let mut budget = max_len;

        for span in &self.0 {
            match span {
                Span::Text(t) => {
                    let len = t.chars().count();
                    out.push_text(&truncate_chars(t, budget));
                    if len > budget {
                        break;
                    }
                    budget -= len;
                }
                Span::Code(c) => {
                    if budget <= 2 {
                        break;
                    }
                    let len = c.chars().count();
                    out.push_code(&truncate_chars(c, budget - 2));
                    if len + 2 > budget {
                        break;
                    }
                    budget -= len + 2;
                }
            }
        }
        out
    }

    /// Telegram HTML: text escaped, code spans as `<code>`.
    pub fn html(&self) -> String {
        self.html_bounded(usize::MAX)
    }

    /// [`Self::html`] cut so the markup itself stays within `max_len`
    /// characters. Entities and tags are never split.
    pub fn html_bounded(&self, max_len: usize) -> String {
        let mut out = String::new();
        let mut used = 0usize;

        for span in &self.0 {
            let (open, close, body) = match span {
                Span::Text(t) => ("", "", t),
                Span::Code(c) => ("<code>", "</code>", c),
            };
            let frame = open.len() + close.len();
            if used + frame > max_len {
                break;
            }

            let mut piece = String::new();
            let mut piece_len = 0usize;
            let mut cut = false;
            for ch in body.chars() {
                let n = escaped_len(ch);
                if used + frame + piece_len + n > max_len {
                    cut = true;
                    break;
                }
                push_escaped(&mut piece, ch);
                piece_len += n;
            }

            if !(piece.is_empty() && cut && !open.is_empty()) {
                out.push_str(open);
                out.push_str(&piece);
                out.push_str(close);
                used += frame + piece_len;
            }
            if cut {
                break;
            }
        }
        out
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        let mut out = RichText::new();
        out.push_text(text);
        out
    }
}

impl From<String> for RichText {
    fn from(text: String) -> Self {
        RichText::from(text.as_str())
    }
}

/// Reply text ready for the transport, each chunk within the size limit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormattedOutput(Vec<RichText>);

impl FormattedOutput {
    /// One logical message, cut to `max_len` characters. Never split.
    pub fn truncated(text: RichText, max_len: usize) -> Self {
        Self(vec![text.truncated(max_len)])
    }

    /// Independent blocks packed into as few chunks as fit `max_len`.
    pub fn chunked<I>(blocks: I, max_len: usize) -> Self
    where
        I: IntoIterator,
        I::Item: Into<RichText>,
    {
        Self(chunk_blocks(blocks, max_len))
    }

    pub fn single(text: impl Into<RichText>) -> Self {
        Self(vec![text.into()])
    }

    pub fn chunks(&self) -> &[RichText] {
        &self.0
    }

    /// Every chunk as plain text.
    pub fn plain_chunks(&self) -> Vec<String> {
        self.0.iter().map(RichText::plain).collect()
    }

    /// Chunks joined back together, for single-message surfaces (inline results).
    pub fn joined(&self) -> RichText {
        let mut out = RichText::new();
        for (i, chunk) in self.0.iter().enumerate() {
            if i > 0 {
                out.push_text(BLOCK_SEPARATOR);
            }
            out.append(chunk.clone());
        }
        out
    }
}

impl IntoIterator for FormattedOutput {
    type Item = RichText;
    type IntoIter = std::vec::IntoIter<RichText>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

const BLOCK_SEPARATOR: &str = "\n\n";

/// Cut `text` to at most `max_len` characters (Unicode scalar values).
pub fn truncate_chars(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Accumulate blocks into chunks of at most `max_len` characters.
///
/// The buffer is flushed whenever appending the next block (plus separator)
/// would overflow; that block then starts the next buffer. A block that is
/// oversized on its own is truncated before it is buffered.
pub fn chunk_blocks<I>(blocks: I, max_len: usize) -> Vec<RichText>
where
    I: IntoIterator,
    I::Item: Into<RichText>,
{
    let sep_len = BLOCK_SEPARATOR.chars().count();
    let mut out = Vec::new();
    let mut buf = RichText::new();
    let mut buf_len = 0usize;

    for block in blocks {
        let block = block.into().truncated(max_len);
        let block_len = block.char_len();

        if buf.is_empty() {
            buf = block;
            buf_len = block_len;
            continue;
        }

        if buf_len + sep_len + block_len > max_len {
            out.push(std::mem::take(&mut buf));
            buf = block;
            buf_len = block_len;
            continue;
        }

        buf.push_text(BLOCK_SEPARATOR);
        buf.append(block);
        buf_len += sep_len + block_len;
    }

    if !buf.is_empty() {
        out.push(buf);
    }
    out
}

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        push_escaped(&mut out, ch);
    }
    out
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        c => out.push(c),
    }
}

fn escaped_len(ch: char) -> usize {
    match ch {
        '&' => 5,
        '<' | '>' => 4,
        '"' => 6,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(header: &str, body: &str) -> RichText {
        let mut t = RichText::from(header);
        t.push_code(body);
        t
    }

    fn plain(chunks: Vec<RichText>) -> Vec<String> {
        chunks.iter().map(RichText::plain).collect()
    }

    #[test]
    fn escapes_html() {
        let s = r#"<a href="x&y">"#;
        assert_eq!(escape_html(s), "&lt;a href=&quot;x&amp;y&quot;&gt;");
    }

    #[test]
    fn renders_bodies_as_code_spans() {
        let t = report("KSLC ATIS (COMBINED):\n\n", "RWY 34L <CLSD>");
        assert_eq!(t.plain(), "KSLC ATIS (COMBINED):\n\n`RWY 34L <CLSD>`");
        assert_eq!(
            t.html(),
            "KSLC ATIS (COMBINED):\n\n<code>RWY 34L &lt;CLSD&gt;</code>"
        );
    }

    #[test]
    fn backticks_inside_a_body_survive_html() {
        let t = report("[DEPARTURE]\n", "RWY `34L` CLSD");
        assert_eq!(t.html(), "[DEPARTURE]\n<code>RWY `34L` CLSD</code>");
        assert_eq!(t.first_code(), Some("RWY `34L` CLSD"));
    }

    #[test]
    fn text_runs_are_merged() {
        let mut t = RichText::from("a");
        t.push_text("b");
        t.push_text("");
        assert_eq!(t.0, vec![Span::Text("ab".to_string())]);
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn truncation_keeps_code_markers() {
        let t = report("AB:", "xxxxxxxx");
        assert_eq!(t.truncated(8).plain(), "AB:`xxx`");
        assert_eq!(t.truncated(5).plain(), "AB:");
        assert_eq!(t.truncated(2).plain(), "AB");
        assert_eq!(t.truncated(100), t);
    }

    #[test]
    fn truncated_output_has_one_chunk() {
        let out = FormattedOutput::truncated(RichText::from("a".repeat(50)), 10);
        assert_eq!(out.plain_chunks(), vec!["a".repeat(10)]);
    }

    #[test]
    fn bounded_html_never_splits_entities() {
        let t = report("", "a<b");
        assert_eq!(t.html_bounded(100), "<code>a&lt;b</code>");
        // "<code>a" + "&lt;" would need 18 with the closing tag.
        assert_eq!(t.html_bounded(17), "<code>a</code>");
        assert_eq!(t.html_bounded(13), "");
        assert!(RichText::from("x".repeat(20)).html_bounded(7).chars().count() <= 7);
    }

    #[test]
    fn joined_output_keeps_spans() {
        let out = FormattedOutput::chunked([report("A ", "1"), report("B ", "2")], 6);
        assert_eq!(out.chunks().len(), 2);
        assert_eq!(out.joined().html(), "A <code>1</code>\n\nB <code>2</code>");
    }

    #[test]
    fn chunks_pack_whole_blocks() {
        let blocks = ["aaaa", "bbbb", "cccc"];
        // "aaaa\n\nbbbb" is 10 chars; adding "cccc" would need 16.
        assert_eq!(plain(chunk_blocks(blocks, 12)), vec!["aaaa\n\nbbbb", "cccc"]);
        assert_eq!(plain(chunk_blocks(blocks, 16)), vec!["aaaa\n\nbbbb\n\ncccc"]);
        assert_eq!(plain(chunk_blocks(blocks, 9)), vec!["aaaa", "bbbb", "cccc"]);
    }

    #[test]
    fn oversized_block_is_truncated_first() {
        let out = chunk_blocks(["xxxxxxxx", "yy"], 5);
        assert_eq!(plain(out), vec!["xxxxx", "yy"]);
    }

    #[test]
    fn no_blocks_no_chunks() {
        assert!(chunk_blocks(Vec::<String>::new(), 10).is_empty());
        assert!(FormattedOutput::chunked(Vec::<String>::new(), 10)
            .chunks()
            .is_empty());
    }

    #[test]
    fn every_chunk_fits() {
        let blocks: Vec<RichText> = (0..50)
            .map(|i| report("S ", &format!("{i:03}").repeat(i % 7 + 1)))
            .collect();
        for chunk in chunk_blocks(blocks, 40) {
            assert!(chunk.char_len() <= 40);
            assert_eq!(chunk.plain().chars().count(), chunk.char_len());
        }
    }
}
