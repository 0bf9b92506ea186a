use super::{MarkupError, MarkupErrorKind};

/// Elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose end tag may be omitted. Leaving them open is not an error.
const OPTIONAL_END_ELEMENTS: &[&str] = &[
    "p", "li", "dt", "dd", "option", "optgroup", "tr", "td", "th", "thead", "tbody", "tfoot",
    "colgroup", "rt", "rp",
];

/// Elements whose content is raw text up to their own end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

struct OpenElement {
    name: String,
    offset: usize,
}

/// Parses `html` and returns every structural error in document order.
/// An empty result means the input is well formed.
pub fn parse_errors(html: &str) -> Vec<MarkupError> {
    let mut parser = Parser::new(html);
    parser.run();
    parser.finish()
}

struct Parser<'a> {
    src: &'a str,
    lower: String,
    pos: usize,
    stack: Vec<OpenElement>,
    errors: Vec<(usize, MarkupErrorKind)>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            lower: src.to_ascii_lowercase(),
            pos: 0,
            stack: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn bytes(&self) -> &[u8] {
        self.src.as_bytes()
    }

    fn byte_at(&self, i: usize) -> Option<u8> {
        self.bytes().get(i).copied()
    }

    fn run(&mut self) {
        while let Some(rel) = self.src[self.pos..].find('<') {
            let start = self.pos + rel;
            let rest = &self.src[start..];

            if rest.starts_with("<!--") {
                self.skip_comment(start);
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.pos = match self.src[start..].find('>') {
                    Some(end) => start + end + 1,
                    None => self.src.len(),
                };
            } else if rest.starts_with("</") && self.is_name_start(start + 2) {
                self.end_tag(start);
            } else if self.is_name_start(start + 1) {
                self.start_tag(start);
            } else {
                // A bare '<' is just text.
                self.pos = start + 1;
            }
        }

        let unclosed: Vec<_> = self.stack.drain(..).collect();
        for element in unclosed {
            self.report_unclosed(element);
        }
    }

    fn finish(mut self) -> Vec<MarkupError> {
        self.errors.sort_by_key(|(offset, _)| *offset);
        self.errors
            .iter()
            .map(|(offset, kind)| {
                let (line, column) = line_column(self.src, *offset);
                MarkupError {
                    kind: kind.clone(),
                    line,
                    column,
                }
            })
            .collect()
    }

    fn skip_comment(&mut self, start: usize) {
        match self.src[start + 4..].find("-->") {
            Some(end) => self.pos = start + 4 + end + 3,
            None => {
                self.errors.push((start, MarkupErrorKind::UnterminatedComment));
                self.pos = self.src.len();
            }
        }
    }

    fn start_tag(&mut self, start: usize) {
        let (name, name_end) = self.read_name(start + 1);
        let Some((end, self_closing)) = self.scan_tag_end(name_end) else {
            self.errors.push((start, MarkupErrorKind::UnterminatedTag(name)));
            self.pos = self.src.len();
            return;
        };
        self.pos = end + 1;

        if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
            return;
        }

        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            self.skip_raw_text(start, name);
            return;
        }

        self.stack.push(OpenElement {
            name,
            offset: start,
        });
    }

    fn skip_raw_text(&mut self, start: usize, name: String) {
        let closing = format!("</{name}");
        let Some(close_start) = self.find_raw_text_end(&closing) else {
            self.errors.push((start, MarkupErrorKind::TagNotClosed(name)));
            self.pos = self.src.len();
            return;
        };
        match self.scan_tag_end(close_start + closing.len()) {
            Some((end, _)) => self.pos = end + 1,
            None => {
                self.errors
                    .push((close_start, MarkupErrorKind::UnterminatedTag(format!("/{name}"))));
                self.pos = self.src.len();
            }
        }
    }

    /// Offset of the next `closing` end tag. `</textareas>` does not close a
    /// `textarea`, so the name must be followed by a tag delimiter.
    fn find_raw_text_end(&self, closing: &str) -> Option<usize> {
        let mut from = self.pos;
        while let Some(rel) = self.lower[from..].find(closing) {
            let at = from + rel;
            match self.byte_at(at + closing.len()) {
                None | Some(b'>' | b'/') => return Some(at),
                Some(b) if b.is_ascii_whitespace() => return Some(at),
                Some(_) => from = at + closing.len(),
            }
        }
        None
    }

    fn end_tag(&mut self, start: usize) {
        let (name, name_end) = self.read_name(start + 2);
        let Some((end, _)) = self.scan_tag_end(name_end) else {
            self.errors
                .push((start, MarkupErrorKind::UnterminatedTag(format!("/{name}"))));
            self.pos = self.src.len();
            return;
        };
        self.pos = end + 1;

        if VOID_ELEMENTS.contains(&name.as_str()) {
            return;
        }

        match self.stack.iter().rposition(|open| open.name == name) {
            Some(idx) => {
                let inner: Vec<_> = self.stack.drain(idx..).skip(1).collect();
                for element in inner {
                    self.report_unclosed(element);
                }
            }
            None => self.errors.push((start, MarkupErrorKind::TagNotOpened(name))),
        }
    }

    fn report_unclosed(&mut self, element: OpenElement) {
        if !OPTIONAL_END_ELEMENTS.contains(&element.name.as_str()) {
            self.errors
                .push((element.offset, MarkupErrorKind::TagNotClosed(element.name)));
        }
    }

    fn is_name_start(&self, i: usize) -> bool {
        self.byte_at(i).is_some_and(|b| b.is_ascii_alphabetic())
    }

    fn read_name(&self, from: usize) -> (String, usize) {
        let end = self.bytes()[from..]
            .iter()
            .position(|&b| !(b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')))
            .map_or(self.src.len(), |n| from + n);
        (self.lower[from..end].to_string(), end)
    }

    /// Finds the `>` closing a tag, skipping quoted attribute values.
    /// Also reports whether the tag ends in `/>`. A `/` inside an unquoted
    /// value (`<a href=x/>`) belongs to the value.
    fn scan_tag_end(&self, from: usize) -> Option<(usize, bool)> {
        let mut quote: Option<u8> = None;
        let mut awaiting_value = false;
        let mut in_unquoted_value = false;
        let mut self_closing = false;
        for (i, &b) in self.bytes().iter().enumerate().skip(from) {
            if let Some(q) = quote {
                if b == q {
                    quote = None;
                }
                continue;
            }
            match b {
                b'>' => return Some((i, self_closing)),
                _ if b.is_ascii_whitespace() => in_unquoted_value = false,
                b'"' | b'\'' if !in_unquoted_value => {
                    quote = Some(b);
                    awaiting_value = false;
                    self_closing = false;
                }
                b'=' if !in_unquoted_value => {
                    awaiting_value = true;
                    self_closing = false;
                }
                _ => {
                    if awaiting_value {
                        awaiting_value = false;
                        in_unquoted_value = true;
                    }
                    self_closing = b == b'/' && !in_unquoted_value;
                }
            }
        }
        None
    }
}

fn line_column(src: &str, offset: usize) -> (usize, usize) {
    let before = &src[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = src[line_start..offset].chars().count() + 1;
    (line, column)
}
