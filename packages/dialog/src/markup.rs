//! Tolerant markup scanning for fetched fragments.
//!
//! This is not an HTML parser. It walks raw tags, tracks nesting depth for
//! same-named elements, and understands quoted attribute values, comments,
//! void elements, and self-closing tags. That is enough to locate a target
//! region inside a fetched document and to pull script elements out of
//! rendered content.

/// A script element found in rendered content. Inert insertion of markup
/// does not execute embedded scripts, so the controller hands these to the
/// document tree to be re-created as executable elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    External { src: String },
    Inline { text: String },
}

/// A standalone markup fragment, e.g. a fetched document body
#[derive(Debug, Clone, Copy)]
pub struct Fragment<'a> {
    source: &'a str,
}

/// An element located inside a [`Fragment`]
#[derive(Debug, Clone, Copy)]
pub struct FragmentElement<'a> {
    pub tag_name: &'a str,
    inner: &'a str,
}

impl<'a> FragmentElement<'a> {
    /// The markup between the element's open and close tags
    pub fn inner_markup(&self) -> &'a str {
        self.inner
    }
}

impl<'a> Fragment<'a> {
    pub fn parse(source: &'a str) -> Self {
        Self { source }
    }

    /// First element whose `id` attribute equals `id`
    pub fn element_by_id(&self, id: &str) -> Option<FragmentElement<'a>> {
        let mut pos = 0;
        while let Some(tag) = next_tag(self.source, pos) {
            pos = tag.end;
            if tag.is_close {
                continue;
            }
            if attribute_value(tag.attrs, "id").as_deref() == Some(id) {
                let inner = if tag.self_closing || is_void_element(tag.name) {
                    ""
                } else {
                    self.inner_of(&tag)
                };
                return Some(FragmentElement {
                    tag_name: tag.name,
                    inner,
                });
            }
        }
        None
    }

    /// Text between an open tag and its matching close tag, depth-aware for
    /// same-named nested elements. An unclosed element extends to the end of
    /// the fragment.
    fn inner_of(&self, open: &RawTag<'a>) -> &'a str {
        let mut depth = 1usize;
        let mut pos = open.end;

        while let Some(tag) = next_tag(self.source, pos) {
            pos = tag.end;
            if !tag.name.eq_ignore_ascii_case(open.name) {
                continue;
            }
            if tag.is_close {
                depth -= 1;
                if depth == 0 {
                    return &self.source[open.end..tag.start];
                }
            } else if !tag.self_closing && !is_void_element(tag.name) {
                depth += 1;
            }
        }

        &self.source[open.end..]
    }
}

/// Script elements in `markup`, in document order
pub fn extract_scripts(markup: &str) -> Vec<ScriptSource> {
    let mut scripts = Vec::new();
    let mut pos = 0;

    while let Some(tag) = next_tag(markup, pos) {
        pos = tag.end;
        if tag.is_close || !tag.name.eq_ignore_ascii_case("script") {
            continue;
        }

        match attribute_value(tag.attrs, "src") {
            Some(src) if !src.is_empty() => {
                scripts.push(ScriptSource::External { src });
            }
            _ => {
                // Inline script: text up to the close tag. Script bodies do
                // not nest, so the first close tag wins.
                let rest = &markup[tag.end..];
                let text = match find_ignore_ascii_case(rest, "</script") {
                    Some(rel) => {
                        pos = tag.end + rel;
                        &rest[..rel]
                    }
                    None => {
                        pos = markup.len();
                        rest
                    }
                };
                scripts.push(ScriptSource::Inline {
                    text: text.to_string(),
                });
            }
        }
    }

    scripts
}

#[derive(Debug)]
struct RawTag<'a> {
    /// Byte offset of `<`
    start: usize,
    /// Byte offset just past `>`
    end: usize,
    name: &'a str,
    /// Text between the tag name and the closing `>`
    attrs: &'a str,
    is_close: bool,
    self_closing: bool,
}

/// Next raw tag at or after `from`. Skips comments and stray `<`.
fn next_tag(source: &str, from: usize) -> Option<RawTag<'_>> {
    let bytes = source.as_bytes();
    let mut from = from;

    loop {
        let start = from + source[from..].find('<')?;

        if source[start..].starts_with("<!--") {
            match source[start + 4..].find("-->") {
                Some(rel) => {
                    from = start + 4 + rel + 3;
                    continue;
                }
                None => return None,
            }
        }

        let mut cursor = start + 1;
        let is_close = bytes.get(cursor) == Some(&b'/');
        if is_close {
            cursor += 1;
        }

        let name_start = cursor;
        while cursor < bytes.len()
            && (bytes[cursor].is_ascii_alphanumeric() || bytes[cursor] == b'-')
        {
            cursor += 1;
        }

        if cursor == name_start || !bytes[name_start].is_ascii_alphabetic() {
            // Not a tag; keep scanning after the `<`
            from = start + 1;
            continue;
        }

        let name = &source[name_start..cursor];

        // Find the closing `>`, respecting quoted attribute values
        let mut quote: Option<u8> = None;
        let mut gt = None;
        let mut i = cursor;
        while i < bytes.len() {
            let b = bytes[i];
            match quote {
                Some(q) => {
                    if b == q {
                        quote = None;
                    }
                }
                None => {
                    if b == b'"' || b == b'\'' {
                        quote = Some(b);
                    } else if b == b'>' {
                        gt = Some(i);
                        break;
                    }
                }
            }
            i += 1;
        }
        let gt = gt?;

        let mut attrs_end = gt;
        let mut self_closing = false;
        if attrs_end > cursor && bytes[attrs_end - 1] == b'/' {
            self_closing = true;
            attrs_end -= 1;
        }

        return Some(RawTag {
            start,
            end: gt + 1,
            name,
            attrs: &source[cursor..attrs_end],
            is_close,
            self_closing,
        });
    }
}

/// Value of the named attribute inside a tag's attribute text. Valueless
/// attributes yield an empty string.
fn attribute_value(attrs: &str, name: &str) -> Option<String> {
    let bytes = attrs.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }

        let name_start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'=' {
            i += 1;
        }
        let attr_name = &attrs[name_start..i];

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut value = String::new();
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let q = bytes[i];
                i += 1;
                let value_start = i;
                while i < bytes.len() && bytes[i] != q {
                    i += 1;
                }
                value = attrs[value_start..i].to_string();
                if i < bytes.len() {
                    i += 1;
                }
            } else {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                value = attrs[value_start..i].to_string();
            }
        }

        if attr_name.eq_ignore_ascii_case(name) {
            return Some(value);
        }
    }

    None
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

fn is_void_element(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
