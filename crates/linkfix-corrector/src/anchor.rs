//! Anchor discovery and rewriting in rich-text markup
//!
//! Anchors are located as spans of the raw field value. Every span keeps the
//! exact bytes of the opening tag, the inner markup and the closing tag, so a
//! rewrite only touches the href value and the inner content and everything
//! else in the field stays byte-for-byte identical.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a\s*>").expect("anchor pattern is valid")
});

static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'<>`]+)))?"#)
        .expect("attribute pattern is valid")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

/// One attribute of an opening tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Attribute name as written
    pub name: &'a str,
    /// Raw (still entity-encoded) value, if the attribute has one
    pub value: Option<&'a str>,
    /// Byte range of the value inside the opening tag
    value_range: Option<Range<usize>>,
}

/// An `<a>` element found in a field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor<'a> {
    span: Range<usize>,
    raw: &'a str,
    open_tag: &'a str,
    inner: &'a str,
    close_tag: &'a str,
    attributes: Vec<Attribute<'a>>,
}

impl<'a> Anchor<'a> {
    /// Byte range of the whole element in the field value
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// The element exactly as written
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Inner markup between the opening and closing tag
    pub fn inner(&self) -> &'a str {
        self.inner
    }

    /// Parsed attributes of the opening tag
    pub fn attributes(&self) -> &[Attribute<'a>] {
        &self.attributes
    }

    /// Raw value of an attribute, matched case-insensitively
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.find_attribute(name).and_then(|attr| attr.value)
    }

    /// Raw href value
    pub fn href(&self) -> Option<&'a str> {
        self.attribute("href")
    }

    /// Visible text: inner markup with nested tags removed
    ///
    /// Entities are kept encoded so the text compares directly against
    /// `escape_text` output.
    pub fn visible_text(&self) -> String {
        TAG_RE.replace_all(self.inner, "").into_owned()
    }

    /// Render this anchor with a new href value and/or new inner markup
    ///
    /// `None` keeps the current value. If the anchor has no href attribute
    /// the opening tag is kept as is.
    pub fn rewrite(&self, href: Option<&str>, inner: Option<&str>) -> String {
        let mut out = String::with_capacity(self.raw.len() + 16);

        match (href, self.find_attribute("href").and_then(|a| a.value_range.clone())) {
            (Some(href), Some(range)) => {
                out.push_str(&self.open_tag[..range.start]);
                out.push_str(href);
                out.push_str(&self.open_tag[range.end..]);
            }
            _ => out.push_str(self.open_tag),
        }

        out.push_str(inner.unwrap_or(self.inner));
        out.push_str(self.close_tag);
        out
    }

    fn find_attribute(&self, name: &str) -> Option<&Attribute<'a>> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
    }
}

/// Find every anchor element in `html`, in document order
///
/// # Examples
///
/// ```
/// use linkfix_corrector::anchor::find_anchors;
///
/// let html = r#"<p>See <a href="https://h/x?projectId=5&docId=1">REQ-1</a>.</p>"#;
/// let anchors = find_anchors(html);
/// assert_eq!(anchors.len(), 1);
/// assert_eq!(anchors[0].href(), Some("https://h/x?projectId=5&docId=1"));
/// assert_eq!(anchors[0].visible_text(), "REQ-1");
/// ```
pub fn find_anchors(html: &str) -> Vec<Anchor<'_>> {
    ANCHOR_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let attrs = caps.get(1)?;
            let inner = caps.get(2)?;

            let open_tag = &html[whole.start()..inner.start()];
            let attr_offset = attrs.start() - whole.start();

            Some(Anchor {
                span: whole.range(),
                raw: whole.as_str(),
                open_tag,
                inner: inner.as_str(),
                close_tag: &html[inner.end()..whole.end()],
                attributes: parse_attributes(attrs.as_str(), attr_offset),
            })
        })
        .collect()
}

fn parse_attributes(source: &str, offset: usize) -> Vec<Attribute<'_>> {
    ATTRIBUTE_RE
        .captures_iter(source)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let value = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4));
            Some(Attribute {
                name,
                value: value.map(|m| m.as_str()),
                value_range: value.map(|m| offset + m.start()..offset + m.end()),
            })
        })
        .collect()
}

/// Escape plain text for use as anchor content
///
/// ```
/// use linkfix_corrector::anchor::escape_text;
///
/// assert_eq!(escape_text("A & B <draft>"), "A &amp; B &lt;draft&gt;");
/// ```
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode the entities that show up in href values
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    // Ampersands go last so `&amp;lt;` stays the literal text `&lt;`
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#38;", "&")
        .replace("&amp;", "&")
}
