//! Markdown rendering and text statistics for post bodies
//!
//! Rendering follows GitHub-flavoured markdown with a few house rules:
//!
//! - single newlines become `<br />`
//! - raw HTML in the source is dropped, never passed through
//! - `javascript:` / `data:` / `vbscript:` link targets are blanked
//! - fenced code is wrapped as `<pre><code class="hljs language-{lang}">`,
//!   falling back to `plaintext` when no usable language tag is given

use once_cell::sync::Lazy;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

/// Reading speed used by [`estimate_reading_time`]
pub const WORDS_PER_MINUTE: usize = 200;

/// Default excerpt length in characters
pub const DEFAULT_EXCERPT_LENGTH: usize = 150;

const FALLBACK_LANGUAGE: &str = "plaintext";
const UNSAFE_SCHEMES: [&str; 3] = ["javascript:", "data:", "vbscript:"];

// Language tags: letters, digits and a few punctuation marks (c++, c#, objective-c)
static LANGUAGE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_+#.-]*$").expect("language regex is valid"));

// Markdown emphasis/heading/code markers ignored when counting words
static MARKER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#*`]").expect("marker regex is valid"));

fn options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

fn code_language(kind: &CodeBlockKind<'_>) -> String {
    match kind {
        CodeBlockKind::Fenced(info) => info
            .split_whitespace()
            .next()
            .filter(|lang| LANGUAGE_REGEX.is_match(lang))
            .map(str::to_lowercase)
            .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string()),
        CodeBlockKind::Indented => FALLBACK_LANGUAGE.to_string(),
    }
}

fn is_unsafe_url(url: &str) -> bool {
    let lowered = url.trim_start().to_ascii_lowercase();
    UNSAFE_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme))
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_unsafe_url(&url) {
        CowStr::Borrowed("")
    } else {
        url
    }
}

/// Render markdown to sanitized HTML
pub fn to_html(markdown: &str) -> String {
    let events = Parser::new_ext(markdown, options()).filter_map(|event| match event {
        Event::Html(_) | Event::InlineHtml(_) => None,
        Event::SoftBreak => Some(Event::HardBreak),
        Event::Start(Tag::CodeBlock(kind)) => Some(Event::Html(
            format!("<pre><code class=\"hljs language-{}\">", code_language(&kind)).into(),
        )),
        Event::End(TagEnd::CodeBlock) => Some(Event::Html("</code></pre>\n".into())),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Some(Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        })),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Some(Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        })),
        other => Some(other),
    });

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, events);
    output
}

/// Visible text of the rendered document, blocks separated by newlines
pub fn to_plain_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock) => {
                text.push('\n')
            }
            _ => {}
        }
    }

    text.trim().to_string()
}

/// Plain-text excerpt of at most `max_length` characters plus `...`
pub fn extract_excerpt(markdown: &str, max_length: usize) -> String {
    let text = to_plain_text(markdown);
    if text.chars().count() <= max_length {
        return text;
    }
    let mut excerpt: String = text.chars().take(max_length).collect();
    excerpt.push_str("...");
    excerpt
}

/// Whitespace-separated words, ignoring `#`, `*` and backtick markers
pub fn count_words(markdown: &str) -> usize {
    MARKER_REGEX.replace_all(markdown, "").split_whitespace().count()
}

/// Minutes to read at [`WORDS_PER_MINUTE`], rounded up
pub fn estimate_reading_time(markdown: &str) -> usize {
    reading_time_at(markdown, WORDS_PER_MINUTE)
}

pub fn reading_time_at(markdown: &str, words_per_minute: usize) -> usize {
    count_words(markdown).div_ceil(words_per_minute.max(1))
}
