use pulldown_cmark::{Event, Parser, Tag};

/// Cleaned text at or above this many characters is worth voicing.
pub const MIN_VOICE_CHARS: usize = 300;

/// Strip Markdown syntax, keeping only the readable text.
#[must_use]
pub fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for event in Parser::new(text) {
        match event {
            Event::Text(t) | Event::Code(t) => out.push_str(&t),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak | Event::Rule => out.push('\n'),
            Event::End(
                Tag::Paragraph
                | Tag::Heading(..)
                | Tag::Item
                | Tag::CodeBlock(_)
                | Tag::BlockQuote
                | Tag::TableRow
                | Tag::TableHead,
            ) => out.push('\n'),
            Event::End(Tag::TableCell) => out.push(' '),
            _ => {}
        }
    }

    out.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn should_generate_voice(text: &str) -> bool {
    clean_text(text).chars().count() >= MIN_VOICE_CHARS
}
