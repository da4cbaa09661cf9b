//! Minimal markdown rendering for comprehensive explanations.
//!
//! Two rules only, matching what the generator asks the model to produce:
//! blank lines separate paragraphs, and `**bold**` runs render emphasized.
//! A paragraph that is nothing but a single bold run renders as a section
//! header. Everything else passes through verbatim.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Render markdown text into styled lines for a Paragraph widget.
pub fn render(text: &str) -> Vec<Line<'static>> {
    text.lines()
        .map(|line| {
            if is_header(line) {
                let inner = line.trim();
                Line::from(Span::styled(
                    inner[2..inner.len() - 2].to_string(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(inline_spans(line))
            }
        })
        .collect()
}

/// A line that is exactly one `**...**` run, nothing outside it.
fn is_header(line: &str) -> bool {
    let t = line.trim();
    t.len() > 4
        && t.starts_with("**")
        && t.ends_with("**")
        && !t[2..t.len() - 2].contains("**")
}

/// Split a line on `**` markers, alternating plain and bold spans.
/// An unclosed marker renders literally.
fn inline_spans(line: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut rest = line;
    loop {
        match rest.find("**") {
            None => {
                if !rest.is_empty() {
                    spans.push(Span::raw(rest.to_string()));
                }
                break;
            }
            Some(open) => {
                let after = &rest[open + 2..];
                match after.find("**") {
                    None => {
                        // Unclosed marker, emit the remainder as-is
                        spans.push(Span::raw(rest.to_string()));
                        break;
                    }
                    Some(close) => {
                        if open > 0 {
                            spans.push(Span::raw(rest[..open].to_string()));
                        }
                        spans.push(Span::styled(
                            after[..close].to_string(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ));
                        rest = &after[close + 2..];
                    }
                }
            }
        }
    }
    if spans.is_empty() {
        spans.push(Span::raw(String::new()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn paragraphs_and_headers() {
        let lines = render("**Context**\n\nPlain paragraph.");
        assert_eq!(lines.len(), 3);
        assert_eq!(line_text(&lines[0]), "Context");
        assert!(lines[0].spans[0]
            .style
            .add_modifier
            .contains(Modifier::BOLD));
        assert_eq!(line_text(&lines[1]), "");
        assert_eq!(line_text(&lines[2]), "Plain paragraph.");
    }

    #[test]
    fn inline_bold_splits_spans() {
        let lines = render("a **b** c");
        assert_eq!(lines.len(), 1);
        let spans = &lines[0].spans;
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].content, "a ");
        assert_eq!(spans[1].content, "b");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[2].content, " c");
    }

    #[test]
    fn unclosed_marker_is_literal() {
        let lines = render("a **b");
        assert_eq!(line_text(&lines[0]), "a **b");
    }

    #[test]
    fn bold_at_start_is_not_header_when_text_follows() {
        let lines = render("**Term** and more");
        assert_eq!(lines[0].spans[0].content, "Term");
        assert_eq!(lines[0].spans[1].content, " and more");
    }
}
