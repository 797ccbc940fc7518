//! Source code pane rendering with syntax highlighting
//!
//! This module renders the source file being browsed, with the lines of the
//! selected declaration marked and the lines of recovered parse errors
//! flagged in the gutter.
//!
//! # Features
//!
//! - Syntax highlighting for C keywords, types, strings, numbers, comments
//!   and preprocessor lines
//! - Selected declaration highlighting with a fixed anchor row
//! - Line numbering, red for lines carrying a diagnostic
//!
//! # Rendering
//!
//! The pane uses a simple character-by-character tokenizer to apply syntax
//! highlighting styles without running the real lexer, so it also works on
//! text the parser rejected.

use crate::parser::ast::Span as SourceSpan;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Simple syntax highlighting for one line of C.
///
/// `in_comment` carries an open `/* ... */` comment from one line to the next.
fn highlight_source_code(line: &str, in_comment: &mut bool) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<char> = line.chars().collect();
    let comment_style = Style::default().fg(DEFAULT_THEME.comment);

    if !*in_comment && line.trim_start().starts_with('#') {
        return Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(DEFAULT_THEME.preprocessor),
        ));
    }

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        if *in_comment {
            let start = i;
            while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                i += 1;
            }
            if i < chars.len() {
                i += 2;
                *in_comment = false;
            }
            spans.push(Span::styled(chars[start..i].iter().collect::<String>(), comment_style));
            continue;
        }

        // Line comment
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            flush_word(&mut spans, &mut current_word, false);
            spans.push(Span::styled(chars[i..].iter().collect::<String>(), comment_style));
            break;
        }

        // Block comment, closed on this line or later
        if c == '/' && chars.get(i + 1) == Some(&'*') {
            flush_word(&mut spans, &mut current_word, false);
            spans.push(Span::styled("/*", comment_style));
            i += 2;
            *in_comment = true;
            continue;
        }

        // String and character literals
        if c == '"' || c == '\'' {
            flush_word(&mut spans, &mut current_word, false);
            let mut end = i + 1;
            while end < chars.len() && chars[end] != c {
                if chars[end] == '\\' {
                    end += 2;
                } else {
                    end += 1;
                }
            }
            let end = (end + 1).min(chars.len());
            spans.push(Span::styled(
                chars[i..end].iter().collect::<String>(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        // Delimiters end the current word
        if !c.is_alphanumeric() && c != '_' {
            flush_word(&mut spans, &mut current_word, c == '(');

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                '*' => Style::default().fg(DEFAULT_THEME.secondary), // Pointer declarators stand out
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    flush_word(&mut spans, &mut current_word, false);
    Line::from(spans)
}

fn flush_word(spans: &mut Vec<Span<'static>>, word: &mut String, is_function: bool) {
    if !word.is_empty() {
        let style = get_keyword_style(word, is_function);
        spans.push(Span::styled(std::mem::take(word), style));
    }
}

fn get_keyword_style(word: &str, is_function: bool) -> Style {
    match word {
        "int" | "char" | "void" | "_Bool" | "float" | "double" | "long" | "short" | "unsigned"
        | "signed" => {
            Style::default().fg(DEFAULT_THEME.type_name) // Types
        }
        "typedef" | "extern" | "static" | "auto" | "register" | "const" | "volatile" | "struct"
        | "union" | "enum" | "sizeof" | "return" | "if" | "else" | "while" | "for" | "do"
        | "switch" | "case" | "default" | "break" | "continue" | "goto" => {
            Style::default()
                .fg(DEFAULT_THEME.keyword)
                .add_modifier(Modifier::BOLD) // Keywords
        }
        "NULL" => Style::default().fg(DEFAULT_THEME.number),
        _ if word.starts_with(|c: char| c.is_ascii_digit()) => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        _ if is_function => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg), // Identifiers
    }
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    /// Visual row the first selected line is pinned to; `None` recenters
    pub target_line_row: Option<usize>,
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    selected: Option<SourceSpan>,
    error_lines: &[usize],
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let block = Block::default()
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(super::border_style(is_focused));

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = super::visible_height(area);

    if scroll_state.target_line_row.is_none() {
        scroll_state.target_line_row = Some(visible_height / 3);
    }
    let target_row = scroll_state
        .target_line_row
        .unwrap_or_default()
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Keep the start of the selection at the target visual row
    if let Some(span) = selected {
        let first_line = span.start.line;
        if first_line > 0 && first_line <= total_lines {
            scroll_state.offset = (first_line - 1).saturating_sub(target_row);
        }
    }
    super::clamp_scroll(&mut scroll_state.offset, total_lines, visible_height);

    // Comment state has to be threaded through the lines scrolled past
    let mut in_comment = false;
    for line in lines.iter().take(scroll_state.offset) {
        highlight_source_code(line, &mut in_comment);
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_selected = selected.is_some_and(|span| span.contains_line(line_num));
            let has_error = error_lines.contains(&line_num);

            let marker = if has_error { '!' } else if is_selected { '▶' } else { ' ' };
            let line_num_str = format!("{:4}{} ", line_num, marker);

            let num_style = if has_error {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else if is_selected {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut content_line = highlight_source_code(line, &mut in_comment);
            if is_selected {
                let background = Style::default().bg(DEFAULT_THEME.selection_bg);
                for span in &mut content_line.spans {
                    span.style = span.style.patch(background);
                }
            }

            let mut final_spans = vec![Span::styled(line_num_str, num_style)];
            final_spans.extend(content_line.spans);
            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
