//! Details pane: the selected declaration taken apart

use crate::explain::{declaration_to_c, declarator_to_c, describe_specifier, Explainer};
use crate::parser::ast::{BaseType, ExternalDeclaration, ExternalKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

fn label(name: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", name), Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(value, Style::default().fg(DEFAULT_THEME.fg)),
    ])
}

fn heading(text: String) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD),
    ))
}

fn explanation(text: String, indent: usize) -> Line<'static> {
    Line::from(Span::styled(
        format!("{}{}", " ".repeat(indent), text),
        Style::default().fg(DEFAULT_THEME.success),
    ))
}

/// Build the pane content for one item
fn detail_lines(item: &ExternalDeclaration, explainer: &Explainer) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let decl = &item.declaration;

    let kind = match item.kind {
        ExternalKind::Declaration => "declaration",
        ExternalKind::FunctionDefinition => "function definition (body skipped)",
    };
    lines.push(label("Kind", kind.to_string()));
    lines.push(label(
        "Lines",
        format!("{}-{}", item.span.start.line, item.span.end.line),
    ));

    let Some(spec) = decl.specifier() else {
        return lines;
    };
    lines.push(label("Specifier", describe_specifier(spec)));

    match &spec.base {
        BaseType::Record {
            members: Some(members),
            ..
        } => {
            lines.push(Line::default());
            lines.push(heading(format!("Members ({})", members.len())));
            for member in members {
                lines.push(Line::from(Span::styled(
                    format!("  {}", declaration_to_c(member)),
                    Style::default().fg(DEFAULT_THEME.fg),
                )));
                for sentence in explainer.explain_declaration(member) {
                    lines.push(explanation(sentence, 4));
                }
            }
        }
        BaseType::Enum {
            enumerators: Some(enumerators),
            ..
        } => {
            lines.push(Line::default());
            lines.push(heading(format!("Enumerators ({})", enumerators.len())));
            for enumerator in enumerators {
                let value = enumerator
                    .resolved
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "?".to_string());
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {}", enumerator.name),
                        Style::default().fg(DEFAULT_THEME.fg),
                    ),
                    Span::styled(
                        format!(" = {}", value),
                        Style::default().fg(DEFAULT_THEME.number),
                    ),
                ]));
            }
        }
        _ => {}
    }

    lines.push(Line::default());
    lines.push(heading(format!("Declarators ({})", decl.len())));
    if decl.is_empty() {
        for sentence in explainer.explain_item(item) {
            lines.push(explanation(sentence, 2));
        }
        return lines;
    }

    for (declarator, sentence) in decl.declarators().zip(explainer.explain_item(item)) {
        lines.push(Line::from(Span::styled(
            format!("  {}", declarator_to_c(declarator)),
            Style::default().fg(DEFAULT_THEME.function),
        )));
        lines.push(explanation(sentence, 4));
    }
    lines
}

/// Render the details pane for the selected item, if any
pub fn render_details_pane(
    frame: &mut Frame,
    area: Rect,
    item: Option<&ExternalDeclaration>,
    explainer: &Explainer,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_style(super::border_style(is_focused));

    let Some(item) = item else {
        let paragraph = Paragraph::new("(nothing selected)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let lines = detail_lines(item, explainer);
    super::clamp_scroll(scroll_offset, lines.len(), super::visible_height(area));

    let visible: Vec<Line> = lines.into_iter().skip(*scroll_offset).collect();
    let paragraph = Paragraph::new(visible).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(paragraph, area);
}
