//! Declaration list pane

use crate::explain::declaration_to_c;
use crate::parser::ast::{ExternalKind, TranslationUnit};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Render one row per file-scope declaration, keeping `selected` in view
pub fn render_declarations_pane(
    frame: &mut Frame,
    area: Rect,
    unit: &TranslationUnit,
    selected: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(format!(" Declarations ({}) ", unit.items.len()))
        .borders(Borders::ALL)
        .border_style(super::border_style(is_focused));

    if unit.items.is_empty() {
        let paragraph = Paragraph::new("(no declarations)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = super::visible_height(area);

    // Scroll just enough to show the selection
    if selected < *scroll_offset {
        *scroll_offset = selected;
    } else if selected >= *scroll_offset + visible_height {
        *scroll_offset = selected + 1 - visible_height;
    }
    super::clamp_scroll(scroll_offset, unit.items.len(), visible_height);

    let items: Vec<ListItem> = unit
        .items
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, item)| {
            let is_selected = idx == selected;
            let (tag, tag_color) = match item.kind {
                ExternalKind::Declaration => ("decl", DEFAULT_THEME.type_name),
                ExternalKind::FunctionDefinition => ("def ", DEFAULT_THEME.function),
            };

            let mut text_style = Style::default().fg(DEFAULT_THEME.fg);
            if is_selected {
                text_style = text_style
                    .bg(DEFAULT_THEME.selection_bg)
                    .add_modifier(Modifier::BOLD);
            }

            let line = Line::from(vec![
                Span::styled(
                    format!("{:4} ", item.span.start.line),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(format!("{} ", tag), Style::default().fg(tag_color)),
                Span::styled(declaration_to_c(&item.declaration), text_style),
            ]);
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
