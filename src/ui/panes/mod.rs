//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source code with syntax highlighting and the selected declaration marked
//! - [`declarations`]: Every file-scope declaration, one line each, with the selection
//! - [`details`]: Specifier, declarators and English explanations for the selection
//! - [`diagnostics`]: Parse errors the parser recovered from
//! - [`status`]: Status bar with selection position, error count and keybindings
//!
//! Each pane module exports a primary `render_*` function. Scroll offsets are
//! owned by [`App`](crate::ui::App) and clamped here during rendering.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

pub mod declarations;
pub mod details;
pub mod diagnostics;
pub mod source;
pub mod status;

pub use declarations::render_declarations_pane;
pub use details::render_details_pane;
pub use diagnostics::render_diagnostics_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};

/// Border style shared by every bordered pane
fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp `offset` so the last page of `total_items` fills the pane
fn clamp_scroll(offset: &mut usize, total_items: usize, visible_height: usize) {
    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *offset = (*offset).min(max_scroll);
    } else {
        *offset = 0;
    }
}

/// Rows available inside a bordered pane, at least one
fn visible_height(area: ratatui::layout::Rect) -> usize {
    area.height.saturating_sub(2).max(1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_scroll() {
        let mut offset = 50;
        clamp_scroll(&mut offset, 20, 5);
        assert_eq!(offset, 15);

        let mut offset = 3;
        clamp_scroll(&mut offset, 4, 10);
        assert_eq!(offset, 0);

        let mut offset = usize::MAX;
        clamp_scroll(&mut offset, 12, 2);
        assert_eq!(offset, 10);
    }
}
