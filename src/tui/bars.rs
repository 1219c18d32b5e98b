use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::state::BarState;
use crate::model::Value;

/// Partial block glyphs, one per eighth of a cell.
const EIGHTHS: [char; 8] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇'];

/// Horizontal layout of the bars inside `width` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    /// Number of bars drawn (less than the sequence length when it does not fit).
    pub columns: usize,
    pub bar_width: usize,
    pub gap: usize,
}

pub fn layout_for(len: usize, width: usize) -> BarLayout {
    if len == 0 || width == 0 {
        return BarLayout {
            columns: 0,
            bar_width: 0,
            gap: 0,
        };
    }
    if len > width {
        return BarLayout {
            columns: width,
            bar_width: 1,
            gap: 0,
        };
    }
    let slot = width / len;
    let gap = usize::from(slot >= 3);
    BarLayout {
        columns: len,
        bar_width: slot - gap,
        gap,
    }
}

/// Index of the element shown in `column` when `len` elements share `columns` columns.
pub fn element_for_column(column: usize, columns: usize, len: usize) -> usize {
    if columns == 0 {
        return 0;
    }
    (column * len / columns).min(len.saturating_sub(1))
}

/// Glyph for one cell of a bar whose height is `eighths` (in eighths of a row),
/// at `level` rows above the baseline (1 = bottom row).
pub fn cell_glyph(eighths: usize, level: usize) -> char {
    let below = (level - 1) * 8;
    if eighths >= level * 8 {
        '█'
    } else if eighths > below {
        EIGHTHS[eighths - below]
    } else {
        ' '
    }
}

/// Render the sequence as vertical bars colored by element state.
pub fn render_bars(
    f: &mut Frame,
    area: Rect,
    values: &[Value],
    states: &[BarState],
    max_value: Value,
    title: Line,
) {
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if values.is_empty() {
        let p = Paragraph::new("No data").alignment(Alignment::Center);
        f.render_widget(p, inner);
        return;
    }

    let width = inner.width as usize;
    let height = inner.height as usize;
    let layout = layout_for(values.len(), width);
    // Scale against the tallest value so a custom --values list still fills the area.
    let scale_max = values.iter().copied().max().unwrap_or(0).max(max_value).max(1) as usize;

    let heights: Vec<(usize, BarState)> = (0..layout.columns)
        .map(|c| {
            let idx = element_for_column(c, layout.columns, values.len());
            let eighths = (values[idx] as usize * height * 8).div_ceil(scale_max);
            let state = states.get(idx).copied().unwrap_or(BarState::Unsorted);
            (eighths, state)
        })
        .collect();

    let lines: Vec<Line> = (0..height)
        .map(|row| {
            let level = height - row;
            let mut spans = Vec::with_capacity(layout.columns * 2);
            for &(eighths, state) in &heights {
                let glyph = cell_glyph(eighths, level);
                let cell: String = std::iter::repeat(glyph).take(layout.bar_width).collect();
                spans.push(Span::styled(cell, Style::default().fg(state.color())));
                if layout.gap > 0 {
                    spans.push(Span::raw(" ".repeat(layout.gap)));
                }
            }
            Line::from(spans)
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}
