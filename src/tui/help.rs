use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::state::BarState;

fn key_line(key: &'static str, pad: usize, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key, Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad)),
        Span::raw(action),
    ])
}

fn legend_line(state: BarState, label: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled("███", Style::default().fg(state.color())),
        Span::raw(" "),
        Span::raw(label),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("q", Style::default().fg(Color::Magenta)),
            Span::raw(" / "),
            Span::styled("Ctrl-C", Style::default().fg(Color::Magenta)),
            Span::raw("  Quit"),
        ]),
        key_line("space", 7, "Start / stop"),
        key_line("p", 11, "Pause/Resume"),
        key_line("1 2 3", 7, "Bubble / quick / merge sort"),
        key_line("+ / -", 7, "Faster / slower"),
        key_line("[ / ]", 7, "Fewer / more elements"),
        key_line("n", 11, "New random values"),
        key_line("s", 11, "Save last result as JSON"),
        key_line("a", 11, "Toggle auto-save"),
        key_line("tab", 9, "Switch tabs"),
        key_line("?", 11, "Show this help"),
        Line::from(""),
        Line::from("Colors:"),
        legend_line(BarState::Unsorted, "Unsorted"),
        legend_line(BarState::Comparing, "Being compared"),
        legend_line(BarState::Swapping, "Being written (swap or merge)"),
        legend_line(BarState::Sorted, "In final position"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
