use crate::state::State;
use ratatui::{
    layout::Alignment,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Frames cycled through by the loading spinner, one per tick.
///
pub const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Return the spinner frame for the given tick index followed by a label.
///
pub fn line<'a>(state: &State, label: &'a str) -> Line<'a> {
    let theme = state.get_theme();
    Line::from(vec![
        Span::styled(
            FRAMES[state.get_spinner_index() % FRAMES.len()],
            Style::default().fg(theme.primary.to_color()),
        ),
        Span::raw(" "),
        Span::styled(label, Style::default().fg(theme.text_secondary.to_color())),
    ])
}

/// Return a centered spinner paragraph, padded down to the middle of an area
/// of the given height.
///
pub fn widget<'a>(state: &State, label: &'a str, height: u16) -> Paragraph<'a> {
    let mut lines: Vec<Line> = (0..height.saturating_sub(2) / 2)
        .map(|_| Line::from(""))
        .collect();
    lines.push(line(state, label));
    Paragraph::new(lines).alignment(Alignment::Center)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_starts_on_first_frame() {
        let state = State::default();
        let line = line(&state, "Loading...");
        assert_eq!(line.spans[0].content, FRAMES[0]);
        assert_eq!(line.spans[2].content, "Loading...");
    }

    #[test]
    fn spinner_advances_with_ticks() {
        let mut state = State::default();
        state.advance_spinner_index();
        assert_eq!(line(&state, "").spans[0].content, FRAMES[1]);
    }
}
