use super::menu::error_panel;
use super::widgets::{spinner, styling};
use super::Frame;
use crate::backend::MenuItem;
use crate::state::{LoadStatus, State};
use crate::ui::Theme;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Render the full detail of a single menu item.
///
pub fn menu_detail(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style(&theme))
        .title(Span::styled(
            "Meal Details",
            styling::active_block_title_style(),
        ));

    let detail = state.get_detail();
    match (detail.status(), detail.item()) {
        (LoadStatus::Failed(message), _) => {
            frame.render_widget(error_panel(&theme, message).block(block), size);
        }
        (LoadStatus::Loaded, Some(item)) => {
            let paragraph = Paragraph::new(detail_lines(&theme, item))
                .block(block)
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, size);
        }
        _ => {
            frame.render_widget(
                spinner::widget(state, "Loading meal...", size.height).block(block),
                size,
            );
        }
    }
}

fn detail_lines<'a>(theme: &Theme, item: &MenuItem) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(
            item.category.clone().unwrap_or_default().to_uppercase(),
            styling::secondary_text_style(theme),
        )),
        Line::from(Span::styled(
            item.name.clone(),
            styling::normal_text_style(theme).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            item.formatted_price(),
            styling::accent_text_style(theme),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Prep time: ", styling::muted_text_style(theme)),
            Span::styled(
                format!("{} mins", item.preparation_time),
                styling::normal_text_style(theme),
            ),
            Span::raw("    "),
            Span::styled("Calories: ", styling::muted_text_style(theme)),
            Span::styled(
                format!("{} cal", item.calories),
                styling::normal_text_style(theme),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled("Description", styling::active_block_title_style())),
        Line::from(Span::styled(
            item.description.clone(),
            styling::normal_text_style(theme),
        )),
        Line::from(""),
        Line::from(Span::styled("Ingredients", styling::active_block_title_style())),
    ];
    lines.extend(item.ingredients.iter().map(|ingredient| {
        Line::from(Span::styled(
            format!("  • {}", ingredient),
            styling::normal_text_style(theme),
        ))
    }));
    if let Some(url) = &item.image_url {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Image: ", styling::muted_text_style(theme)),
            Span::styled(url.clone(), styling::secondary_text_style(theme)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "s: share, Esc: back",
        styling::muted_text_style(theme),
    )));
    lines
}
