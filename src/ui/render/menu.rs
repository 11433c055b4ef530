use super::widgets::{spinner, styling};
use super::Frame;
use crate::backend::Category;
use crate::state::{LoadStatus, State};
use crate::ui::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
};

/// Render the category picker above the menu item list.
///
pub fn menu(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(size);

    let selected = state.get_menu().category();
    let tabs = Tabs::new(Category::ALL.iter().map(|c| c.label()).collect::<Vec<_>>())
        .select(
            Category::ALL
                .iter()
                .position(|c| *c == selected)
                .unwrap_or(0),
        )
        .style(styling::secondary_text_style(&theme))
        .highlight_style(styling::accent_text_style(&theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::normal_block_border_style(&theme))
                .title("Category (h/l)"),
        );
    frame.render_widget(tabs, chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style(&theme))
        .title(Span::styled("Menu", styling::active_block_title_style()));
    let list_area = chunks[1];

    match state.get_menu().status().clone() {
        LoadStatus::Loading | LoadStatus::Idle => {
            frame.render_widget(
                spinner::widget(state, "Loading menu...", list_area.height).block(block),
                list_area,
            );
        }
        LoadStatus::Failed(message) => {
            frame.render_widget(error_panel(&theme, &message).block(block), list_area);
        }
        LoadStatus::Loaded if state.get_menu().items().is_empty() => {
            let empty = Paragraph::new(Span::styled(
                "No meals found",
                styling::muted_text_style(&theme),
            ))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(empty, list_area);
        }
        LoadStatus::Loaded => {
            let items: Vec<ListItem> = state
                .get_menu()
                .items()
                .iter()
                .map(|item| {
                    ListItem::new(vec![
                        Line::from(vec![
                            Span::styled(item.name.clone(), styling::normal_text_style(&theme)),
                            Span::raw("  "),
                            Span::styled(item.formatted_price(), styling::accent_text_style(&theme)),
                        ]),
                        Line::from(Span::styled(
                            format!(
                                "  {} · {} mins · {} cal",
                                item.category.as_deref().unwrap_or("Uncategorized"),
                                item.preparation_time,
                                item.calories
                            ),
                            styling::muted_text_style(&theme),
                        )),
                    ])
                })
                .collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(styling::current_list_item_style(&theme))
                .highlight_symbol("> ");
            frame.render_stateful_widget(list, list_area, state.menu().list_state());
        }
    }
}

/// Return the inline error panel with its retry hint.
///
pub fn error_panel<'a>(theme: &Theme, message: &str) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            styling::error_text_style(theme),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to retry",
            styling::muted_text_style(theme),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
}
