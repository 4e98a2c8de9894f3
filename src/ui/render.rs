use crate::ui::app::Menu;
use crate::ui::choices::{Choice, ChoiceKind};
use crate::ui::prompt::SelectState;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, menu: &Menu, state: &mut SelectState, theme: &Theme) {
    // Header + list + description + key hints
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, menu, theme, chunks[0]);
    render_choices(frame, menu, state, theme, chunks[1]);
    render_description(frame, menu, state, theme, chunks[2]);
    render_footer(frame, theme, chunks[3]);
}

fn render_header(frame: &mut Frame, menu: &Menu, theme: &Theme, area: Rect) {
    let header = Paragraph::new(Line::from(Span::styled(
        menu.header.clone(),
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent)),
    )
    .style(Style::default().bg(theme.bg));

    frame.render_widget(header, area);
}

fn choice_style(choice: &Choice, theme: &Theme) -> Style {
    let color = match choice.kind() {
        ChoiceKind::Directory => theme.directory,
        ChoiceKind::File => theme.file,
        ChoiceKind::Navigation => theme.navigation,
    };
    Style::default().fg(color)
}

fn render_choices(
    frame: &mut Frame,
    menu: &Menu,
    state: &mut SelectState,
    theme: &Theme,
    area: Rect,
) {
    let items: Vec<ListItem> = menu
        .choices
        .iter()
        .map(|choice| ListItem::new(choice.title.clone()).style(choice_style(choice, theme)))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", menu.message))
                .border_style(Style::default().fg(theme.accent)),
        )
        .style(Style::default().fg(theme.fg).bg(theme.bg))
        .highlight_style(
            Style::default()
                .fg(theme.bg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut state.list_state);
}

fn render_description(
    frame: &mut Frame,
    menu: &Menu,
    state: &SelectState,
    theme: &Theme,
    area: Rect,
) {
    let description = state
        .selected()
        .and_then(|i| menu.choices.get(i))
        .map(|choice| choice.description.clone())
        .unwrap_or_default();

    let paragraph = Paragraph::new(description)
        .style(Style::default().fg(theme.fg_dim).bg(theme.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.fg_dim)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, theme: &Theme, area: Rect) {
    let footer = Paragraph::new("[↑↓/jk] Navigate  [Home/End] Jump  [Enter] Select  [Esc/q] Quit")
        .style(Style::default().fg(theme.fg_dim));

    frame.render_widget(footer, area);
}
