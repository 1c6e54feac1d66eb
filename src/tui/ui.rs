use super::{Focus, TuiState};
use crate::session::{Phase, Preview, Session};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, List, ListItem, Paragraph, Wrap};

pub(super) fn draw(frame: &mut Frame, session: &Session, tui: &mut TuiState) {
    let [search_area, main_area, output_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());
    let [list_area, preview_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .areas(main_area);

    draw_input(
        frame,
        search_area,
        " Search templates ",
        session.filter(),
        tui.focus == Focus::Search,
    );
    draw_list(frame, list_area, session, tui);
    draw_preview(frame, preview_area, session);
    draw_input(
        frame,
        output_area,
        " Output directory ",
        session.output_dir(),
        tui.focus == Focus::Output,
    );
    draw_footer(frame, footer_area, session);
}

fn block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::new().fg(Color::Yellow)
    } else {
        Style::new().fg(Color::DarkGray)
    };
    Block::bordered().title(title).border_style(border)
}

fn draw_input(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    frame.render_widget(Paragraph::new(value).block(block(title, focused)), area);
    if focused {
        let width = u16::try_from(value.chars().count()).unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(width)
            .min(area.right().saturating_sub(2));
        frame.set_cursor_position(Position::new(x, area.y + 1));
    }
}

fn draw_list(frame: &mut Frame, area: Rect, session: &Session, tui: &mut TuiState) {
    let items: Vec<ListItem> = session
        .visible()
        .iter()
        .map(|name| {
            if session.is_selected(name) {
                ListItem::new(Line::from(vec![
                    Span::styled("[x] ", Style::new().fg(Color::Green)),
                    Span::raw(name.as_str()),
                ]))
            } else {
                ListItem::new(format!("[ ] {name}"))
            }
        })
        .collect();

    let title = if session.phase() == Phase::LoadingCatalog {
        " Templates (loading...) ".to_string()
    } else {
        format!(
            " Templates {}/{} ",
            session.visible().len(),
            session.catalog().len()
        )
    };

    let list = List::new(items)
        .block(block(&title, tui.focus == Focus::List))
        .highlight_style(Style::new().add_modifier(Modifier::REVERSED));

    tui.list.select(session.highlighted());
    frame.render_stateful_widget(list, area, &mut tui.list);
}

fn draw_preview(frame: &mut Frame, area: Rect, session: &Session) {
    let text = match session.preview() {
        Preview::Hint => Text::from("Select a template and press Enter to preview").dark_gray(),
        Preview::Loading => Text::from("Loading preview...").italic(),
        Preview::Content(content) => Text::raw(content.as_str()),
        Preview::Message(message) => Text::raw(message.as_str()).green(),
        Preview::Error(message) => Text::raw(message.as_str()).red(),
    };
    let paragraph = Paragraph::new(text)
        .block(block(" Preview ", false))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, session: &Session) {
    let selected = session
        .selected()
        .iter()
        .map(|n| n.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let state = match session.phase() {
        Phase::LoadingCatalog => "loading",
        Phase::Browsing => "ready",
        Phase::Previewing => "fetching",
        Phase::Generating => "writing",
        Phase::Done => "done",
    };
    let line = Line::from(vec![
        Span::styled(format!(" {state} "), Style::new().add_modifier(Modifier::REVERSED)),
        Span::raw(format!(" [{selected}] ")),
        Span::raw(
            "Tab focus | Space toggle | Enter preview | p preview selection | Ctrl+G generate | Esc quit",
        )
        .dark_gray(),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
