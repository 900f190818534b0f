use crate::app::App;
use crate::ui::viewport::{self, Row};
use crate::ui::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let inner_area = if app.show_border {
        let title = Line::from(vec![Span::styled(
            " Lyrics ",
            Style::default()
                .fg(theme.current)
                .add_modifier(Modifier::BOLD),
        )]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(title)
            .title_alignment(Alignment::Left)
            .border_style(Style::default().fg(theme.before))
            .style(Style::default().bg(Color::Reset));
        let inner = block.inner(area);
        f.render_widget(block, area);
        inner
    } else {
        area
    };

    // One snapshot per frame keeps document and index in step
    let snapshot = app.session.snapshot();
    let rows = viewport::compose(
        &snapshot.document,
        snapshot.active,
        inner_area.width,
        inner_area.height,
    );
    if rows.is_empty() {
        return;
    }

    let lyrics_widget = Paragraph::new(styled_lines(&rows, theme))
        .alignment(Alignment::Center)
        .block(Block::default().style(Style::default().bg(Color::Reset)));

    f.render_widget(lyrics_widget, inner_area);
}

fn styled_lines<'a>(rows: &'a [Row], theme: &Theme) -> Vec<Line<'a>> {
    rows.iter()
        .map(|row| Line::from(Span::styled(row.text.as_str(), theme.style_for(row.style))))
        .collect()
}
