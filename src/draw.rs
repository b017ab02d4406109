use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::state::match_detail::DetailPhase;
use crate::state::view_state::{Phase, ViewState};
use crate::ui::layout::LayoutAreas;
use chrono::Local;
use livescore_api::filter::{EmptyReason, FilterCriteria};
use livescore_api::{MatchDetailRecord, MatchEvent, MatchStatus, ScoreSnapshot, Side, date};
use log::error;

static TABS: &[&str; 2] = &["Soccer", "Basketball"];

const TEAM_WIDTH: usize = 22;

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);
    let view = app.view();
    let detail = app.detail_phase();

    let drawn = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app, &view);
            draw_filter_bar(f, layout.filter_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Help => draw_help(f, layout.main),
            MenuItem::Soccer | MenuItem::Basketball => draw_scores(f, layout.main, app, &view),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        if detail.is_visible() {
            draw_detail_popup(f, f.area(), &detail);
        }
    });
    if let Err(e) = drawn {
        error!("failed to draw frame: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App, view: &ViewState) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.sport() {
        livescore_api::Sport::Soccer => 0,
        livescore_api::Sport::Basketball => 1,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let spinner = if view.is_background_refreshing {
        app.state.animation.spinner()
    } else {
        " "
    };
    let today = if view.is_today { " (today)" } else { "" };
    let header = Line::from(vec![
        Span::styled(spinner, Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(
            format!("{}{today}", date::display(&view.selected_date)),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ← h  l →   Help: ? ", Style::default().fg(Color::DarkGray)),
    ]);
    let help = Paragraph::new(header)
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_filter_bar(f: &mut Frame, area: Rect, app: &App) {
    let search = &app.state.search;
    let mut spans = vec![Span::styled(" / ", Style::default().fg(Color::DarkGray))];

    if search.editing {
        spans.push(Span::styled(
            format!("{}_", search.criteria.query),
            Style::default().fg(Color::Yellow),
        ));
    } else if search.criteria.has_query() {
        spans.push(Span::raw(search.criteria.query.clone()));
    } else {
        spans.push(Span::styled("search", Style::default().fg(Color::DarkGray)));
    }

    spans.push(Span::raw("   "));
    let live_style = if search.criteria.live_only {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    spans.push(Span::styled("[v] live only", live_style));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_scores(f: &mut Frame, area: Rect, app: &App, view: &ViewState) {
    let title = format!(" {} ", view.sport.label());
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let snapshot = match &view.phase {
        Phase::Loading => {
            draw_placeholder(f, inner, &format!("Loading {}…", date::display(&view.selected_date)));
            return;
        }
        Phase::Error(reason) => {
            f.render_widget(
                Paragraph::new(format!("Could not load scores:\n{reason}\n\nPress r to retry"))
                    .style(Style::default().fg(Color::Red))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                inner,
            );
            return;
        }
        Phase::Success(snapshot) => snapshot,
    };

    let criteria = &app.state.search.criteria;
    let visible = livescore_api::filter::apply(snapshot, criteria);
    if visible.is_empty() {
        draw_placeholder(f, inner, &empty_message(criteria));
        return;
    }

    let selected = app.state.selection.clamped(visible.match_count());
    let (lines, selected_line) = score_lines(&visible, selected);

    // Keep the selected row on screen.
    let height = inner.height as usize;
    let scroll = selected_line
        .map(|line| line.saturating_sub(height.saturating_sub(1)))
        .unwrap_or(0);

    f.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), inner);
}

/// Competition headers followed by their match rows. Also returns the line
/// index of the selected row.
fn score_lines(snapshot: &ScoreSnapshot, selected: Option<usize>) -> (Vec<Line<'static>>, Option<usize>) {
    let mut lines = Vec::with_capacity(snapshot.match_count() + snapshot.competitions.len() * 2);
    let mut selected_line = None;
    let mut index = 0;

    for block in &snapshot.competitions {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        let header = if block.country.is_empty() {
            block.short_name.clone()
        } else {
            format!("{}: {}", block.country, block.short_name)
        };
        lines.push(Line::styled(header, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)));

        for event in &block.matches {
            let is_selected = selected == Some(index);
            if is_selected {
                selected_line = Some(lines.len());
            }
            lines.push(match_row(event, is_selected));
            index += 1;
        }
    }

    (lines, selected_line)
}

fn match_row(event: &MatchEvent, selected: bool) -> Line<'static> {
    let marker = if selected { ">" } else { " " };
    let badge_style = match &event.status {
        MatchStatus::Live(_) | MatchStatus::HalfTime => Style::default().fg(Color::Green),
        MatchStatus::Interrupted(_) => Style::default().fg(Color::Red),
        s if s.is_finished() => Style::default().fg(Color::DarkGray),
        _ => Style::default(),
    };
    let row_style = if selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::raw(format!("{marker} ")),
        Span::styled(format!("{:>6}", status_badge(event)), badge_style),
        Span::raw(format!(
            "  {:>width$}  {:^7}  {:<width$}",
            truncate_name(&event.home.name, TEAM_WIDTH),
            event.display_score(),
            truncate_name(&event.away.name, TEAM_WIDTH),
            width = TEAM_WIDTH,
        )),
    ];
    if let Some((home, away)) = &event.half_time {
        spans.push(Span::styled(format!(" (HT {home}-{away})"), Style::default().fg(Color::DarkGray)));
    }

    Line::from(spans).style(row_style)
}

/// Kickoff time before the start, the period or minute while running, and the
/// short result code afterwards.
pub fn status_badge(event: &MatchEvent) -> String {
    match &event.status {
        MatchStatus::NotStarted => event
            .starts_at
            .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string()),
        MatchStatus::Live(label) => minute_label(label),
        MatchStatus::HalfTime => "HT".to_string(),
        MatchStatus::FullTime => "FT".to_string(),
        MatchStatus::AfterExtraTime => "AET".to_string(),
        MatchStatus::AfterPenalties => "AP".to_string(),
        MatchStatus::Interrupted(label) => label.clone(),
    }
}

fn minute_label(label: &str) -> String {
    let is_minute = !label.is_empty() && label.chars().all(|c| c.is_ascii_digit() || c == '+');
    if is_minute {
        format!("{label}'")
    } else {
        label.to_string()
    }
}

pub fn empty_message(criteria: &FilterCriteria) -> String {
    let query = &criteria.query;
    match criteria.empty_reason() {
        EmptyReason::QueryAndLive => format!("No live matches for \"{query}\""),
        EmptyReason::LiveOnly => "No live matches right now".to_string(),
        EmptyReason::Query => format!("No matches for \"{query}\""),
        EmptyReason::Unfiltered => "No matches on this date".to_string(),
    }
}

fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_string();
    }
    let mut out: String = name.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn draw_detail_popup(f: &mut Frame, area: Rect, detail: &DetailPhase) {
    let popup = centered(area, 70, 20);
    f.render_widget(Clear, popup);

    let (title, lines) = match detail {
        DetailPhase::Hidden => return,
        DetailPhase::Loading { event_id } => (" Match ".to_string(), vec![Line::from(format!("Loading match {event_id}…"))]),
        DetailPhase::Error(reason) => (
            " Match ".to_string(),
            vec![
                Line::styled("Could not load match:", Style::default().fg(Color::Red)),
                Line::from(reason.clone()),
            ],
        ),
        DetailPhase::Success(record) => (
            format!(" {} vs {} ", record.event.home.name, record.event.away.name),
            detail_lines(record),
        ),
    };

    let block = default_border(Color::Yellow).title(title).title_bottom(" Esc to close ");
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), popup);
}

fn detail_lines(record: &MatchDetailRecord) -> Vec<Line<'static>> {
    let event = &record.event;
    let mut lines = Vec::new();

    let competition = if record.country.is_empty() {
        record.competition.clone()
    } else {
        format!("{}: {}", record.country, record.competition)
    };
    lines.push(Line::styled(competition, Style::default().fg(Color::Cyan)));
    if let Some(venue) = &record.venue {
        lines.push(Line::styled(venue.clone(), Style::default().fg(Color::DarkGray)));
    }
    lines.push(Line::default());

    let mut score = format!(
        "{:>6}  {}  {}  {}",
        status_badge(event),
        event.home.name,
        event.display_score(),
        event.away.name
    );
    if let Some((home, away)) = &event.half_time {
        score.push_str(&format!("  (HT {home}-{away})"));
    }
    lines.push(Line::styled(score, Style::default().add_modifier(Modifier::BOLD)));
    lines.push(Line::default());

    if record.incidents.is_empty() {
        lines.push(Line::styled("No incidents yet", Style::default().fg(Color::DarkGray)));
    }
    for incident in &record.incidents {
        let team = match incident.side {
            Side::Home => &event.home,
            Side::Away => &event.away,
        };
        let team = if team.abbreviation.is_empty() { &team.name } else { &team.abbreviation };
        lines.push(Line::from(format!(
            "{:>7}  {:<5}  {:<8}  {}",
            incident.minute,
            team,
            incident.kind.label(),
            incident.player
        )));
    }

    lines
}

fn centered(area: Rect, width_pct: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(width_pct)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = [
        ("1 / 2", "Soccer / Basketball"),
        ("h ←  l →", "previous / next day"),
        ("t", "jump to today"),
        ("r", "refresh now"),
        ("/", "search teams and competitions (Enter/Esc to finish)"),
        ("v", "live matches only"),
        ("Esc", "clear search and live filter"),
        ("j ↓  k ↑", "move selection"),
        ("Enter", "match details (soccer)"),
        ("\"", "toggle logs"),
        ("f", "full screen"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{key:>10}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(msg.to_string())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(logs, area);
}
