use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::analysis::{Level, Priority, RepoAnalysis};
use crate::app::{App, LOADER_MESSAGES};
use crate::state::AnalysisState;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match &app.state {
        AnalysisState::Idle => render_idle(app, frame, body_area),
        AnalysisState::Loading => render_loading(app, frame, body_area),
        AnalysisState::Success(_) => render_dashboard(app, frame, body_area),
        AnalysisState::Error(_) => render_error(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Beginner => Color::Red,
        Level::Intermediate => Color::Yellow,
        Level::Advanced => Color::Cyan,
        Level::Elite => Color::Green,
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" gitgrade ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(" model: {} ", app.backend.model()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let (mode_text, mode_style) = match app.state {
        AnalysisState::Idle => (" INPUT ", Style::default().bg(Color::Blue).fg(Color::White)),
        AnalysisState::Loading => (
            " SCANNING ",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        AnalysisState::Success(_) => (
            " REPORT ",
            Style::default().bg(Color::Green).fg(Color::Black),
        ),
        AnalysisState::Error(_) => (" ERROR ", Style::default().bg(Color::Red).fg(Color::White)),
    };

    // A notice (e.g. the export stub) replaces the key hints until the next
    // state change.
    let hints: Vec<Span> = if let Some(notice) = &app.notice {
        vec![Span::styled(
            format!(" {} ", notice),
            Style::default().bg(Color::Black).fg(Color::Yellow),
        )]
    } else {
        match app.state {
            AnalysisState::Idle => vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" analyze ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" quit ", label_style),
            ],
            AnalysisState::Loading => vec![
                Span::styled(" Esc ", key_style),
                Span::styled(" abandon ", label_style),
            ],
            AnalysisState::Success(_) => vec![
                Span::styled(" j/k ", key_style),
                Span::styled(" roadmap ", label_style),
                Span::styled(" e ", key_style),
                Span::styled(" export ", label_style),
                Span::styled(" n ", key_style),
                Span::styled(" new scan ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ],
            AnalysisState::Error(_) => vec![
                Span::styled(" r ", key_style),
                Span::styled(" retry ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ],
        }
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

/// Center a fixed-size box inside `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_idle(app: &App, frame: &mut Frame, area: Rect) {
    let box_area = centered_rect(64, 12, area);

    let [title_area, input_area, hint_area] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(box_area);

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "gitgrade",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Paste a GitHub repository URL for a professional AI audit",
            Style::default().fg(Color::Gray),
        )),
    ])
    .centered();
    frame.render_widget(title, title_area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Repository URL ");

    let input = Paragraph::new(app.url_input.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);
    frame.render_widget(input, input_area);

    frame.set_cursor_position((
        input_area.x + 1 + app.url_cursor.min(u16::MAX as usize) as u16,
        input_area.y + 1,
    ));

    let mut hint_lines = vec![Line::from(Span::styled(
        "e.g. https://github.com/facebook/react",
        Style::default().fg(Color::DarkGray),
    ))];
    if !app.backend.has_credential() {
        hint_lines.push(Line::default());
        hint_lines.push(Line::from(Span::styled(
            "No GEMINI_API_KEY configured - analysis will fail until one is set",
            Style::default().fg(Color::Red),
        )));
    }
    let hints = Paragraph::new(hint_lines).centered();
    frame.render_widget(hints, hint_area);
}

fn render_loading(app: &App, frame: &mut Frame, area: Rect) {
    let box_area = centered_rect(64, (LOADER_MESSAGES.len() + 4) as u16, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" system_analysis ");

    let mut lines: Vec<Line> = LOADER_MESSAGES
        .iter()
        .take(app.loader_step)
        .map(|msg| {
            Line::from(Span::styled(
                format!("> {}", msg),
                Style::default().fg(Color::Green),
            ))
        })
        .collect();

    // Blinking prompt cursor
    let cursor = if app.tick_count % 2 == 0 { "> █" } else { ">" };
    lines.push(Line::from(Span::styled(
        cursor,
        Style::default().fg(Color::Green),
    )));

    let log = Paragraph::new(lines).block(block);
    frame.render_widget(log, box_area);
}

fn render_error(app: &App, frame: &mut Frame, area: Rect) {
    let Some(message) = app.state.error_message() else {
        return;
    };

    let box_area = centered_rect(56, 9, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Analysis Terminated ");

    let text = Text::from(vec![
        Line::default(),
        Line::from(Span::raw(message.to_string())),
        Line::default(),
        Line::from(Span::styled(
            "Press r to retry or q to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ]);

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true })
        .centered();
    frame.render_widget(paragraph, box_area);
}

fn render_dashboard(app: &mut App, frame: &mut Frame, area: Rect) {
    let Some(analysis) = app.state.analysis() else {
        return;
    };

    let sources_height = if analysis.sources.is_empty() { 0 } else { 3 };

    let [top_area, middle_area, sources_area] = Layout::vertical([
        Constraint::Length(9),
        Constraint::Min(8),
        Constraint::Length(sources_height),
    ])
    .areas(area);

    let [score_area, summary_area, tech_area] = Layout::horizontal([
        Constraint::Length(28),
        Constraint::Min(20),
        Constraint::Length(32),
    ])
    .areas(top_area);

    render_score_card(analysis, frame, score_area);
    render_summary(analysis, frame, summary_area);
    render_tech_stack(analysis, frame, tech_area);

    let [left_area, roadmap_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .areas(middle_area);

    let metrics_height = (analysis.metrics.len() as u16 + 2).min(left_area.height);
    let [metrics_area, lists_area] =
        Layout::vertical([Constraint::Length(metrics_height), Constraint::Min(4)])
            .areas(left_area);

    render_metrics(analysis, frame, metrics_area);

    let [strengths_area, weaknesses_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(lists_area);
    render_statement_list(
        " Strengths ",
        Color::Green,
        &analysis.strengths,
        frame,
        strengths_area,
    );
    render_statement_list(
        " Improvement ",
        Color::Red,
        &analysis.weaknesses,
        frame,
        weaknesses_area,
    );

    if sources_height > 0 {
        render_sources(analysis, frame, sources_area);
    }

    // Roadmap last: it needs the mutable list state.
    let roadmap_items: Vec<ListItem> = analysis
        .roadmap
        .iter()
        .map(|step| {
            ListItem::new(Text::from(vec![
                Line::from(vec![
                    Span::styled(
                        step.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    Span::styled(
                        format!("[{}]", step.priority.as_str()),
                        Style::default().fg(priority_color(step.priority)),
                    ),
                ]),
                Line::from(Span::styled(
                    step.description.clone(),
                    Style::default().fg(Color::Gray),
                )),
                Line::default(),
            ]))
        })
        .collect();

    let roadmap_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Roadmap ({} steps) ", analysis.roadmap.len()));

    let roadmap = List::new(roadmap_items)
        .block(roadmap_block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");

    frame.render_stateful_widget(roadmap, roadmap_area, &mut app.roadmap_state);
}

fn render_score_card(analysis: &RepoAnalysis, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Score ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [text_area, gauge_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(inner);

    let score = analysis.score.clamp(0.0, 100.0);
    let text = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(
            format!("{:.0} / 100", score),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            analysis.level.as_str(),
            Style::default()
                .fg(level_color(analysis.level))
                .add_modifier(Modifier::BOLD),
        )),
    ])
    .centered();
    frame.render_widget(text, text_area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(level_color(analysis.level)))
        .ratio(score / 100.0)
        .label("");
    frame.render_widget(gauge, gauge_area);
}

fn render_summary(analysis: &RepoAnalysis, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Analysis Summary ");

    let summary = Paragraph::new(analysis.summary.as_str())
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(summary, area);
}

fn render_tech_stack(analysis: &RepoAnalysis, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Tech Stack ");

    let mut spans: Vec<Span> = Vec::new();
    for tech in &analysis.tech_stack {
        spans.push(Span::styled(
            format!(" {} ", tech),
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ));
        spans.push(Span::raw(" "));
    }

    let chips = Paragraph::new(Line::from(spans))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(chips, area);
}

fn render_metrics(analysis: &RepoAnalysis, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Metrics ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical(vec![Constraint::Length(1); analysis.metrics.len()]).split(inner);

    for (metric, row) in analysis.metrics.iter().zip(rows.iter()) {
        let [name_area, gauge_area] =
            Layout::horizontal([Constraint::Length(16), Constraint::Min(8)]).areas(*row);

        let name = Paragraph::new(metric.name.as_str()).style(Style::default().fg(Color::Gray));
        frame.render_widget(name, name_area);

        let full_mark = if metric.full_mark > 0.0 {
            metric.full_mark
        } else {
            1.0
        };
        let ratio = (metric.score / full_mark).clamp(0.0, 1.0);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(ratio)
            .label(format!("{:.0}/{:.0}", metric.score, full_mark));
        frame.render_widget(gauge, gauge_area);
    }
}

fn render_statement_list(
    title: &str,
    color: Color,
    statements: &[String],
    frame: &mut Frame,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title);

    let items: Vec<ListItem> = statements
        .iter()
        .take(3)
        .map(|s| {
            ListItem::new(Line::from(vec![
                Span::styled("• ", Style::default().fg(color)),
                Span::raw(s.as_str()),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

fn render_sources(analysis: &RepoAnalysis, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Sources ");

    let mut spans: Vec<Span> = Vec::new();
    for (idx, source) in analysis.sources.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("  •  ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            source.title.as_str(),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::styled(
            format!(" ({})", source.uri),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let sources = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(sources, area);
}
