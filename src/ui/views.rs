// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Frame rendering for the ranked list and detail views.

use chrono::{DateTime, Local, Utc};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use crate::app::{App, Mode};
use crate::flight::Flight;

pub(super) fn draw(frame: &mut Frame, app: &App, notice: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);

    if app.mode() == Mode::Detail {
        render_detail(frame, chunks[1], app);
    } else {
        render_list(frame, chunks[1], app);
    }

    render_footer(frame, chunks[2], notice);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let config = app.config();
    let view = app.view();

    let line_top = Line::from(vec![
        Span::styled(
            "NEARFLIGHTS",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("IN RANGE {}", app.in_range()),
            Style::default().fg(Color::Green),
        ),
        Span::raw(format!(" | SHOWING {}/{}", view.len(), config.top_n)),
        Span::raw(format!(" | RADIUS {:.0} mi", config.radius_miles)),
        Span::raw(format!(" | EVERY {}s", config.refresh_interval.as_secs())),
    ]);

    let coords = format!(
        "{:.4}, {:.4}",
        config.origin.latitude, config.origin.longitude
    );
    let last = app
        .last_refresh()
        .map(format_local_time)
        .unwrap_or_else(|| "--".to_string());

    let mut bottom_spans = vec![
        Span::styled("ORIGIN ", Style::default().fg(Color::DarkGray)),
        Span::raw(config.origin_label.clone()),
    ];
    // Skip the coordinates when the label already is them.
    if config.origin_label != coords {
        bottom_spans.push(Span::styled(" at ", Style::default().fg(Color::DarkGray)));
        bottom_spans.push(Span::raw(coords));
    }
    bottom_spans.push(Span::raw(" | "));
    bottom_spans.push(Span::styled("LAST ", Style::default().fg(Color::DarkGray)));
    bottom_spans.push(Span::raw(last));
    if app.mode() == Mode::Refreshing {
        bottom_spans.push(Span::raw(" | "));
        bottom_spans.push(Span::styled(
            "FETCHING",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(id) = view.followed() {
        let label = view
            .flights()
            .iter()
            .find(|f| f.icao24 == id)
            .map_or(id, |f| f.label());
        bottom_spans.push(Span::raw(" | "));
        bottom_spans.push(Span::styled(
            format!("FOLLOWING {label}"),
            Style::default().fg(Color::Yellow),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title("SESSION");
    let paragraph = Paragraph::new(vec![line_top, Line::from(bottom_spans)]).block(block);
    frame.render_widget(paragraph, area);
}

fn render_list(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .title("CLOSEST FLIGHTS");

    let view = app.view();
    if view.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No aircraft in range.",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(
        ["#", "CALLSIGN", "AIRLINE", "COUNTRY", "DIST MI", "BRG", "ALT FT", "SPD KT", "MIL"]
            .into_iter()
            .map(|label| Cell::from(label).style(header_style)),
    )
    .height(1);

    let followed = view.followed();
    let rows = view.flights().iter().enumerate().map(|(i, flight)| {
        let mut style = Style::default();
        if flight.is_military() {
            style = style.fg(Color::Red);
        }
        if followed == Some(flight.icao24.as_str()) {
            style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
        }

        Row::new(vec![
            Cell::from(format!("{:>2}", i + 1)),
            Cell::from(flight.label().to_string()),
            Cell::from(truncate(flight.operator.name().unwrap_or("--"), 20)),
            Cell::from(truncate(&flight.origin_country, 16)),
            Cell::from(fmt_distance(flight.distance_miles)),
            Cell::from(fmt_bearing(flight.bearing_degrees)),
            Cell::from(fmt_altitude(flight.altitude_ft)),
            Cell::from(fmt_speed(flight.ground_speed_kt)),
            Cell::from(if flight.is_military() { " * " } else { "" }),
        ])
        .style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Length(20),
            Constraint::Length(16),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(3),
        ],
    )
    .header(header)
    .block(block)
    .column_spacing(1)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD));

    let mut state = TableState::default().with_selected(Some(view.cursor()));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_detail(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title("DETAILS");

    let lines = if let Some(flight) = app.view().selected() {
        detail_lines(flight, app.view().followed() == Some(flight.icao24.as_str()))
    } else {
        vec![Line::from("No flight selected.")]
    };

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn detail_lines(flight: &Flight, following: bool) -> Vec<Line<'static>> {
    let position = format!(
        "{:.4}, {:.4}",
        flight.position.latitude, flight.position.longitude
    );
    let last_seen = flight
        .last_contact
        .map(format_local_time)
        .unwrap_or_else(|| "--".to_string());

    let mut lines = vec![
        Line::from(vec![
            Span::styled("CALLSIGN  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                flight.label().to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        detail_line("AIRLINE", flight.operator.name().unwrap_or("--").to_string()),
        detail_line("MILITARY", yes_no(flight.is_military())),
        detail_line("COUNTRY", flight.origin_country.clone()),
        detail_line("ICAO24", flight.icao24.clone()),
        Line::from(""),
        detail_line("DISTANCE", format!("{:.1} mi", flight.distance_miles)),
        detail_line(
            "BEARING",
            match flight.bearing_degrees {
                Some(b) => format!("{} {:.0}°", compass_point(b), b),
                None => "directly overhead".to_string(),
            },
        ),
        detail_line("POSITION", position),
        detail_line(
            "ALTITUDE",
            match flight.altitude_ft {
                Some(ft) => format!("{ft} ft"),
                None => "--".to_string(),
            },
        ),
        detail_line(
            "SPEED",
            match flight.ground_speed_kt {
                Some(kt) => format!("{kt:.0} kt"),
                None => "--".to_string(),
            },
        ),
        detail_line(
            "V/S",
            match flight.vertical_rate_ftmin {
                Some(rate) => format!("{rate:+} ft/min"),
                None => "--".to_string(),
            },
        ),
        detail_line(
            "TRACK",
            match flight.track_degrees {
                Some(track) => format!("{track:.0}°"),
                None => "--".to_string(),
            },
        ),
        Line::from(""),
        detail_line(
            "SQUAWK",
            flight.squawk.clone().unwrap_or_else(|| "--".to_string()),
        ),
        detail_line("ON GROUND", yes_no(flight.on_ground)),
        detail_line("LAST SEEN", last_seen),
        detail_line("FOLLOWING", yes_no(following)),
    ];

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "press any key to return",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

fn detail_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label:<10}"),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(value),
    ])
}

fn render_footer(frame: &mut Frame, area: Rect, notice: Option<&str>) {
    let line = match notice {
        Some(text) => Line::from(Span::styled(
            text.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            "↑/↓ navigate  enter details  f follow  r refresh  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn fmt_distance(miles: f64) -> String {
    format!("{miles:>7.1}")
}

fn fmt_bearing(bearing: Option<f64>) -> String {
    match bearing {
        Some(b) => format!("{:>3} {:>3.0}", compass_point(b), b),
        None => "   OVHD ".to_string(),
    }
}

fn fmt_altitude(altitude: Option<i32>) -> String {
    match altitude {
        Some(ft) => format!("{ft:>6}"),
        None => format!("{:>6}", "--"),
    }
}

fn fmt_speed(speed: Option<f64>) -> String {
    match speed {
        Some(kt) => format!("{kt:>5.0}"),
        None => format!("{:>5}", "--"),
    }
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

fn compass_point(degrees: f64) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let sector = ((degrees / 22.5) + 0.5).floor() as usize % 16;
    POINTS[sector]
}

fn format_local_time(time: DateTime<Utc>) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%H:%M:%S").to_string()
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let cut: String = value.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
