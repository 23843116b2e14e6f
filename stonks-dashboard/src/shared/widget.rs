//! Ratatui rendering for every surface
//!
//! Rendering is a pure projection of surface state; nothing here mutates it.

use std::collections::VecDeque;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table,
        canvas::{self, Canvas},
    },
};

use crate::shared::format::{self, Formatted, Sign};
use crate::shared::surfaces::{
    CandlestickSeries, CompositionSurface, FeedSurface, ForexSurface, HeaderSurface,
    IndicesSurface, PlotSurface, PositionsSurface, StatusSurface, SummarySurface, Surfaces,
};
use crate::shared::types::DEFAULT_CURRENCY;
use crate::shared::websocket::ConnectionStatus;

const C_UP: Color = Color::Rgb(100, 220, 100);
const C_DOWN: Color = Color::Rgb(220, 100, 100);
const C_DIM: Color = Color::Rgb(120, 120, 120);
const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
const C_ACCENT: Color = Color::Rgb(100, 180, 220);
const C_LINE: Color = Color::Rgb(126, 151, 36);
const C_CANDLE_UP: Color = Color::Rgb(8, 104, 20);
const C_CANDLE_DOWN: Color = Color::Rgb(136, 7, 7);
const C_ORANGE: Color = Color::Rgb(255, 165, 0);

/// Fixed colour per connection status
pub fn status_color(status: ConnectionStatus) -> Color {
    match status {
        ConnectionStatus::Connected => Color::Green,
        ConnectionStatus::Reconnecting => C_ORANGE,
        ConnectionStatus::Disconnected => Color::Red,
    }
}

pub fn sign_color(sign: Sign) -> Color {
    match sign {
        Sign::NonNegative => C_UP,
        Sign::Negative => C_DOWN,
    }
}

/// Render the whole dashboard
pub fn render_dashboard(f: &mut Frame, surfaces: &Surfaces) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(16),
            Constraint::Length(14),
        ])
        .split(f.area());

    render_header(f, rows[0], &surfaces.header);
    render_summary(f, rows[1], &surfaces.summary);
    render_positions(f, rows[2], &surfaces.positions);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(24),
            Constraint::Percentage(22),
            Constraint::Percentage(16),
            Constraint::Percentage(16),
            Constraint::Percentage(22),
        ])
        .split(rows[3]);

    render_feed(f, panels[0], &surfaces.feed);
    render_indices(f, panels[1], &surfaces.indices);
    render_forex(f, panels[2], &surfaces.forex);
    render_composition(f, panels[3], &surfaces.composition);
    render_status(f, panels[4], &surfaces.status);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(rows[4]);

    render_plot(f, charts[0], &surfaces.plot);
    render_candles(f, charts[1], " HOURLY ", surfaces.plot.candles());
    render_candles(f, charts[2], " DAILY CLOSE ", surfaces.daily_close.series());
}

pub fn render_header(f: &mut Frame, area: Rect, header: &HeaderSurface) {
    let status = header.status();
    let updated = header
        .last_update()
        .map(|t| format::clock(&t))
        .unwrap_or_else(|| "--:--:--".to_string());

    let line = Line::from(vec![
        Span::styled("Stonks is ", Style::default().fg(C_DIM)),
        Span::styled(
            status.as_str(),
            Style::default()
                .fg(status_color(status))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   Updated ", Style::default().fg(C_DIM)),
        Span::styled(updated, Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD)),
    ]);

    f.render_widget(Paragraph::new(line), area);
}

pub fn render_summary(f: &mut Frame, area: Rect, summary: &SummarySurface) {
    let totals = summary.totals();
    let plates = [
        ("Market Value", format::signed(totals.market_value, Some(DEFAULT_CURRENCY)), false),
        ("Net Return", format::signed(totals.net_return_percent, Some("%")), true),
        ("Unrealized", format::signed(totals.net_return, Some(DEFAULT_CURRENCY)), true),
        (
            "Unrealized After Tax",
            format::signed(summary.net_return_after_tax(), Some(DEFAULT_CURRENCY)),
            true,
        ),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((title, value, colorize), column) in plates.into_iter().zip(columns.iter()) {
        let value_color = if colorize { sign_color(value.sign) } else { C_BRIGHT };
        let lines = vec![
            Line::from(vec![
                Span::styled(
                    value.text.clone(),
                    Style::default().fg(value_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {}", value.unit.as_deref().unwrap_or_default()),
                    Style::default().fg(C_DIM),
                ),
            ]),
            Line::from(Span::styled(title, Style::default().fg(C_DIM))),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(C_DIM));
        f.render_widget(Paragraph::new(lines).block(block), *column);
    }
}

pub fn render_positions(f: &mut Frame, area: Rect, positions: &PositionsSurface) {
    let header = Row::new(vec![
        "Name",
        "Position",
        "Market Price",
        "Market Value",
        "Net Return",
        "Unrealized",
        "Asset",
        "Allocation",
    ])
    .style(Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD));

    let rows = positions.sorted().into_iter().map(|p| {
        Row::new(vec![
            Cell::from(p.name.clone()),
            Cell::from(p.volume.to_string()),
            Cell::from(format!("{} {}", p.market_price, p.currency)),
            Cell::from(format!("{} {}", p.market_value, DEFAULT_CURRENCY)),
            colored_cell(&format::signed(p.net_return_percent, Some("%"))),
            colored_cell(&format::signed(p.net_return, Some(DEFAULT_CURRENCY))),
            Cell::from(p.asset.clone()),
            Cell::from(format!("{} %", p.allocation)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(20),
            Constraint::Percentage(9),
            Constraint::Percentage(12),
            Constraint::Percentage(13),
            Constraint::Percentage(10),
            Constraint::Percentage(13),
            Constraint::Percentage(14),
            Constraint::Percentage(9),
        ],
    )
    .header(header)
    .block(panel(" POSITIONS "));

    f.render_widget(table, area);
}

pub fn render_feed(f: &mut Frame, area: Rect, feed: &FeedSurface) {
    let rows = feed.entries().map(|entry| {
        Row::new(vec![
            Cell::from(entry.time_label()),
            Cell::from(entry.ticker.name.clone()),
            Cell::from(format!("{} {}", entry.ticker.market_price, entry.ticker.unit())),
        ])
    });

    let table = Table::new(
        rows,
        [Constraint::Length(8), Constraint::Fill(1), Constraint::Fill(1)],
    )
    .header(table_header(["Time", "Name", "Market Price"]))
    .block(panel(" FEED "));

    f.render_widget(table, area);
}

pub fn render_indices(f: &mut Frame, area: Rect, indices: &IndicesSurface) {
    let rows = indices.rows().map(|(_, quote)| {
        Row::new(vec![
            Cell::from(quote.name.clone()),
            Cell::from(format::fixed(quote.last, 2)),
            colored_cell(&format::signed(quote.change, Some("%"))),
            colored_cell(&format::signed(quote.change_7d, Some("%"))),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Fill(1),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(table_header(["Name", "Last", "1D", "7D"]))
    .block(panel(" INDICES "));

    f.render_widget(table, area);
}

pub fn render_forex(f: &mut Frame, area: Rect, forex: &ForexSurface) {
    let rows = forex.rows().map(|(_, quote)| {
        Row::new(vec![
            Cell::from(quote.name.clone()),
            Cell::from(format!("{} {}", quote.market_price, DEFAULT_CURRENCY)),
        ])
    });

    let table = Table::new(rows, [Constraint::Percentage(40), Constraint::Percentage(60)])
        .header(table_header(["Name", "Market Price"]))
        .block(panel(" FOREX "));

    f.render_widget(table, area);
}

pub fn render_composition(f: &mut Frame, area: Rect, composition: &CompositionSurface) {
    let rows = composition.rows().map(|(asset, allocation)| {
        Row::new(vec![
            Cell::from(asset.clone()),
            Cell::from(format!("{} %", allocation)),
        ])
    });

    let table = Table::new(rows, [Constraint::Percentage(60), Constraint::Percentage(40)])
        .header(table_header(["Asset", "Allocation"]))
        .block(panel(" COMPOSITION "));

    f.render_widget(table, area);
}

pub fn render_status(f: &mut Frame, area: Rect, status: &StatusSurface) {
    let rows = status.rows().map(|(collector, entry)| {
        Row::new(vec![
            Cell::from(collector.clone()),
            Cell::from(format::counter(entry.messages)),
            Cell::from(format::counter(entry.errors)),
            Cell::from(format::counter(entry.restarts)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(table_header(["Collector", "Messages", "Errors", "Restarts"]))
    .block(panel(" STATUS "));

    f.render_widget(table, area);
}

/// Market value line chart
pub fn render_plot(f: &mut Frame, area: Rect, plot: &PlotSurface) {
    let points = line_points(plot.line());
    let block = panel(" MARKET VALUE ");

    if points.is_empty() {
        f.render_widget(placeholder("Waiting for market value...").block(block), area);
        return;
    }

    let dataset = Dataset::default()
        .name("Market Value")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(C_LINE))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(Axis::default().bounds([0.0, (points.len().max(2) - 1) as f64]))
        .y_axis(Axis::default().bounds(value_bounds(plot.line().iter().copied())));

    f.render_widget(chart, area);
}

/// OHLC candles, evenly spaced by index
pub fn render_candles(f: &mut Frame, area: Rect, title: &str, series: &CandlestickSeries) {
    let block = panel(title);

    if series.is_empty() {
        f.render_widget(placeholder("No data").block(block), area);
        return;
    }

    let points = series.points();
    let y_bounds = value_bounds(points.iter().flat_map(|p| [p.low, p.high]));

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([-1.0, points.len() as f64])
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            for (index, point) in points.iter().enumerate() {
                let x = index as f64;
                let color = if point.is_upward() { C_CANDLE_UP } else { C_CANDLE_DOWN };

                ctx.draw(&canvas::Line::new(x, point.low, x, point.high, color));
                for offset in [-0.25, 0.0, 0.25] {
                    ctx.draw(&canvas::Line::new(
                        x + offset,
                        point.open,
                        x + offset,
                        point.close,
                        color,
                    ));
                }
            }
        });

    f.render_widget(canvas, area);
}

/// `(index, value)` pairs for the line chart
pub fn line_points(line: &VecDeque<f64>) -> Vec<(f64, f64)> {
    line.iter()
        .enumerate()
        .map(|(index, value)| (index as f64, *value))
        .collect()
}

/// Padded `[min, max]` of the values; `[0, 1]` when there are none
pub fn value_bounds<I>(values: I) -> [f64; 2]
where
    I: IntoIterator<Item = f64>,
{
    let (min, max) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        });

    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    if min == max {
        return [min - 1.0, max + 1.0];
    }

    let pad = (max - min) * 0.05;
    [min - pad, max + pad]
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM))
}

fn table_header<const N: usize>(titles: [&'static str; N]) -> Row<'static> {
    Row::new(titles).style(Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD))
}

fn colored_cell(value: &Formatted) -> Cell<'static> {
    Cell::from(Span::styled(
        value.with_unit(),
        Style::default().fg(sign_color(value.sign)),
    ))
}

fn placeholder(text: &'static str) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(text, Style::default().fg(C_DIM))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::router::EventRouter;
    use chrono::{Local, TimeZone};
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    fn buffer_lines(buffer: &Buffer) -> Vec<String> {
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    fn draw<F>(width: u16, height: u16, render: F) -> Vec<String>
    where
        F: FnOnce(&mut Frame),
    {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(render).unwrap();
        buffer_lines(terminal.backend().buffer())
    }

    fn populated() -> Surfaces {
        let mut router = EventRouter::new();
        let mut surfaces = Surfaces::default();
        let now = Local.with_ymd_and_hms(2024, 3, 1, 14, 3, 9).single().unwrap();
        let frames = [
            r#"{"type":"portfolio","data":{"market_value":1000,"net_return":-50,"net_return_percent":-4.76,
                "positions":[
                  {"name":"Tesla","volume":1,"market_price":700,"currency":"USD","market_value":600,"net_return":-30,
                   "net_return_percent":-4.7,"asset":"Equity","allocation":60},
                  {"name":"Apple","volume":2,"market_price":150,"currency":"USD","market_value":400,"net_return":-20,
                   "net_return_percent":-4.8,"asset":"Equity","allocation":40}],
                "composition":{"Equity":100.0},
                "exchange_rates":{"USD":{"name":"USD","market_price":8.5}},
                "indices":{"OSEBX":{"name":"OSEBX","last":1234.567,"change":-0.4,"change_7d":1.2}}}}"#,
            r#"{"type":"ticker","data":{"name":"ACME","market_price":12.5,"currency":"USD"}}"#,
            r#"{"type":"chart","data":[{"time":1700000000,"open":1,"high":2,"low":0.5,"close":1.5},
                {"time":1700003600,"open":1.5,"high":2.5,"low":1.0,"close":1.2}]}"#,
            r#"{"type":"close","data":[{"date":"2024-02-29","open":1,"high":2,"low":0.5,"close":1.5}]}"#,
            r#"{"type":"status","data":{"Yahoo":{"messages":1500,"errors":3,"restarts":0}}}"#,
        ];
        for frame in frames {
            router.dispatch_at(frame, &mut surfaces, now).unwrap();
        }
        surfaces.header.set_connection_status(ConnectionStatus::Connected);
        surfaces
    }

    #[test]
    fn test_status_color_mapping() {
        assert_eq!(status_color(ConnectionStatus::Connected), Color::Green);
        assert_eq!(status_color(ConnectionStatus::Reconnecting), C_ORANGE);
        assert_eq!(status_color(ConnectionStatus::Disconnected), Color::Red);
    }

    #[test]
    fn test_header_shows_status_and_time() {
        let surfaces = populated();
        let lines = draw(60, 1, |f| render_header(f, f.area(), &surfaces.header));

        assert!(lines[0].contains("Stonks is connected"));
        assert!(lines[0].contains("Updated 14:03:09"));
    }

    #[test]
    fn test_header_before_first_event() {
        let header = HeaderSurface::default();
        let lines = draw(60, 1, |f| render_header(f, f.area(), &header));

        assert!(lines[0].contains("disconnected"));
        assert!(lines[0].contains("--:--:--"));
    }

    #[test]
    fn test_feed_first_row() {
        let surfaces = populated();
        let lines = draw(60, 6, |f| render_feed(f, f.area(), &surfaces.feed));

        // border, header, first row
        assert!(lines[2].contains("14:03:09"));
        assert!(lines[2].contains("ACME"));
        assert!(lines[2].contains("12.5 USD"));
    }

    #[test]
    fn test_positions_render_sorted() {
        let surfaces = populated();
        let lines = draw(140, 6, |f| render_positions(f, f.area(), &surfaces.positions));

        let apple = lines.iter().position(|l| l.contains("Apple")).unwrap();
        let tesla = lines.iter().position(|l| l.contains("Tesla")).unwrap();
        assert!(apple < tesla);
    }

    #[test]
    fn test_status_counters_use_k_suffix() {
        let surfaces = populated();
        let lines = draw(60, 4, |f| render_status(f, f.area(), &surfaces.status));

        assert!(lines[2].contains("Yahoo"));
        assert!(lines[2].contains("1.5K"));
    }

    #[test]
    fn test_summary_after_tax() {
        let surfaces = populated();
        let lines = draw(120, 4, |f| render_summary(f, f.area(), &surfaces.summary));

        // -50 + 50 * 0.3168 = -34.16
        assert!(lines[1].contains("-34 NOK"));
        assert!(lines[2].contains("Unrealized After Tax"));
    }

    #[test]
    fn test_full_dashboard_renders() {
        let surfaces = populated();
        let lines = draw(160, 50, |f| render_dashboard(f, &surfaces));
        let text = lines.join("\n");

        for title in [
            "POSITIONS",
            "FEED",
            "INDICES",
            "FOREX",
            "COMPOSITION",
            "STATUS",
            "MARKET VALUE",
            "HOURLY",
            "DAILY CLOSE",
        ] {
            assert!(text.contains(title), "missing panel {title}");
        }
        assert!(text.contains("1234.57"));
    }

    #[test]
    fn test_empty_dashboard_renders() {
        let surfaces = Surfaces::default();
        let lines = draw(100, 40, |f| render_dashboard(f, &surfaces));

        assert!(lines.join("\n").contains("No data"));
    }

    #[test]
    fn test_value_bounds() {
        assert_eq!(value_bounds(Vec::<f64>::new()), [0.0, 1.0]);
        assert_eq!(value_bounds([5.0, 5.0]), [4.0, 6.0]);
        assert_eq!(value_bounds([0.0, 100.0]), [-5.0, 105.0]);
    }

    #[test]
    fn test_line_points_are_indexed() {
        let line: VecDeque<f64> = [10.0, 11.0, 9.5].into_iter().collect();
        assert_eq!(line_points(&line), vec![(0.0, 10.0), (1.0, 11.0), (2.0, 9.5)]);
    }
}
