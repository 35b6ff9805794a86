use artbox::{Alignment as ArtAlignment, Renderer, fonts, integrations::ratatui::ArtBox};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{Component, color, theme_fill};
use crate::action::Action;
use crate::clock::ClockReading;
use crate::state::WeatherResult;
use crate::theme::Theme;

/// Weather card with the city clock underneath
pub struct ResultCard;

pub struct ResultCardProps<'a> {
    pub result: &'a WeatherResult,
    pub city_clock: Option<&'a ClockReading>,
    pub theme: Theme,
    pub icon_host: &'a str,
}

/// Header row cap; the name falls back to plain text when space runs out.
const HEADER_CAP: u16 = 6;
/// temp, description, blank, humidity, wind, blank, date, time, icon
const BODY_ROWS: u16 = 9;

impl Component<Action> for ResultCard {
    type Props<'a> = ResultCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let result = props.result;
        let accent = color(props.theme.accent());
        let dim = Style::default().fg(Color::DarkGray);

        let chunks = Layout::vertical([
            Constraint::Max(HEADER_CAP),
            Constraint::Length(1),
            Constraint::Length(BODY_ROWS),
        ])
        .flex(Flex::Center)
        .split(area);

        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(theme_fill(props.theme));
        frame.render_widget(ArtBox::new(&renderer, &result.name), chunks[0]);

        let (date, time) = props
            .city_clock
            .map_or(("", ""), |c| (c.date.as_str(), c.time.as_str()));

        let lines = vec![
            Line::from(vec![
                Span::raw(result.icon_emoji()),
                Span::raw("  "),
                Span::styled(
                    format!("{}°C", result.temperature),
                    Style::default().fg(accent).bold(),
                ),
            ]),
            Line::from(Span::styled(
                result.description.as_str(),
                Style::default().fg(Color::Gray),
            )),
            Line::default(),
            Line::from(format!("Humidity: {}%", result.humidity)),
            Line::from(format!("Wind Speed: {} m/s", result.wind_speed)),
            Line::default(),
            Line::from(date),
            Line::from(Span::styled(time, Style::default().bold())),
            Line::from(Span::styled(result.icon_url(props.icon_host), dim)),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[2]);
    }
}
