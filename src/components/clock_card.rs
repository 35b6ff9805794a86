use artbox::{Alignment as ArtAlignment, Renderer, fonts, integrations::ratatui::ArtBox};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{Component, theme_fill};
use crate::action::Action;
use crate::clock::ClockReading;
use crate::theme::Theme;

/// Local clock: large time, then the date and a labelled time line.
pub struct ClockCard;

pub struct ClockCardProps<'a> {
    pub reading: Option<&'a ClockReading>,
    pub theme: Theme,
}

/// FIGlet time row cap (terminus is 6 rows tall).
const TIME_CAP: u16 = 6;

impl Component<Action> for ClockCard {
    type Props<'a> = ClockCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let Some(reading) = props.reading else {
            return;
        };

        let chunks = Layout::vertical([
            Constraint::Max(TIME_CAP), // FIGlet time
            Constraint::Length(1),     // blank
            Constraint::Length(1),     // date
            Constraint::Length(1),     // labelled time
        ])
        .flex(Flex::Center)
        .split(area);

        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(theme_fill(props.theme));
        frame.render_widget(ArtBox::new(&renderer, &reading.time), chunks[0]);

        frame.render_widget(
            Paragraph::new(Line::from(reading.date.as_str()).centered()),
            chunks[2],
        );
        frame.render_widget(
            Paragraph::new(
                Line::from(vec![
                    Span::styled("Current Local Time: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(reading.time.as_str(), Style::default().bold()),
                ])
                .centered(),
            ),
            chunks[3],
        );
    }
}
