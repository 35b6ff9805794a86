use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Paragraph},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{
    ClockCard, ClockCardProps, Component, ResultCard, ResultCardProps, SearchBar, SearchBarProps,
    color,
};
use crate::action::Action;
use crate::state::{AppState, BlinkingError, ViewState};

pub const LOADING_TEXT: &str = "Fetching weather...";

/// Props for WidgetDisplay - read-only view of state
pub struct WidgetDisplayProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Search input above a single display region that shows exactly one view
#[derive(Default)]
pub struct WidgetDisplay {
    search: SearchBar,
}

impl WidgetDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

fn card_title(view: &ViewState) -> String {
    match view {
        ViewState::LocalClock => " Local time ".to_string(),
        ViewState::Loading => " Searching ".to_string(),
        ViewState::Result(result) => format!(" {} ", result.display_name()),
        ViewState::BlinkingError(_) => " Error ".to_string(),
    }
}

fn render_single_line(frame: &mut Frame, area: Rect, line: Line<'_>) {
    let chunks = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .split(area);
    frame.render_widget(Paragraph::new(line.centered()), chunks[0]);
}

fn render_blinking_error(frame: &mut Frame, area: Rect, error: &BlinkingError) {
    let line = if error.visible {
        Line::styled(
            error.message.as_str(),
            Style::default().fg(Color::Rgb(200, 100, 100)).bold(),
        )
    } else {
        Line::default()
    };
    render_single_line(frame, area, line);
}

impl Component<Action> for WidgetDisplay {
    type Props<'a> = WidgetDisplayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        self.search.handle_event(
            event,
            SearchBarProps {
                query: &props.state.search_input,
                is_focused: props.is_focused,
                on_change: Action::SearchInputChange,
                on_submit: Action::SearchSubmit,
            },
        )
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: WidgetDisplayProps<'_>) {
        let state = props.state;
        let accent = color(state.theme.accent());

        let chunks = Layout::vertical([
            Constraint::Length(3), // Search input
            Constraint::Min(1),    // Display region
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        self.search.render(
            frame,
            chunks[0],
            SearchBarProps {
                query: &state.search_input,
                is_focused: props.is_focused,
                on_change: Action::SearchInputChange,
                on_submit: Action::SearchSubmit,
            },
        );

        let card = Block::bordered()
            .border_style(Style::default().fg(accent))
            .title(Line::from(card_title(&state.view)).bold());
        let inner = card.inner(chunks[1]);
        frame.render_widget(card, chunks[1]);

        match &state.view {
            ViewState::LocalClock => {
                let mut clock = ClockCard;
                clock.render(
                    frame,
                    inner,
                    ClockCardProps {
                        reading: state.clock.as_ref(),
                        theme: state.theme,
                    },
                );
            }
            ViewState::Loading => {
                let line = Line::styled(LOADING_TEXT, Style::default().fg(Color::DarkGray));
                render_single_line(frame, inner, line);
            }
            ViewState::Result(result) => {
                let mut card = ResultCard;
                card.render(
                    frame,
                    inner,
                    ResultCardProps {
                        result,
                        city_clock: state.clock.as_ref(),
                        theme: state.theme,
                        icon_host: &state.icon_host,
                    },
                );
            }
            ViewState::BlinkingError(error) => render_blinking_error(frame, inner, error),
        }

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[2],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("enter", "search"),
                    StatusBarHint::new("esc", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}
