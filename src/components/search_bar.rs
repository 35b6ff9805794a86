use crossterm::event::KeyCode;
use ratatui::{Frame, layout::Rect, style::Color};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::Component;
use crate::action::Action;

const PLACEHOLDER: &str = "Enter a city name...";

/// City input. Enter submits the raw text, Esc quits.
pub struct SearchBar {
    input: TextInput,
}

pub struct SearchBarProps<'a> {
    pub query: &'a str,
    pub is_focused: bool,
    // Action constructors
    pub on_change: fn(String) -> Action,
    pub on_submit: fn(String) -> Action,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
        }
    }
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Enter => return vec![(props.on_submit)(props.query.to_string())],
            KeyCode::Esc => return vec![Action::Quit],
            _ => {}
        }

        let input_props = TextInputProps {
            value: props.query,
            placeholder: PLACEHOLDER,
            is_focused: true,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::new(1, 0, 1, 0),
                    bg: None,
                    fg: None,
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: props.on_change,
            on_submit: props.on_submit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input
            .handle_event(event, input_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let input_props = TextInputProps {
            value: props.query,
            placeholder: PLACEHOLDER,
            is_focused: props.is_focused,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::all(1),
                    bg: Some(Color::Rgb(50, 50, 60)),
                    fg: None,
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: props.on_change,
            on_submit: props.on_submit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input.render(frame, area, input_props);
    }
}
