pub mod clock_card;
pub mod result_card;
pub mod search_bar;
pub mod widget_display;

use artbox::{Color as ArtColor, Fill, LinearGradient};
use ratatui::style::Color;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use clock_card::{ClockCard, ClockCardProps};
pub use result_card::{ResultCard, ResultCardProps};
pub use search_bar::{SearchBar, SearchBarProps};
pub use widget_display::{LOADING_TEXT, WidgetDisplay, WidgetDisplayProps};

use crate::theme::{Rgb, Theme};

pub(crate) fn color((r, g, b): Rgb) -> Color {
    Color::Rgb(r, g, b)
}

pub(crate) fn theme_fill(theme: Theme) -> Fill {
    let ((r1, g1, b1), (r2, g2, b2)) = theme.gradient();
    Fill::Linear(LinearGradient::horizontal(
        ArtColor::rgb(r1, g1, b1),
        ArtColor::rgb(r2, g2, b2),
    ))
}
