//! Styles for the carlog CLI.
//!
//! Output is styled through a [`Palette`]: a handful of semantic styles (heading,
//! amount, muted, ...) whose actual colors depend on the theme. Render code only
//! ever asks for the semantic style, so light and dark differ in one place.
//!
//! The theme is whatever the user saved with `carlog theme`. Until they save one,
//! the terminal's own mode (via `dark-light`) decides.

use carlogapp::commands::theme::Theme;
use console::Style;

pub struct Palette {
    pub heading: Style,
    pub label: Style,
    pub amount: Style,
    pub muted: Style,
    pub accent: Style,
    pub urgent: Style,
    pub overdue: Style,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => build_light_palette(),
            Theme::Dark => build_dark_palette(),
        }
    }
}

/// Theme matching the terminal, used when none is stored.
pub fn detected_theme() -> Theme {
    match dark_light::detect() {
        dark_light::Mode::Dark => Theme::Dark,
        _ => Theme::Light,
    }
}

fn build_light_palette() -> Palette {
    Palette {
        heading: Style::new().black().bold(),
        label: Style::new().black(),
        amount: Style::new().blue(),
        muted: Style::new().color256(244),
        accent: Style::new().color256(136).bold(),
        urgent: Style::new().yellow().bold(),
        overdue: Style::new().red().bold(),
    }
}

fn build_dark_palette() -> Palette {
    Palette {
        heading: Style::new().white().bold(),
        label: Style::new().white(),
        amount: Style::new().cyan(),
        muted: Style::new().color256(246),
        accent: Style::new().yellow().bold(),
        urgent: Style::new().yellow().bold(),
        overdue: Style::new().red().bold(),
    }
}
