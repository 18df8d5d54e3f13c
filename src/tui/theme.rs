//! Terminal theme detection and color definitions

use ratatui::style::Color;

use crate::services::generator::Trend;

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Per-dimension colors, cycled when there are more branches or drivers
const DARK_SERIES: [Color; 6] = [
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
    Color::LightRed,
];

const LIGHT_SERIES: [Color; 6] = [
    Color::Indexed(25),
    Color::Indexed(22),
    Color::Indexed(130),
    Color::Indexed(90),
    Color::Indexed(19),
    Color::Indexed(124),
];

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Primary text color (headers, body text)
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Active/accent color (selected tabs, keybinding keys)
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Secondary/muted text (separators, inactive tabs, hints)
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Period labels (dates, months, years)
    pub fn date(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    /// Peso amounts
    pub fn cash(self) -> Color {
        match self {
            Self::Dark => Color::Magenta,
            Self::Light => Color::Indexed(90), // dark magenta (ANSI 256)
        }
    }

    /// Chart bars
    pub fn bar(self) -> Color {
        match self {
            Self::Dark => Color::Green,
            Self::Light => Color::Indexed(22), // dark green (ANSI 256)
        }
    }

    pub fn error(self) -> Color {
        match self {
            Self::Dark => Color::Red,
            Self::Light => Color::Indexed(124), // dark red (ANSI 256)
        }
    }

    /// Stats accent color (Daily Average card)
    pub fn stat_blue(self) -> Color {
        match self {
            Self::Dark => Color::Blue,
            Self::Light => Color::Indexed(25),
        }
    }

    /// Color for the `index`-th branch or driver
    pub fn series(self, index: usize) -> Color {
        match self {
            Self::Dark => DARK_SERIES[index % DARK_SERIES.len()],
            Self::Light => LIGHT_SERIES[index % LIGHT_SERIES.len()],
        }
    }

    /// Up days green, down days red
    pub fn trend(self, trend: Trend) -> Color {
        match trend {
            Trend::Up => self.bar(),
            Trend::Down => self.error(),
        }
    }
}
