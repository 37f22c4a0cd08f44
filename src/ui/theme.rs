use ratatui::style::Color;

/// Palette for the events board. Selected by `[ui] theme` in the config.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub header: Color,
    pub card_title: Color,
    pub card_dates: Color,
    pub card_body: Color,
    pub muted: Color,
    pub active_field: Color,
    pub status_bar: Color,
    pub pending: Color,
    pub error: Color,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            header: Color::Cyan,
            card_title: Color::White,
            card_dates: Color::Green,
            card_body: Color::Gray,
            muted: Color::DarkGray,
            active_field: Color::Blue,
            status_bar: Color::White,
            pending: Color::Yellow,
            error: Color::Red,
        }
    }

    pub fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            header: Color::Rgb(251, 184, 108),
            card_title: Color::Rgb(235, 219, 178),
            card_dates: Color::Rgb(184, 187, 38),
            card_body: Color::Rgb(213, 196, 161),
            muted: Color::Rgb(146, 131, 116),
            active_field: Color::Rgb(254, 128, 25),
            status_bar: Color::Rgb(235, 219, 178),
            pending: Color::Rgb(250, 189, 47),
            error: Color::Rgb(251, 73, 52),
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            header: Color::Rgb(136, 192, 208),
            card_title: Color::Rgb(236, 239, 244),
            card_dates: Color::Rgb(163, 190, 140),
            card_body: Color::Rgb(216, 222, 233),
            muted: Color::Rgb(76, 86, 106),
            active_field: Color::Rgb(129, 161, 193),
            status_bar: Color::Rgb(216, 222, 233),
            pending: Color::Rgb(235, 203, 139),
            error: Color::Rgb(191, 97, 106),
        }
    }

    pub fn get_by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "gruvbox" => Self::gruvbox(),
            "nord" => Self::nord(),
            _ => Self::default_theme(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
