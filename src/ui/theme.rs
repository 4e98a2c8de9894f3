//! # Theme System
//!
//! Colors for the select prompt. The active theme is picked by name from the
//! configuration file; unknown names fall back to the default.
//!
//! ## Built-in Themes
//!
//! - **Catppuccin Mocha** (default)
//! - **Catppuccin Latte** - light variant
//! - **Dracula**
//! - **Nord**
//! - **Gruvbox Dark**

use ratatui::style::Color;

/// Colors used by the menu, grouped by what they paint.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Human-readable name, matched against the `theme` config key.
    pub name: &'static str,

    /// Prompt background.
    pub bg: Color,
    /// Plain text.
    pub fg: Color,
    /// Descriptions, key hints, tree connectors.
    pub fg_dim: Color,

    /// Borders, header, highlighted entry background.
    pub accent: Color,
    /// Directory entries.
    pub directory: Color,
    /// Script entries.
    pub file: Color,
    /// Navigation entries ("..", "Back to Root", "Exit").
    pub navigation: Color,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &BUILT_IN_THEMES
    }

    /// Find a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        BUILT_IN_THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn default_theme() -> &'static Theme {
        &BUILT_IN_THEMES[0]
    }

    /// Resolve a configured theme name, warning when it is unknown.
    pub fn resolve(name: &str) -> &'static Theme {
        Self::by_name(name).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown theme '{}', using {}",
                name,
                Self::default_theme().name
            );
            Self::default_theme()
        })
    }
}

static BUILT_IN_THEMES: [Theme; 5] = [
    Theme {
        name: "Catppuccin Mocha",
        bg: Color::Rgb(30, 30, 46),             // base
        fg: Color::Rgb(205, 214, 244),          // text
        fg_dim: Color::Rgb(108, 112, 134),      // overlay0
        accent: Color::Rgb(137, 180, 250),      // blue
        directory: Color::Rgb(249, 226, 175),   // yellow
        file: Color::Rgb(166, 227, 161),        // green
        navigation: Color::Rgb(243, 139, 168),  // red
    },
    Theme {
        name: "Catppuccin Latte",
        bg: Color::Rgb(239, 241, 245),          // base
        fg: Color::Rgb(76, 79, 105),            // text
        fg_dim: Color::Rgb(156, 160, 176),      // overlay0
        accent: Color::Rgb(30, 102, 245),       // blue
        directory: Color::Rgb(223, 142, 29),    // yellow
        file: Color::Rgb(64, 160, 43),          // green
        navigation: Color::Rgb(210, 15, 57),    // red
    },
    Theme {
        name: "Dracula",
        bg: Color::Rgb(40, 42, 54),
        fg: Color::Rgb(248, 248, 242),
        fg_dim: Color::Rgb(98, 114, 164),
        accent: Color::Rgb(189, 147, 249),
        directory: Color::Rgb(241, 250, 140),
        file: Color::Rgb(80, 250, 123),
        navigation: Color::Rgb(255, 85, 85),
    },
    Theme {
        name: "Nord",
        bg: Color::Rgb(46, 52, 64),
        fg: Color::Rgb(216, 222, 233),
        fg_dim: Color::Rgb(76, 86, 106),
        accent: Color::Rgb(136, 192, 208),
        directory: Color::Rgb(235, 203, 139),
        file: Color::Rgb(163, 190, 140),
        navigation: Color::Rgb(191, 97, 106),
    },
    Theme {
        name: "Gruvbox Dark",
        bg: Color::Rgb(40, 40, 40),
        fg: Color::Rgb(235, 219, 178),
        fg_dim: Color::Rgb(146, 131, 116),
        accent: Color::Rgb(131, 165, 152),
        directory: Color::Rgb(250, 189, 47),
        file: Color::Rgb(184, 187, 38),
        navigation: Color::Rgb(251, 73, 52),
    },
];
