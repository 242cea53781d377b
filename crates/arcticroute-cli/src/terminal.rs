//! Terminal styling and color detection.

/// ANSI escape codes used by the text renderers.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for point names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary details.
    pub const GRAY: &str = "\x1b[90m";
    /// Green for safe routes and water.
    pub const GREEN: &str = "\x1b[32m";
    /// Red for unsafe routes and land.
    pub const RED: &str = "\x1b[31m";
}

/// Resolved color codes, or empty strings when color is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    /// Palette with ANSI codes.
    pub fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
            red: colors::RED,
        }
    }

    /// Palette with every code empty.
    pub fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            green: "",
            red: "",
        }
    }

    /// Pick a palette based on [`supports_color`].
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Green when `good`, red otherwise.
    pub fn verdict(&self, good: bool) -> &'static str {
        if good {
            self.green
        } else {
            self.red
        }
    }
}

/// Check whether ANSI colors should be emitted.
///
/// Honors the `NO_COLOR` and `TERM=dumb` conventions.
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_palette_is_empty() {
        let palette = ColorPalette::plain();
        assert!(palette.reset.is_empty());
        assert!(palette.verdict(true).is_empty());
        assert!(palette.verdict(false).is_empty());
    }

    #[test]
    fn verdict_picks_green_or_red() {
        let palette = ColorPalette::colored();
        assert_eq!(palette.verdict(true), colors::GREEN);
        assert_eq!(palette.verdict(false), colors::RED);
    }
}
