//! Theme colors for the terminal UI
//! Built-in palette, optionally overridden by the `[theme]` table of the config.

use ratatui::style::Color;

use crate::calculator::Empfehlung;
use crate::config::ThemeConfig;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,           // Active borders, highlights
    pub danger: Color,           // Kritisch, negative cashflow
    pub warning: Color,          // Ausreichend
    pub success: Color,          // Sehr gut, positive cashflow
    pub success_dim: Color,      // Gut
    pub text: Color,             // Primary text
    pub text_dim: Color,         // Labels, hints
    pub bg_selected: Color,      // Focused field background
    pub inactive: Color,         // Inactive borders
    pub header: Color,           // Group titles
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired
        Self {
            accent: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            warning: Color::Rgb(249, 226, 175),
            success: Color::Rgb(166, 218, 149),
            success_dim: Color::Rgb(128, 170, 115),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(137, 180, 250),
        }
    }
}

impl Theme {
    /// Build the theme from config overrides on top of the defaults
    pub fn from_config(config: &ThemeConfig) -> Self {
        let mut theme = Self::default();

        let overrides: [(&Option<String>, &mut Color, &str); 6] = [
            (&config.accent, &mut theme.accent, "accent"),
            (&config.danger, &mut theme.danger, "danger"),
            (&config.warning, &mut theme.warning, "warning"),
            (&config.success, &mut theme.success, "success"),
            (&config.text, &mut theme.text, "text"),
            (&config.text_dim, &mut theme.text_dim, "text_dim"),
        ];

        for (value, slot, name) in overrides {
            if let Some(hex) = value {
                match Self::parse_hex_color(hex) {
                    Some(color) => *slot = color,
                    None => tracing::warn!("Ignoring invalid theme color {} = {:?}", name, hex),
                }
            }
        }

        // Gut is a dimmer Sehr gut
        if config.success.is_some() {
            theme.success_dim = Self::dim(theme.success);
        }

        theme
    }

    /// Color for a recommendation tier. The only place tiers map to colors.
    pub fn empfehlung_color(&self, empfehlung: Empfehlung) -> Color {
        match empfehlung {
            Empfehlung::Kritisch => self.danger,
            Empfehlung::Ausreichend => self.warning,
            Empfehlung::Gut => self.success_dim,
            Empfehlung::SehrGut => self.success,
        }
    }

    pub fn cashflow_color(&self, cashflow: f64) -> Color {
        if cashflow >= 0.0 {
            self.success
        } else {
            self.danger
        }
    }

    /// Scale an RGB color to 80 % brightness
    fn dim(color: Color) -> Color {
        match color {
            Color::Rgb(r, g, b) => Color::Rgb(
                (r as u16 * 4 / 5) as u8,
                (g as u16 * 4 / 5) as u8,
                (b as u16 * 4 / 5) as u8,
            ),
            other => other,
        }
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        if !s.is_ascii() {
            return None;
        }

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Theme::parse_hex_color("#FFC107"), Some(Color::Rgb(255, 193, 7)));
        assert_eq!(Theme::parse_hex_color("d35f5f"), Some(Color::Rgb(211, 95, 95)));
        assert_eq!(Theme::parse_hex_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("#12345"), None);
        assert_eq!(Theme::parse_hex_color("#gggggg"), None);
    }

    #[test]
    fn test_from_config_overrides() {
        let config = ThemeConfig {
            danger: Some("#B91C1C".to_string()),
            success: Some("#64c864".to_string()),
            warning: Some("not a color".to_string()),
            ..ThemeConfig::default()
        };
        let theme = Theme::from_config(&config);
        let defaults = Theme::default();

        assert_eq!(theme.danger, Color::Rgb(185, 28, 28));
        assert_eq!(theme.success, Color::Rgb(100, 200, 100));
        assert_eq!(theme.success_dim, Color::Rgb(80, 160, 80));
        assert_eq!(theme.warning, defaults.warning);
        assert_eq!(theme.accent, defaults.accent);
    }

    #[test]
    fn test_empfehlung_colors() {
        let theme = Theme::default();
        assert_eq!(theme.empfehlung_color(Empfehlung::Kritisch), theme.danger);
        assert_eq!(theme.empfehlung_color(Empfehlung::Ausreichend), theme.warning);
        assert_eq!(theme.empfehlung_color(Empfehlung::Gut), theme.success_dim);
        assert_eq!(theme.empfehlung_color(Empfehlung::SehrGut), theme.success);
    }

    #[test]
    fn test_cashflow_color() {
        let theme = Theme::default();
        assert_eq!(theme.cashflow_color(0.0), theme.success);
        assert_eq!(theme.cashflow_color(-0.01), theme.danger);
    }
}
