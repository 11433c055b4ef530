use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Theme color palette defining all colors used in the application.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    // Primary colors
    pub primary: ColorSpec,
    pub secondary: ColorSpec,
    pub accent: ColorSpec,
    pub banner: ColorSpec,

    // Text colors
    pub text: ColorSpec,
    pub text_secondary: ColorSpec,
    pub text_muted: ColorSpec,

    // Status colors
    pub warning: ColorSpec,
    pub error: ColorSpec,

    // UI element colors
    pub border_active: ColorSpec,
    pub border_normal: ColorSpec,
    pub highlight_bg: ColorSpec,
    pub highlight_fg: ColorSpec,

    // Footer mode colors
    pub footer_auth: ColorSpec,
    pub footer_tasks: ColorSpec,
    pub footer_menu: ColorSpec,
    pub footer_edit: ColorSpec,
    pub footer_delete: ColorSpec,
    pub footer_normal: ColorSpec,
}

/// Color specification that can be serialized/deserialized.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSpec {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        ColorSpec { r, g, b }
    }

    pub fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl Theme {
    /// Get the default (light) theme.
    ///
    pub fn default() -> Self {
        let purple = ColorSpec::new(144, 122, 169);
        let pine = ColorSpec::new(40, 105, 131);
        let love = ColorSpec::new(180, 99, 122);
        let gold = ColorSpec::new(234, 157, 52);
        let foam = ColorSpec::new(86, 148, 159);
        let text = ColorSpec::new(87, 82, 121);
        Theme {
            name: "default".to_string(),
            primary: purple,
            secondary: pine,
            accent: love,
            banner: love,
            text,
            text_secondary: ColorSpec::new(121, 117, 147),
            text_muted: ColorSpec::new(152, 147, 165),
            warning: gold,
            error: love,
            border_active: purple,
            border_normal: text,
            highlight_bg: foam,
            highlight_fg: ColorSpec::new(0, 0, 0),
            footer_auth: gold,
            footer_tasks: foam,
            footer_menu: pine,
            footer_edit: purple,
            footer_delete: love,
            footer_normal: ColorSpec::new(0, 0, 0),
        }
    }

    /// Dark theme.
    ///
    pub fn dark() -> Self {
        let purple = ColorSpec::new(196, 167, 231);
        let pine = ColorSpec::new(49, 116, 143);
        let love = ColorSpec::new(235, 111, 146);
        let gold = ColorSpec::new(246, 193, 119);
        let foam = ColorSpec::new(156, 207, 216);
        let base = ColorSpec::new(25, 23, 36);
        Theme {
            name: "dark".to_string(),
            primary: purple,
            secondary: pine,
            accent: love,
            banner: love,
            text: ColorSpec::new(224, 222, 244),
            text_secondary: ColorSpec::new(144, 140, 170),
            text_muted: ColorSpec::new(110, 106, 134),
            warning: gold,
            error: love,
            border_active: purple,
            border_normal: ColorSpec::new(144, 140, 170),
            highlight_bg: foam,
            highlight_fg: base,
            footer_auth: gold,
            footer_tasks: foam,
            footer_menu: pine,
            footer_edit: purple,
            footer_delete: love,
            footer_normal: ColorSpec::new(0, 0, 0),
        }
    }

    /// Get theme by name.
    ///
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }

    /// Get list of all available theme names.
    ///
    pub fn available_themes() -> Vec<String> {
        vec!["default".to_string(), "dark".to_string()]
    }
}
