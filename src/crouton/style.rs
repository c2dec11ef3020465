// SPDX-License-Identifier: MPL-2.0
//! Visual parameters of a crouton.
//!
//! A [`Style`] is a plain value object. The manager never interprets the
//! visual fields itself; they are handed to the host when the crouton view is
//! inflated. Only the embedded [`Configuration`] is read for timing.

use super::configuration::Configuration;
use crate::config::DEFAULT_PADDING_PX;
use serde::{Deserialize, Serialize};

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Creates a color from a packed `0xAARRGGBB` value.
    #[must_use]
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }
}

/// Preset colors used by the built-in styles.
pub mod palette {
    use super::Color;

    pub const ALERT_RED: Color = Color::from_argb(0xffff_4444);
    pub const CONFIRM_GREEN: Color = Color::from_argb(0xff99_cc00);
    pub const INFO_BLUE: Color = Color::from_argb(0xff33_b5e5);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
}

/// Width or height of the crouton view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    MatchParent,
    WrapContent,
    Pixels(u32),
    /// Host dimension resource, resolved by the host at inflation time.
    Resource(u32),
}

/// Text gravity inside the crouton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gravity {
    #[default]
    Center,
    Start,
    End,
    Top,
    Bottom,
}

/// How an optional image is scaled into its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleType {
    #[default]
    FitXy,
    FitCenter,
    CenterCrop,
    Center,
}

/// An image shown next to the crouton text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub resource: u32,
    pub scale: ScaleType,
}

/// Drop shadow behind the crouton text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextShadow {
    pub color: Color,
    pub radius: f32,
    pub dx: f32,
    pub dy: f32,
}

/// Font used for the crouton text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Font {
    /// Asset path of a font file.
    Named(String),
    /// Host font resource.
    Resource(u32),
}

/// Padding around the crouton content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Padding {
    Pixels(u32),
    Resource(u32),
}

/// Visual parameters of a crouton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub configuration: Configuration,
    pub background_color: Color,
    pub background_drawable: Option<u32>,
    pub tile_background: bool,
    pub text_color: Color,
    pub width: Dimension,
    pub height: Dimension,
    pub gravity: Gravity,
    pub image: Option<Image>,
    /// Text size in sp. `None` keeps the host theme default.
    pub text_size: Option<u32>,
    pub text_shadow: Option<TextShadow>,
    pub text_appearance: Option<u32>,
    pub padding: Padding,
    pub font: Option<Font>,
}

impl Style {
    /// Starts a builder from the default style.
    #[must_use]
    pub fn builder() -> StyleBuilder {
        StyleBuilder::default()
    }

    /// Red style for alerting the user.
    #[must_use]
    pub fn alert() -> Self {
        Self::builder().background_color(palette::ALERT_RED).build()
    }

    /// Green style for confirming an action.
    #[must_use]
    pub fn confirm() -> Self {
        Self::builder().background_color(palette::CONFIRM_GREEN).build()
    }

    /// Blue style for general information.
    #[must_use]
    pub fn info() -> Self {
        Self::builder().background_color(palette::INFO_BLUE).build()
    }
}

impl Default for Style {
    fn default() -> Self {
        StyleBuilder::default().build()
    }
}

/// Fluent builder for [`Style`].
#[derive(Debug, Clone)]
pub struct StyleBuilder {
    style: Style,
}

impl Default for StyleBuilder {
    fn default() -> Self {
        Self {
            style: Style {
                configuration: Configuration::default(),
                background_color: palette::INFO_BLUE,
                background_drawable: None,
                tile_background: false,
                text_color: palette::WHITE,
                width: Dimension::MatchParent,
                height: Dimension::WrapContent,
                gravity: Gravity::Center,
                image: None,
                text_size: None,
                text_shadow: None,
                text_appearance: None,
                padding: Padding::Pixels(DEFAULT_PADDING_PX),
                font: None,
            },
        }
    }
}

impl StyleBuilder {
    /// Starts a builder from an existing style.
    #[must_use]
    pub fn from_style(base: &Style) -> Self {
        Self {
            style: base.clone(),
        }
    }

    #[must_use]
    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.style.configuration = configuration;
        self
    }

    #[must_use]
    pub fn background_color(mut self, color: Color) -> Self {
        self.style.background_color = color;
        self
    }

    #[must_use]
    pub fn background_drawable(mut self, resource: u32) -> Self {
        self.style.background_drawable = Some(resource);
        self
    }

    #[must_use]
    pub fn tile_background(mut self, enabled: bool) -> Self {
        self.style.tile_background = enabled;
        self
    }

    #[must_use]
    pub fn text_color(mut self, color: Color) -> Self {
        self.style.text_color = color;
        self
    }

    #[must_use]
    pub fn width(mut self, width: Dimension) -> Self {
        self.style.width = width;
        self
    }

    #[must_use]
    pub fn height(mut self, height: Dimension) -> Self {
        self.style.height = height;
        self
    }

    #[must_use]
    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.style.gravity = gravity;
        self
    }

    #[must_use]
    pub fn image(mut self, resource: u32, scale: ScaleType) -> Self {
        self.style.image = Some(Image { resource, scale });
        self
    }

    #[must_use]
    pub fn text_size(mut self, sp: u32) -> Self {
        self.style.text_size = Some(sp);
        self
    }

    #[must_use]
    pub fn text_shadow(mut self, shadow: TextShadow) -> Self {
        self.style.text_shadow = Some(shadow);
        self
    }

    #[must_use]
    pub fn text_appearance(mut self, resource: u32) -> Self {
        self.style.text_appearance = Some(resource);
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: Padding) -> Self {
        self.style.padding = padding;
        self
    }

    #[must_use]
    pub fn font(mut self, font: Font) -> Self {
        self.style.font = Some(font);
        self
    }

    #[must_use]
    pub fn build(self) -> Style {
        self.style
    }
}
