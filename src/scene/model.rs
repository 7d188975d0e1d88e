//! Declarative poster template, as stored in JSON.
//!
//! Numeric geometry is kept signed so that out-of-range values survive parsing and are reported
//! by [`PosterTemplate::validate`] with a precise path instead of a generic type error.

use serde::{Deserialize, Serialize};

use crate::layout::position::Anchor;
use crate::schema::validate::{SchemaErrors, validate_model};

/// Versioned poster layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PosterTemplate {
    /// Registry key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display description.
    #[serde(default)]
    pub description: String,
    /// `MAJOR.MINOR.PATCH`.
    pub version: String,
    /// Canvas dimensions.
    pub canvas: CanvasDef,
    /// Background fill.
    pub background: Background,
    /// Photo slots, composited in order.
    pub photos: Vec<PhotoField>,
    /// Text slots, rendered in order over the photos.
    #[serde(default)]
    pub text: Vec<TextField>,
}

impl PosterTemplate {
    /// Run semantic validation, collecting every issue.
    pub fn validate(&self) -> Result<(), SchemaErrors> {
        validate_model(self)
    }

    /// Ids of the text fields the caller must supply data for, in template order.
    pub fn required_text_ids(&self) -> impl Iterator<Item = &str> {
        self.text.iter().map(|f| f.id.as_str())
    }
}

/// Canvas dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasDef {
    /// Width in pixels.
    pub width: i64,
    /// Height in pixels.
    pub height: i64,
}

/// Background fill variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)]
pub enum Background {
    /// Single `#rrggbb` color.
    Solid {
        /// Fill color.
        color: String,
    },
    /// Multi-stop gradient.
    Gradient {
        /// Gradient geometry.
        direction: GradientDirection,
        /// 2 to 4 stops, applied in the given order.
        stops: Vec<GradientStop>,
    },
    /// Image file scaled to cover the canvas.
    Image {
        /// Local path or `http(s)` URL.
        path: String,
    },
}

/// Gradient geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientDirection {
    /// Top to bottom.
    ToBottom,
    /// Left to right.
    ToRight,
    /// Top-left corner to bottom-right corner.
    ToBottomRight,
    /// From the center outwards, reaching the corners.
    Radial,
}

/// One gradient color stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradientStop {
    /// `#rrggbb` color.
    pub color: String,
    /// Offset along the gradient in percent, `[0, 100]`.
    pub position: f64,
}

/// Anchor-relative placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldPosition {
    /// Canvas reference point.
    pub anchor: Anchor,
    /// Horizontal offset from the anchor, in pixels.
    #[serde(default)]
    pub offset_x: i64,
    /// Vertical offset from the anchor, in pixels.
    #[serde(default)]
    pub offset_y: i64,
}

/// Photo slot size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeDef {
    /// Width in pixels.
    pub width: i64,
    /// Height in pixels.
    pub height: i64,
}

/// Clip shape for a photo.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)]
pub enum Mask {
    /// Rectangular, unclipped.
    #[default]
    None,
    /// Ellipse inscribed in the slot (a circle for square slots).
    Circle,
    /// Rectangle with rounded corners.
    RoundedRect {
        /// Corner radius in pixels.
        radius: f64,
    },
}

/// Outline drawn around a photo or a text glyph run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stroke {
    /// Line width in pixels.
    pub width: f64,
    /// Line color.
    pub color: String,
}

/// Drop shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Shadow {
    /// Horizontal offset in pixels.
    #[serde(default)]
    pub offset_x: f64,
    /// Vertical offset in pixels.
    #[serde(default)]
    pub offset_y: f64,
    /// Gaussian blur standard deviation in pixels.
    #[serde(default)]
    pub blur: f64,
    /// Shadow color, usually translucent.
    pub color: String,
}

/// Photo slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhotoField {
    /// Slot id.
    pub id: String,
    /// Placement of the slot box.
    pub position: FieldPosition,
    /// Slot box size; the photo is cover-cropped to it.
    pub size: SizeDef,
    /// Clip shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<Mask>,
    /// Outline along the clip shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Stroke>,
    /// Shadow cast by the clip shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Text starts at the position.
    Left,
    /// Text is centered on the position.
    Center,
    /// Text ends at the position.
    Right,
}

/// Case mapping applied before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    /// Unchanged.
    #[default]
    None,
    /// All upper case.
    Uppercase,
    /// All lower case.
    Lowercase,
    /// First letter of each word upper case.
    Capitalize,
}

impl TextTransform {
    /// Apply the mapping.
    pub fn apply(self, text: &str) -> String {
        match self {
            TextTransform::None => text.to_owned(),
            TextTransform::Uppercase => text.to_uppercase(),
            TextTransform::Lowercase => text.to_lowercase(),
            TextTransform::Capitalize => {
                let mut out = String::with_capacity(text.len());
                let mut at_word_start = true;
                for c in text.chars() {
                    if at_word_start && c.is_alphabetic() {
                        out.extend(c.to_uppercase());
                        at_word_start = false;
                    } else {
                        out.push(c);
                        if c.is_whitespace() {
                            at_word_start = true;
                        } else if c.is_alphanumeric() {
                            at_word_start = false;
                        }
                    }
                }
                out
            }
        }
    }
}

/// Text appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TextStyle {
    /// Registered font name.
    pub font_family: String,
    /// Size in pixels.
    pub font_size: f64,
    /// Fill color.
    pub color: String,
    /// CSS weight, 100 to 900.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    /// Alignment relative to the position; derived from the anchor when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    /// Extra space between glyphs, in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    /// Case mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<TextTransform>,
    /// Glyph outline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    /// Glyph drop shadow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    /// Rendered width ceiling; wider text is scaled down to fit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
}

/// Text slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TextField {
    /// Slot id; also the key looked up in the caller's data.
    pub id: String,
    /// Placement of the text's reference point.
    pub position: FieldPosition,
    /// Appearance.
    pub style: TextStyle,
    /// Sample value used for previews.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
