//! Template validation over the raw JSON document.
//!
//! One walk reports shape problems (wrong types, missing or unknown keys, unknown enum values)
//! and range/format problems together, each located by its JSON path. Typed templates are
//! serialized and run through the same walk.

use std::collections::HashSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::assets::color::{is_valid_hex_color, parse_color};
use crate::foundation::core::MAX_DIMENSION;
use crate::layout::position::Anchor;
use crate::scene::model::{GradientDirection, PosterTemplate, TextAlign, TextTransform};

/// Largest accepted text `fontSize`.
pub const MAX_FONT_SIZE: f64 = 1000.0;

/// Largest accepted shadow `blur` (gaussian standard deviation in pixels).
pub const MAX_SHADOW_BLUR: f64 = 100.0;

/// Step in the JSON path of a [`SchemaError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaPathElem {
    /// Object key.
    Field(&'static str),
    /// Array index.
    Index(usize),
}

/// One template issue, located by JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub(crate) path: Vec<SchemaPathElem>,
    pub(crate) message: String,
}

impl SchemaError {
    pub(crate) fn at(path: &[SchemaPathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }

    /// Path rendered as `$.photos[0].mask.radius`.
    pub fn path(&self) -> String {
        format_path(&self.path)
    }

    /// Issue description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

fn format_path(path: &[SchemaPathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match *p {
            SchemaPathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            SchemaPathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

/// Every issue found in one template, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaErrors {
    pub(crate) errors: Vec<SchemaError>,
}

impl SchemaErrors {
    /// Issues found.
    pub fn issues(&self) -> &[SchemaError] {
        &self.errors
    }

    /// Number of issues.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no issue was recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

/// Validate an untyped template document and build the typed template.
///
/// Every issue in the document is collected before returning.
pub fn validate_template(value: &Value) -> Result<PosterTemplate, SchemaErrors> {
    let mut walk = Walk::default();
    walk.template(value);
    walk.finish()?;
    serde_json::from_value(value.clone()).map_err(|e| SchemaErrors {
        errors: vec![SchemaError::at(&[], format!("invalid template document: {e}"))],
    })
}

pub(crate) fn validate_model(t: &PosterTemplate) -> Result<(), SchemaErrors> {
    let value = serde_json::to_value(t).map_err(|e| SchemaErrors {
        errors: vec![SchemaError::at(&[], format!("template is not serializable: {e}"))],
    })?;
    let mut walk = Walk::default();
    walk.template(&value);
    walk.finish()
}

type Path = [SchemaPathElem];
type Object = Map<String, Value>;

const TEMPLATE_KEYS: &[&str] = &[
    "id",
    "name",
    "description",
    "version",
    "canvas",
    "background",
    "photos",
    "text",
];
const STYLE_KEYS: &[&str] = &[
    "fontFamily",
    "fontSize",
    "color",
    "fontWeight",
    "align",
    "letterSpacing",
    "textTransform",
    "stroke",
    "shadow",
    "maxWidth",
];

#[derive(Default)]
struct Walk {
    errors: Vec<SchemaError>,
}

impl Walk {
    fn finish(self) -> Result<(), SchemaErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaErrors {
                errors: self.errors,
            })
        }
    }

    fn push(&mut self, path: &Path, message: impl Into<String>) {
        self.errors.push(SchemaError::at(path, message));
    }

    fn template(&mut self, v: &Value) {
        use SchemaPathElem::{Field, Index};
        let root: &Path = &[];
        let Some(obj) = self.object(root, v, TEMPLATE_KEYS) else {
            return;
        };

        for key in ["id", "name"] {
            if let Some(s) = self.str_at(root, obj, key, true)
                && s.trim().is_empty()
            {
                self.push(&[Field(key)], "must be non-empty");
            }
        }
        self.str_at(root, obj, "description", false);
        if let Some(version) = self.str_at(root, obj, "version", true)
            && !is_valid_version(version)
        {
            self.push(
                &[Field("version")],
                format!("\"{version}\" must match MAJOR.MINOR.PATCH with 1-3 digits per component"),
            );
        }

        if let Some(canvas) = self.get(root, obj, "canvas", true) {
            self.dimensions(&[Field("canvas")], canvas);
        }
        if let Some(bg) = self.get(root, obj, "background", true) {
            self.background(bg);
        }

        if let Some(photos) = self.get(root, obj, "photos", true)
            && let Some(list) = self.array(&[Field("photos")], photos)
        {
            if list.is_empty() {
                self.push(&[Field("photos")], "must contain at least one photo field");
            }
            let mut ids = HashSet::new();
            for (i, photo) in list.iter().enumerate() {
                self.photo(&[Field("photos"), Index(i)], photo, &mut ids);
            }
        }

        if let Some(text) = self.get(root, obj, "text", false)
            && let Some(list) = self.array(&[Field("text")], text)
        {
            let mut ids = HashSet::new();
            for (i, field) in list.iter().enumerate() {
                self.text_field(&[Field("text"), Index(i)], field, &mut ids);
            }
        }
    }

    fn background(&mut self, v: &Value) {
        use SchemaPathElem::{Field, Index};
        let path: &Path = &[Field("background")];
        let Some(obj) = self.as_object(path, v) else {
            return;
        };
        match self.str_at(path, obj, "type", true) {
            Some("solid") => {
                self.unknown_keys(path, obj, &["type", "color"]);
                if let Some(color) = self.str_at(path, obj, "color", true) {
                    self.hex(&[Field("background"), Field("color")], color);
                }
            }
            Some("gradient") => {
                self.unknown_keys(path, obj, &["type", "direction", "stops"]);
                self.parse_at::<GradientDirection>(path, obj, "direction", true);
                let stops_path = [Field("background"), Field("stops")];
                let Some(stops) = self.get(path, obj, "stops", true) else {
                    return;
                };
                let Some(stops) = self.array(&stops_path, stops) else {
                    return;
                };
                if !(2..=4).contains(&stops.len()) {
                    self.push(
                        &stops_path,
                        format!("gradient needs 2-4 stops, got {}", stops.len()),
                    );
                }
                for (i, stop) in stops.iter().enumerate() {
                    let base = [Field("background"), Field("stops"), Index(i)];
                    let Some(stop) = self.object(&base, stop, &["color", "position"]) else {
                        continue;
                    };
                    if let Some(color) = self.str_at(&base, stop, "color", true) {
                        self.hex(&with(&base, &[Field("color")]), color);
                    }
                    if let Some(pos) = self.num_at(&base, stop, "position", true)
                        && !(0.0..=100.0).contains(&pos)
                    {
                        self.push(
                            &with(&base, &[Field("position")]),
                            format!("must be in [0, 100], got {pos}"),
                        );
                    }
                }
            }
            Some("image") => {
                self.unknown_keys(path, obj, &["type", "path"]);
                if let Some(p) = self.str_at(path, obj, "path", true)
                    && p.trim().is_empty()
                {
                    self.push(&[Field("background"), Field("path")], "must be non-empty");
                }
            }
            Some(other) => self.push(
                &[Field("background"), Field("type")],
                format!("must be one of \"solid\", \"gradient\", \"image\", got \"{other}\""),
            ),
            None => {}
        }
    }

    fn photo(&mut self, path: &Path, v: &Value, ids: &mut HashSet<String>) {
        use SchemaPathElem::Field;
        let Some(obj) = self.object(
            path,
            v,
            &["id", "position", "size", "mask", "border", "shadow"],
        ) else {
            return;
        };
        self.field_id(path, obj, ids);
        if let Some(pos) = self.get(path, obj, "position", true) {
            self.position(&with(path, &[Field("position")]), pos);
        }
        if let Some(size) = self.get(path, obj, "size", true) {
            self.dimensions(&with(path, &[Field("size")]), size);
        }
        if let Some(mask) = self.get(path, obj, "mask", false) {
            self.mask(&with(path, &[Field("mask")]), mask);
        }
        if let Some(border) = self.get(path, obj, "border", false) {
            self.stroke(&with(path, &[Field("border")]), border);
        }
        if let Some(shadow) = self.get(path, obj, "shadow", false) {
            self.shadow(&with(path, &[Field("shadow")]), shadow);
        }
    }

    fn text_field(&mut self, path: &Path, v: &Value, ids: &mut HashSet<String>) {
        use SchemaPathElem::Field;
        let Some(obj) = self.object(path, v, &["id", "position", "style", "placeholder"]) else {
            return;
        };
        self.field_id(path, obj, ids);
        if let Some(pos) = self.get(path, obj, "position", true) {
            self.position(&with(path, &[Field("position")]), pos);
        }
        if let Some(style) = self.get(path, obj, "style", true) {
            self.style(&with(path, &[Field("style")]), style);
        }
        self.str_at(path, obj, "placeholder", false);
    }

    fn style(&mut self, path: &Path, v: &Value) {
        use SchemaPathElem::Field;
        let Some(obj) = self.object(path, v, STYLE_KEYS) else {
            return;
        };
        if let Some(family) = self.str_at(path, obj, "fontFamily", true)
            && family.trim().is_empty()
        {
            self.push(&with(path, &[Field("fontFamily")]), "must be non-empty");
        }
        if let Some(size) = self.num_at(path, obj, "fontSize", true)
            && !(size > 0.0 && size <= MAX_FONT_SIZE)
        {
            self.push(
                &with(path, &[Field("fontSize")]),
                format!("must be in (0, {MAX_FONT_SIZE}], got {size}"),
            );
        }
        if let Some(color) = self.str_at(path, obj, "color", true) {
            self.color(&with(path, &[Field("color")]), color);
        }
        if let Some(weight) = self.int_at(path, obj, "fontWeight", false)
            && !(100..=900).contains(&weight)
        {
            self.push(
                &with(path, &[Field("fontWeight")]),
                format!("must be in 100..=900, got {weight}"),
            );
        }
        self.parse_at::<TextAlign>(path, obj, "align", false);
        self.num_at(path, obj, "letterSpacing", false);
        self.parse_at::<TextTransform>(path, obj, "textTransform", false);
        if let Some(stroke) = self.get(path, obj, "stroke", false) {
            self.stroke(&with(path, &[Field("stroke")]), stroke);
        }
        if let Some(shadow) = self.get(path, obj, "shadow", false) {
            self.shadow(&with(path, &[Field("shadow")]), shadow);
        }
        if let Some(max) = self.num_at(path, obj, "maxWidth", false)
            && max <= 0.0
        {
            self.push(
                &with(path, &[Field("maxWidth")]),
                format!("must be > 0, got {max}"),
            );
        }
    }

    fn field_id(&mut self, path: &Path, obj: &Object, ids: &mut HashSet<String>) {
        let Some(id) = self.str_at(path, obj, "id", true) else {
            return;
        };
        let id_path = with(path, &[SchemaPathElem::Field("id")]);
        if id.trim().is_empty() {
            self.push(&id_path, "must be non-empty");
        } else if !ids.insert(id.to_owned()) {
            self.push(&id_path, format!("duplicate field id \"{id}\""));
        }
    }

    fn position(&mut self, path: &Path, v: &Value) {
        let Some(obj) = self.object(path, v, &["anchor", "offsetX", "offsetY"]) else {
            return;
        };
        self.parse_at::<Anchor>(path, obj, "anchor", true);
        let limit = i64::from(MAX_DIMENSION);
        for key in ["offsetX", "offsetY"] {
            if let Some(offset) = self.int_at(path, obj, key, false)
                && !(-limit..=limit).contains(&offset)
            {
                self.push(
                    &with(path, &[SchemaPathElem::Field(key)]),
                    format!("must be within ±{limit}, got {offset}"),
                );
            }
        }
    }

    fn dimensions(&mut self, path: &Path, v: &Value) {
        let Some(obj) = self.object(path, v, &["width", "height"]) else {
            return;
        };
        for key in ["width", "height"] {
            if let Some(d) = self.int_at(path, obj, key, true)
                && !(1..=i64::from(MAX_DIMENSION)).contains(&d)
            {
                self.push(
                    &with(path, &[SchemaPathElem::Field(key)]),
                    format!("must be in 1..={MAX_DIMENSION}, got {d}"),
                );
            }
        }
    }

    fn mask(&mut self, path: &Path, v: &Value) {
        let Some(obj) = self.as_object(path, v) else {
            return;
        };
        match self.str_at(path, obj, "type", true) {
            Some("none") | Some("circle") => self.unknown_keys(path, obj, &["type"]),
            Some("rounded-rect") => {
                self.unknown_keys(path, obj, &["type", "radius"]);
                if let Some(radius) = self.num_at(path, obj, "radius", true)
                    && radius <= 0.0
                {
                    self.push(
                        &with(path, &[SchemaPathElem::Field("radius")]),
                        format!("must be > 0, got {radius}"),
                    );
                }
            }
            Some(other) => self.push(
                &with(path, &[SchemaPathElem::Field("type")]),
                format!("must be one of \"none\", \"circle\", \"rounded-rect\", got \"{other}\""),
            ),
            None => {}
        }
    }

    fn stroke(&mut self, path: &Path, v: &Value) {
        let Some(obj) = self.object(path, v, &["width", "color"]) else {
            return;
        };
        if let Some(width) = self.num_at(path, obj, "width", true)
            && width <= 0.0
        {
            self.push(
                &with(path, &[SchemaPathElem::Field("width")]),
                format!("must be > 0, got {width}"),
            );
        }
        if let Some(color) = self.str_at(path, obj, "color", true) {
            self.color(&with(path, &[SchemaPathElem::Field("color")]), color);
        }
    }

    fn shadow(&mut self, path: &Path, v: &Value) {
        let Some(obj) = self.object(path, v, &["offsetX", "offsetY", "blur", "color"]) else {
            return;
        };
        self.num_at(path, obj, "offsetX", false);
        self.num_at(path, obj, "offsetY", false);
        if let Some(blur) = self.num_at(path, obj, "blur", false)
            && !(0.0..=MAX_SHADOW_BLUR).contains(&blur)
        {
            self.push(
                &with(path, &[SchemaPathElem::Field("blur")]),
                format!("must be in [0, {MAX_SHADOW_BLUR}], got {blur}"),
            );
        }
        if let Some(color) = self.str_at(path, obj, "color", true) {
            self.color(&with(path, &[SchemaPathElem::Field("color")]), color);
        }
    }

    fn hex(&mut self, path: &Path, color: &str) {
        if !is_valid_hex_color(color) {
            self.push(path, format!("\"{color}\" is not a #rrggbb color"));
        }
    }

    fn color(&mut self, path: &Path, color: &str) {
        if parse_color(color).is_err() {
            self.push(
                path,
                format!("\"{color}\" is not a #rrggbb or rgb()/rgba() color"),
            );
        }
    }

    fn as_object<'v>(&mut self, path: &Path, v: &'v Value) -> Option<&'v Object> {
        let obj = v.as_object();
        if obj.is_none() {
            self.push(path, format!("must be an object, got {}", kind(v)));
        }
        obj
    }

    fn object<'v>(&mut self, path: &Path, v: &'v Value, known: &[&str]) -> Option<&'v Object> {
        let obj = self.as_object(path, v)?;
        self.unknown_keys(path, obj, known);
        Some(obj)
    }

    fn unknown_keys(&mut self, path: &Path, obj: &Object, known: &[&str]) {
        for key in obj.keys() {
            if !known.contains(&key.as_str()) {
                self.push(path, format!("unknown field \"{key}\""));
            }
        }
    }

    fn array<'v>(&mut self, path: &Path, v: &'v Value) -> Option<&'v Vec<Value>> {
        let list = v.as_array();
        if list.is_none() {
            self.push(path, format!("must be an array, got {}", kind(v)));
        }
        list
    }

    /// Value under `key`; an absent required key is reported.
    fn get<'v>(
        &mut self,
        parent: &Path,
        obj: &'v Object,
        key: &'static str,
        required: bool,
    ) -> Option<&'v Value> {
        let v = obj.get(key);
        if v.is_none() && required {
            self.push(&with(parent, &[SchemaPathElem::Field(key)]), "is required");
        }
        v
    }

    fn str_at<'v>(
        &mut self,
        parent: &Path,
        obj: &'v Object,
        key: &'static str,
        required: bool,
    ) -> Option<&'v str> {
        let v = self.get(parent, obj, key, required)?;
        let s = v.as_str();
        if s.is_none() {
            self.push(
                &with(parent, &[SchemaPathElem::Field(key)]),
                format!("must be a string, got {}", kind(v)),
            );
        }
        s
    }

    fn int_at(&mut self, parent: &Path, obj: &Object, key: &'static str, required: bool) -> Option<i64> {
        let v = self.get(parent, obj, key, required)?;
        let n = v.as_i64();
        if n.is_none() {
            self.push(
                &with(parent, &[SchemaPathElem::Field(key)]),
                format!("must be an integer, got {}", kind(v)),
            );
        }
        n
    }

    fn num_at(&mut self, parent: &Path, obj: &Object, key: &'static str, required: bool) -> Option<f64> {
        let v = self.get(parent, obj, key, required)?;
        let n = v.as_f64().filter(|n| n.is_finite());
        if n.is_none() {
            self.push(
                &with(parent, &[SchemaPathElem::Field(key)]),
                format!("must be a finite number, got {}", kind(v)),
            );
        }
        n
    }

    /// Enum leaves are checked with their own serde impls, so the accepted names stay in one place.
    fn parse_at<T: DeserializeOwned>(
        &mut self,
        parent: &Path,
        obj: &Object,
        key: &'static str,
        required: bool,
    ) -> Option<T> {
        let v = self.get(parent, obj, key, required)?;
        match serde_json::from_value::<T>(v.clone()) {
            Ok(t) => Some(t),
            Err(e) => {
                self.push(&with(parent, &[SchemaPathElem::Field(key)]), e.to_string());
                None
            }
        }
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn is_valid_version(v: &str) -> bool {
    let parts: Vec<&str> = v.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| (1..=3).contains(&p.len()) && p.bytes().all(|b| b.is_ascii_digit()))
}

fn with(base: &[SchemaPathElem], tail: &[SchemaPathElem]) -> Vec<SchemaPathElem> {
    let mut p = Vec::with_capacity(base.len() + tail.len());
    p.extend_from_slice(base);
    p.extend_from_slice(tail);
    p
}

#[cfg(test)]
#[path = "../../tests/unit/schema/validate.rs"]
mod tests;
