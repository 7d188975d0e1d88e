//! Podium renders tournament posters from declarative templates.
//!
//! A [`PosterTemplate`] describes the canvas, background, photo slots and text slots; a
//! [`PosterEngine`] binds caller data and a photo to a registered template and encodes the result:
//!
//! - Register fonts in a [`FontRegistry`] and templates in a [`TemplateRegistry`]
//! - Build a [`ComposeRequest`] (template id, photo bytes, text values, output options)
//! - Call [`PosterEngine::compose_poster`] or [`PosterEngine::compose_poster_with_progress`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod assets;
pub mod foundation;
pub mod layout;
pub mod render;
pub mod scene;
pub mod schema;
pub mod session;

pub use crate::assets::color::{Rgb, Rgba, hex_to_rgb, is_valid_hex_color, parse_color, parse_rgba};
pub use crate::assets::decode::{ImageMetadata, LoadedImage};
pub use crate::assets::fonts::{
    BUNDLED_FONTS, DEFAULT_FONT, FontInitReport, FontLoadFailure, FontRegistry,
};
pub use crate::assets::loader::{FetchResponse, HttpFetcher, ImageFetcher, ImageLoader, ImageSource};
pub use crate::foundation::config::EngineOpts;
pub use crate::foundation::core::{MAX_DIMENSION, PixelPoint, PixelSize};
pub use crate::foundation::error::{PosterError, PosterResult};
pub use crate::layout::position::{Anchor, resolve_position};
pub use crate::render::canvas::{CanvasFill, CanvasSpec, create_canvas};
pub use crate::render::encode::{OutputFormat, OutputOptions, ResizeFit, ResizeOptions};
pub use crate::scene::model::PosterTemplate;
pub use crate::scene::registry::{TemplateRegistry, TemplateSummary};
pub use crate::schema::validate::{SchemaError, SchemaErrors, validate_template};
pub use crate::session::compose::{
    ComposeRequest, ComposeResult, ComposeStage, OutputMetadata, PosterEngine,
};
