//! The poster pipeline: template lookup, input checks, background, photo, text, encoding.
//!
//! [`PosterEngine`] owns shared registries; each compose call works on its own canvas, so calls
//! can run in parallel.

use std::collections::BTreeMap;
use std::sync::Arc;

use image::imageops::FilterType;
use resvg::tiny_skia::Pixmap;

use crate::assets::decode::{LoadedImage, decode_image};
use crate::assets::fonts::{FontInitReport, FontRegistry};
use crate::assets::loader::{ImageLoader, ImageSource};
use crate::foundation::config::EngineOpts;
use crate::foundation::core::{MAX_DIMENSION, PixelSize};
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::canvas::{CanvasFill, CanvasSpec, create_canvas};
use crate::render::encode::{OutputOptions, encode_canvas};
use crate::render::photo::composite_photo;
use crate::render::raster::pixmap_from_rgba;
use crate::render::text::TextRenderer;
use crate::scene::model::{Background, PosterTemplate};
use crate::scene::registry::TemplateRegistry;

/// Named pipeline step reported to progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComposeStage {
    /// Template lookup and input validation.
    LoadingTemplate,
    /// Background fill.
    CreatingBackground,
    /// Photo decode and fit.
    ProcessingPhoto,
    /// Photo layers drawn onto the canvas.
    CompositingPhoto,
    /// Text fields drawn.
    RenderingText,
    /// Resize and encode.
    EncodingOutput,
    /// Finished.
    Done,
}

impl ComposeStage {
    /// Every stage in pipeline order.
    pub const ALL: [ComposeStage; 7] = [
        ComposeStage::LoadingTemplate,
        ComposeStage::CreatingBackground,
        ComposeStage::ProcessingPhoto,
        ComposeStage::CompositingPhoto,
        ComposeStage::RenderingText,
        ComposeStage::EncodingOutput,
        ComposeStage::Done,
    ];

    /// Kebab-case stage name.
    pub fn as_str(self) -> &'static str {
        match self {
            ComposeStage::LoadingTemplate => "loading-template",
            ComposeStage::CreatingBackground => "creating-background",
            ComposeStage::ProcessingPhoto => "processing-photo",
            ComposeStage::CompositingPhoto => "compositing-photo",
            ComposeStage::RenderingText => "rendering-text",
            ComposeStage::EncodingOutput => "encoding-output",
            ComposeStage::Done => "done",
        }
    }

    /// Progress percentage reported when the stage starts.
    pub fn percent(self) -> u8 {
        match self {
            ComposeStage::LoadingTemplate => 0,
            ComposeStage::CreatingBackground => 10,
            ComposeStage::ProcessingPhoto => 30,
            ComposeStage::CompositingPhoto => 50,
            ComposeStage::RenderingText => 70,
            ComposeStage::EncodingOutput => 90,
            ComposeStage::Done => 100,
        }
    }
}

impl std::fmt::Display for ComposeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One poster render request. Buffers are borrowed for the duration of the call.
#[derive(Debug, Clone)]
pub struct ComposeRequest<'a> {
    /// Registered template id.
    pub template_id: &'a str,
    /// Encoded photo bytes.
    pub photo: &'a [u8],
    /// Text values keyed by text field id.
    pub data: &'a BTreeMap<String, String>,
    /// Encoding options.
    pub output: OutputOptions,
    /// Unregistered font families fail instead of falling back. `None` uses the engine default.
    pub strict_fonts: Option<bool>,
}

impl<'a> ComposeRequest<'a> {
    /// Request with default output options.
    pub fn new(template_id: &'a str, photo: &'a [u8], data: &'a BTreeMap<String, String>) -> Self {
        Self {
            template_id,
            photo,
            data,
            output: OutputOptions::default(),
            strict_fonts: None,
        }
    }

    /// Set the output options.
    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    /// Override strict-font mode.
    pub fn with_strict_fonts(mut self, strict: bool) -> Self {
        self.strict_fonts = Some(strict);
        self
    }
}

/// Geometry and size of the produced image.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputMetadata {
    /// Final width.
    pub width: u32,
    /// Final height.
    pub height: u32,
    /// `png` or `jpeg`.
    pub format: String,
    /// Length of the encoded bytes.
    pub byte_size: usize,
}

/// Finished poster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeResult {
    /// Encoded image.
    pub image_bytes: Vec<u8>,
    /// Description of `image_bytes`.
    pub metadata: OutputMetadata,
}

/// Poster rendering engine: shared registries plus per-call composition.
///
/// Calls are independent and may run concurrently; registries are shared read-mostly state.
#[derive(Debug, Clone)]
pub struct PosterEngine {
    fonts: Arc<FontRegistry>,
    templates: Arc<TemplateRegistry>,
    loader: ImageLoader,
    opts: EngineOpts,
}

impl PosterEngine {
    /// Engine over existing registries.
    pub fn new(fonts: Arc<FontRegistry>, templates: Arc<TemplateRegistry>, opts: EngineOpts) -> Self {
        Self {
            loader: ImageLoader::new(&opts),
            fonts,
            templates,
            opts,
        }
    }

    /// Fresh registries loaded with the bundled templates and fonts.
    ///
    /// Missing bundled fonts are reported, not fatal.
    pub fn with_bundled(opts: EngineOpts) -> PosterResult<(Self, FontInitReport)> {
        let fonts = Arc::new(FontRegistry::new());
        let report = fonts.init_bundled_fonts(opts.fonts_dir());
        let templates = Arc::new(TemplateRegistry::with_bundled()?);
        Ok((Self::new(fonts, templates, opts), report))
    }

    /// Replace the image loader (custom fetch transport or limits).
    pub fn with_loader(mut self, loader: ImageLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Font registry.
    pub fn fonts(&self) -> &Arc<FontRegistry> {
        &self.fonts
    }

    /// Template registry.
    pub fn templates(&self) -> &Arc<TemplateRegistry> {
        &self.templates
    }

    /// Image loader.
    pub fn loader(&self) -> &ImageLoader {
        &self.loader
    }

    /// Engine options.
    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    /// Render a poster.
    pub fn compose_poster(&self, req: &ComposeRequest<'_>) -> PosterResult<ComposeResult> {
        self.compose_poster_with_progress(req, |_, _| {})
    }

    /// Render a poster, reporting each stage with its percentage.
    ///
    /// Validation happens before any rendering, first failure wins: unknown template, then every
    /// missing text value at once, then an undecodable photo, then output options.
    #[tracing::instrument(skip_all, fields(template = %req.template_id))]
    pub fn compose_poster_with_progress(
        &self,
        req: &ComposeRequest<'_>,
        mut on_progress: impl FnMut(ComposeStage, u8),
    ) -> PosterResult<ComposeResult> {
        let mut report = |stage: ComposeStage| {
            tracing::debug!(stage = stage.as_str(), percent = stage.percent(), "compose stage");
            on_progress(stage, stage.percent());
        };

        report(ComposeStage::LoadingTemplate);
        let template = self.templates.load_template(req.template_id)?;
        check_required_text(&template, req.data)?;
        let photo = self.decode_photo(req.photo)?;
        req.output.validate()?;

        report(ComposeStage::CreatingBackground);
        let mut canvas = self.build_background(&template)?;

        report(ComposeStage::ProcessingPhoto);
        // Short side capped at twice the largest slot; each field then cover-fits from this.
        let photo = bound_photo(photo, &template);

        report(ComposeStage::CompositingPhoto);
        for field in &template.photos {
            composite_photo(&mut canvas, &photo, field)?;
        }

        report(ComposeStage::RenderingText);
        let strict = req.strict_fonts.unwrap_or(self.opts.strict_fonts);
        let book = self.fonts.font_book(self.opts.system_fonts);
        let renderer = TextRenderer::new(&book, strict);
        for field in &template.text {
            let value = req.data.get(&field.id).map(String::as_str).unwrap_or_default();
            renderer.draw(&mut canvas, field, value)?;
        }

        report(ComposeStage::EncodingOutput);
        let encoded = encode_canvas(&canvas, &req.output)?;

        report(ComposeStage::Done);
        tracing::debug!(
            width = encoded.width,
            height = encoded.height,
            bytes = encoded.bytes.len(),
            "poster composed"
        );
        Ok(ComposeResult {
            metadata: OutputMetadata {
                width: encoded.width,
                height: encoded.height,
                format: encoded.format.as_str().to_owned(),
                byte_size: encoded.bytes.len(),
            },
            image_bytes: encoded.bytes,
        })
    }

    /// Render with each text field's placeholder (or its id) as the value.
    pub fn preview_poster(
        &self,
        template_id: &str,
        photo: &[u8],
        output: OutputOptions,
    ) -> PosterResult<ComposeResult> {
        let template = self.templates.load_template(template_id)?;
        let data = placeholder_data(&template);
        self.compose_poster(&ComposeRequest::new(template_id, photo, &data).with_output(output))
    }

    fn decode_photo(&self, bytes: &[u8]) -> PosterResult<LoadedImage> {
        self.loader.check_len(bytes.len() as u64, "photo")?;
        let photo = decode_image(bytes).map_err(|e| match e {
            PosterError::InvalidInput(msg) => {
                PosterError::invalid_input(format!("photo is not a valid image: {msg}"))
            }
            other => other,
        })?;
        if photo.width() == 0 || photo.height() == 0 {
            return Err(PosterError::invalid_input(
                "photo must have positive width and height",
            ));
        }
        Ok(photo)
    }

    fn build_background(&self, template: &PosterTemplate) -> PosterResult<Pixmap> {
        let size = PixelSize::from_signed(template.canvas.width, template.canvas.height)?;
        let fill = match &template.background {
            Background::Solid { color } => CanvasFill::Solid {
                color: color.clone(),
            },
            Background::Gradient { direction, stops } => CanvasFill::Gradient {
                direction: *direction,
                stops: stops.clone(),
            },
            Background::Image { path } => {
                let loaded = self.loader.load_image(&ImageSource::from_reference(path))?;
                let cover =
                    loaded
                        .image
                        .resize_to_fill(size.width, size.height, FilterType::Lanczos3);
                return pixmap_from_rgba(&cover.to_rgba8());
            }
        };
        create_canvas(&CanvasSpec {
            width: size.width,
            height: size.height,
            fill,
        })
    }
}

/// Text values for a preview: placeholder when present, otherwise the field id.
pub fn placeholder_data(template: &PosterTemplate) -> BTreeMap<String, String> {
    template
        .text
        .iter()
        .map(|f| {
            let value = f
                .placeholder
                .clone()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| f.id.clone());
            (f.id.clone(), value)
        })
        .collect()
}

fn check_required_text(
    template: &PosterTemplate,
    data: &BTreeMap<String, String>,
) -> PosterResult<()> {
    let missing: Vec<&str> = template
        .required_text_ids()
        .filter(|id| data.get(*id).is_none_or(|v| v.trim().is_empty()))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(PosterError::invalid_input(format!(
        "missing required text fields: {}",
        missing.join(", ")
    )))
}

fn bound_photo(photo: LoadedImage, template: &PosterTemplate) -> image::DynamicImage {
    let largest_slot = template
        .photos
        .iter()
        .map(|f| f.size.width.max(f.size.height))
        .max()
        .unwrap_or(1);
    let target = (largest_slot * 2).clamp(1, i64::from(MAX_DIMENSION)) as f64;
    let img = photo.image;
    let short = f64::from(img.width().min(img.height()));
    if short <= target {
        return img;
    }
    let scale = target / short;
    let w = ((f64::from(img.width()) * scale).round() as u32).max(1);
    let h = ((f64::from(img.height()) * scale).round() as u32).max(1);
    img.resize_exact(w, h, FilterType::Triangle)
}

#[cfg(test)]
#[path = "../../tests/unit/session/compose.rs"]
mod tests;
