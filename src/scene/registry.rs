//! Registered templates, keyed by id.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::foundation::error::{PosterError, PosterResult};
use crate::scene::model::PosterTemplate;
use crate::schema::validate::validate_template;

/// Templates compiled into the crate: `(id, JSON source)`.
pub const BUNDLED_TEMPLATES: &[(&str, &str)] = &[
    ("classic", include_str!("../../templates/classic.json")),
    ("modern", include_str!("../../templates/modern.json")),
];

/// Listing entry; template bodies are not exposed through listings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TemplateSummary {
    /// Template id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
}

/// Id → validated template store.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: RwLock<HashMap<String, Arc<PosterTemplate>>>,
}

impl TemplateRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with [`BUNDLED_TEMPLATES`].
    pub fn with_bundled() -> PosterResult<Self> {
        let reg = Self::new();
        reg.register_bundled_templates()?;
        Ok(reg)
    }

    /// Validate and store `template`, replacing any entry with the same id.
    pub fn register_template(&self, template: PosterTemplate) -> PosterResult<()> {
        template.validate()?;
        let id = template.id.clone();
        let replaced = self
            .write_map()
            .insert(id.clone(), Arc::new(template))
            .is_some();
        tracing::debug!(template = %id, replaced, "registered template");
        Ok(())
    }

    /// Validate and store an untyped template document.
    pub fn register_template_value(&self, value: &serde_json::Value) -> PosterResult<()> {
        let template = validate_template(value)?;
        self.register_template(template)
    }

    /// Load, validate and store a JSON template file.
    pub fn register_template_file(&self, path: impl AsRef<Path>) -> PosterResult<String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PosterError::invalid_input(format!("read template '{}': {e}", path.display()))
        })?;
        let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            PosterError::invalid_input(format!("parse template '{}': {e}", path.display()))
        })?;
        let template = validate_template(&value)?;
        let id = template.id.clone();
        self.register_template(template)?;
        Ok(id)
    }

    /// Register every entry of [`BUNDLED_TEMPLATES`].
    pub fn register_bundled_templates(&self) -> PosterResult<()> {
        for (id, source) in BUNDLED_TEMPLATES {
            let value: serde_json::Value = serde_json::from_str(source).map_err(|e| {
                PosterError::invalid_input(format!("bundled template '{id}': {e}"))
            })?;
            self.register_template_value(&value)?;
        }
        Ok(())
    }

    /// Template registered under `id`.
    pub fn load_template(&self, id: &str) -> PosterResult<Arc<PosterTemplate>> {
        self.read_map()
            .get(id)
            .cloned()
            .ok_or_else(|| PosterError::template_not_found(id))
    }

    /// Summaries of every registered template, sorted by id.
    pub fn list_templates(&self) -> Vec<TemplateSummary> {
        let mut out: Vec<TemplateSummary> = self
            .read_map()
            .values()
            .map(|t| TemplateSummary {
                id: t.id.clone(),
                name: t.name.clone(),
                description: t.description.clone(),
            })
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    /// Remove every template.
    pub fn clear_templates(&self) {
        self.write_map().clear();
        tracing::debug!("cleared template registry");
    }

    fn read_map(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<PosterTemplate>>> {
        self.templates.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_map(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<PosterTemplate>>> {
        self.templates.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/registry.rs"]
mod tests;
