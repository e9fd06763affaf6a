//! Tera rendering engine: [`Section`], [`TemplateSet`] and [`Renderer`].
//!
//! # Sections
//!
//! | Section     | Template          | Rendered when                      |
//! |-------------|-------------------|------------------------------------|
//! | Blurb       | `blurb.tera`      | blurb is non-empty                 |
//! | Deal        | `deal.tera`       | deal is non-empty                  |
//! | Summary     | `summary.tera`    | blurb or deal was rendered         |
//! | Media       | `media.tera`      | at least one video                 |
//! | MoreInfo    | `more_info.tera`  | site is non-empty                  |
//! | Troupe      | `troupe.tera`     | always (the final document)        |

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::Tera;

use troupe_core::types::{TroupeKey, TroupeRecord};

use crate::context::{RenderConfig, TroupePage};
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates (include_str! at compile time)
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("blurb.tera", include_str!("templates/blurb.tera")),
    ("deal.tera", include_str!("templates/deal.tera")),
    ("summary.tera", include_str!("templates/summary.tera")),
    ("media.tera", include_str!("templates/media.tera")),
    ("more_info.tera", include_str!("templates/more_info.tera")),
    ("troupe.tera", include_str!("templates/troupe.tera")),
];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut templates = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_lowercase()) else {
            continue;
        };
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents));
    }
    Ok(templates)
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// Named templates making up one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Blurb,
    Deal,
    Summary,
    Media,
    MoreInfo,
    Troupe,
}

impl Section {
    /// All sections in render order; `Troupe` is last because it embeds the rest.
    pub fn all() -> &'static [Section] {
        &[
            Section::Blurb,
            Section::Deal,
            Section::Summary,
            Section::Media,
            Section::MoreInfo,
            Section::Troupe,
        ]
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            Section::Blurb    => "blurb.tera",
            Section::Deal     => "deal.tera",
            Section::Summary  => "summary.tera",
            Section::Media    => "media.tera",
            Section::MoreInfo => "more_info.tera",
            Section::Troupe   => "troupe.tera",
        }
    }
}

// ---------------------------------------------------------------------------
// TemplateSet
// ---------------------------------------------------------------------------

/// Immutable set of section templates, validated on construction.
///
/// Every [`Section`] must have a template or construction fails with
/// [`RenderError::MissingTemplate`].
#[derive(Debug)]
pub struct TemplateSet {
    tera: Tera,
}

impl TemplateSet {
    /// Embedded defaults, overridden by any `*.tera` files in `override_dir`.
    pub fn load(override_dir: Option<&Path>) -> Result<Self, RenderError> {
        let mut templates: HashMap<String, String> = TPLS
            .iter()
            .map(|(name, content)| (name.to_string(), content.to_string()))
            .collect();
        if let Some(dir) = override_dir {
            for (name, content) in load_user_templates(dir)? {
                templates.insert(name, content);
            }
        }
        Self::from_raw(templates)
    }

    /// Build from `(template_name, source)` pairs with no embedded fallback.
    pub fn from_raw<I, N, S>(templates: I) -> Result<Self, RenderError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let items: Vec<(String, String)> = templates
            .into_iter()
            .map(|(n, s)| (n.into(), s.into()))
            .collect();
        let mut tera = Tera::default();
        tera.add_raw_templates(items)?;

        let known: Vec<&str> = tera.get_template_names().collect();
        for section in Section::all() {
            if !known.contains(&section.template_name()) {
                return Err(RenderError::MissingTemplate {
                    name: section.template_name().to_string(),
                });
            }
        }
        Ok(TemplateSet { tera })
    }

    fn render<C: Serialize>(&self, section: Section, ctx: &C) -> Result<String, RenderError> {
        let tera_ctx = tera::Context::from_serialize(ctx)?;
        Ok(self.tera.render(section.template_name(), &tera_ctx)?)
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Rendered optional sections; each is empty when its condition fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sections {
    pub blurb: String,
    pub deal: String,
    pub summary: String,
    pub media: String,
    pub more_info: String,
}

#[derive(Serialize)]
struct DocumentContext<'a> {
    #[serde(flatten)]
    page: &'a TroupePage,
    sections: &'a Sections,
}

/// One fully rendered troupe page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub key: TroupeKey,
    pub content: String,
    pub never_performed: bool,
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Renders merged records into documents.
///
/// Create once and reuse; rendering takes `&self` and never mutates records.
#[derive(Debug)]
pub struct Renderer {
    templates: TemplateSet,
    config: RenderConfig,
}

impl Renderer {
    /// Construct a [`Renderer`] with the embedded templates.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        Ok(Self::with_templates(TemplateSet::load(None)?, config))
    }

    pub fn with_templates(templates: TemplateSet, config: RenderConfig) -> Self {
        Renderer { templates, config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Presentation view for `record`.
    pub fn page(&self, key: &TroupeKey, record: &TroupeRecord) -> TroupePage {
        TroupePage::from_record(key, record, &self.config)
    }

    /// Render the optional sections of `page`.
    pub fn sections(&self, page: &TroupePage) -> Result<Sections, RenderError> {
        let mut sections = Sections::default();
        if page.has_blurb() {
            sections.blurb = self.render_section(Section::Blurb, page, &sections)?;
        }
        if page.has_deal() {
            sections.deal = self.render_section(Section::Deal, page, &sections)?;
        }
        if page.has_blurb() || page.has_deal() {
            sections.summary = self.render_section(Section::Summary, page, &sections)?;
        }
        if page.has_videos() {
            sections.media = self.render_section(Section::Media, page, &sections)?;
        }
        if page.has_site() {
            sections.more_info = self.render_section(Section::MoreInfo, page, &sections)?;
        }
        Ok(sections)
    }

    /// Render the full document for one troupe.
    pub fn render(&self, key: &TroupeKey, record: &TroupeRecord) -> Result<Document, RenderError> {
        let page = self.page(key, record);
        let content = self.render_page(&page)?;
        Ok(Document {
            key: key.clone(),
            content,
            never_performed: page.never_performed,
        })
    }

    /// Render the top-level template for an already-built page.
    pub fn render_page(&self, page: &TroupePage) -> Result<String, RenderError> {
        let sections = self.sections(page)?;
        self.render_section(Section::Troupe, page, &sections)
    }

    fn render_section(
        &self,
        section: Section,
        page: &TroupePage,
        sections: &Sections,
    ) -> Result<String, RenderError> {
        let ctx = DocumentContext { page, sections };
        self.templates.render(section, &ctx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_defaults() -> Vec<(String, String)> {
        TPLS.iter()
            .map(|(n, s)| (n.to_string(), s.to_string()))
            .collect()
    }

    #[test]
    fn embedded_templates_load() {
        TemplateSet::load(None).expect("embedded templates should load");
    }

    #[test]
    fn every_section_has_an_embedded_template() {
        for section in Section::all() {
            assert!(
                TPLS.iter().any(|(n, _)| *n == section.template_name()),
                "no embedded template for {section:?}"
            );
        }
    }

    #[test]
    fn missing_section_is_rejected() {
        let templates = raw_defaults()
            .into_iter()
            .filter(|(n, _)| n != "media.tera");
        let err = TemplateSet::from_raw(templates).unwrap_err();
        assert!(
            matches!(err, RenderError::MissingTemplate { ref name } if name == "media.tera"),
            "got: {err}"
        );
    }

    #[test]
    fn unresolved_placeholder_is_fatal() {
        let mut templates = raw_defaults();
        templates.retain(|(n, _)| n != "troupe.tera");
        templates.push(("troupe.tera".to_string(), "{{ no_such_field }}".to_string()));
        let set = TemplateSet::from_raw(templates).expect("valid syntax");
        let renderer = Renderer::with_templates(set, RenderConfig::new(2012));
        let err = renderer
            .render(&TroupeKey::from("x"), &TroupeRecord::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::Tera(_)), "got: {err}");
    }

    #[test]
    fn sections_empty_for_bare_record() {
        let renderer = Renderer::new(RenderConfig::new(2012)).unwrap();
        let page = renderer.page(&TroupeKey::from("x"), &TroupeRecord::default());
        assert_eq!(renderer.sections(&page).unwrap(), Sections::default());
    }

    #[test]
    fn no_crlf_in_rendered_output() {
        let renderer = Renderer::new(RenderConfig::new(2012)).unwrap();
        let doc = renderer
            .render(&TroupeKey::from("x"), &TroupeRecord::default())
            .unwrap();
        assert!(!doc.content.contains('\r'));
    }
}
