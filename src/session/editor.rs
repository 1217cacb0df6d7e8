use crate::assets::loader::ImageLoader;
use crate::assets::source::ImageSource;
use crate::command::parser::CommandParser;
use crate::export::pipeline::{ExportFormat, ExportReport, Exporter};
use crate::foundation::config::EditorConfig;
use crate::foundation::core::{Rgba8, now_millis};
use crate::foundation::error::{CarouselError, CarouselResult};
use crate::history::manager::History;
use crate::history::snapshot::Snapshot;
use crate::model::document::Document;
use crate::model::persist::{DocumentFile, SharePayload};
use crate::model::platform::{Orientation, Platform};
use crate::model::slide::{
    BackgroundKind, GradientSpec, Layout, LogoLayer, Slide, SlideId, TextField,
};
use crate::render::compositor::{RenderReport, SlideRenderer};
use crate::render::cpu::PixmapSurface;
use crate::render::style::RenderStyle;
use crate::render::surface::{FrameRGBA, Surface};
use crate::render::text::FontBook;

/// How parsed command slides enter the document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApplyMode {
    /// Discard existing slides and select the first parsed one.
    #[default]
    Replace,
    /// Keep existing slides and add parsed ones after them, up to the cap.
    Append,
}

/// What [`EditorSession::apply_commands`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Slides that entered the document.
    pub added: usize,
    /// Parsed slides discarded because of the cap.
    pub dropped: usize,
    /// Typography overrides applied to the session style.
    pub overrides: usize,
}

/// Identity of a preview render request.
///
/// A render that finishes after the user moved on is stale: check
/// [`EditorSession::is_ticket_current`] before presenting it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderTicket {
    slide: Option<SlideId>,
    generation: u64,
}

/// One editing session: the live document, its undo history and the rendering resources.
///
/// Every mutating operation records the pre-mutation state and drops the redo branch before
/// changing anything. A rejected mutation leaves both document and history untouched.
/// Navigation and export do not create history entries.
pub struct EditorSession {
    doc: Document,
    history: History,
    config: EditorConfig,
    style: RenderStyle,
    loader: ImageLoader,
    fonts: FontBook,
    generation: u64,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("slides", &self.doc.len())
            .field("current_index", &self.doc.current_index)
            .field("history", &self.history.len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Session for `config`, resolving fonts from `config.fonts`.
    pub fn new(config: EditorConfig) -> CarouselResult<Self> {
        let fonts = FontBook::from_config(&config.fonts)?;
        Self::with_fonts(config, fonts)
    }

    /// Session for `config` drawing text with `fonts`.
    pub fn with_fonts(config: EditorConfig, fonts: FontBook) -> CarouselResult<Self> {
        config.validate()?;
        let doc = Document::new(config.max_slides);
        let mut history = History::new(config.history_capacity);
        history.commit(Snapshot::capture(&doc));
        Ok(Self {
            doc,
            history,
            style: config.style.clone(),
            loader: ImageLoader::new(config.assets_root.clone()),
            fonts,
            config,
            generation: 0,
        })
    }

    /// Live document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Configuration the session was built with.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Current render style, including typography overrides from command text.
    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Undo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Shared image cache.
    pub fn loader(&self) -> &ImageLoader {
        &self.loader
    }

    /// Resolved fonts.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    fn live_differs_from_history(&self) -> bool {
        self.history
            .current()
            .is_none_or(|s| !s.same_state(&Snapshot::capture(&self.doc)))
    }

    /// Run `op` against a working copy; on success record the pre-state and adopt the copy.
    fn mutate<T>(
        &mut self,
        what: &'static str,
        op: impl FnOnce(&mut Document) -> CarouselResult<T>,
    ) -> CarouselResult<T> {
        let mut next = self.doc.clone();
        let out = op(&mut next)?;
        let recorded = self.history.commit(Snapshot::capture(&self.doc));
        self.history.discard_redo();
        tracing::debug!(op = what, recorded, depth = self.history.len(), "document mutation");
        self.doc = next;
        self.generation += 1;
        Ok(out)
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.doc = snapshot.to_document();
        self.doc.clamp_selection();
        self.generation += 1;
    }

    /// Whether [`EditorSession::undo`] would change the document.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || (!self.history.is_empty() && self.live_differs_from_history())
    }

    /// Whether [`EditorSession::redo`] would change the document.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Revert the last mutation. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.live_differs_from_history() {
            self.history.commit(Snapshot::capture(&self.doc));
        }
        match self.history.undo().cloned() {
            Some(s) => {
                self.restore(s);
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone mutation. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo().cloned() {
            Some(s) => {
                self.restore(s);
                true
            }
            None => false,
        }
    }

    /// Append a starter slide and select it.
    pub fn add_slide(&mut self) -> CarouselResult<usize> {
        self.mutate("add_slide", Document::add_slide)
    }

    /// Duplicate slide `index` and select the copy.
    pub fn duplicate_slide(&mut self, index: usize) -> CarouselResult<usize> {
        self.mutate("duplicate_slide", |d| d.duplicate_slide(index))
    }

    /// Delete slide `index`.
    pub fn delete_slide(&mut self, index: usize) -> CarouselResult<Slide> {
        self.mutate("delete_slide", |d| d.delete_slide(index))
    }

    /// Remove every slide.
    pub fn clear_all(&mut self) -> CarouselResult<()> {
        self.mutate("clear_all", |d| {
            d.clear_all();
            Ok(())
        })
    }

    /// Select slide `index`.
    pub fn select_slide(&mut self, index: usize) -> CarouselResult<()> {
        self.doc.select_slide(index)
    }

    /// Select the next slide, wrapping.
    pub fn next_slide(&mut self) {
        self.doc.next_slide();
    }

    /// Select the previous slide, wrapping.
    pub fn previous_slide(&mut self) {
        self.doc.prev_slide();
    }

    /// Switch platform, optionally resizing the selected slide to the preset.
    pub fn set_platform(
        &mut self,
        platform: Platform,
        apply_to_current: bool,
    ) -> CarouselResult<()> {
        self.mutate("set_platform", |d| {
            d.set_platform(platform, apply_to_current);
            Ok(())
        })
    }

    /// Overwrite the active platform's size.
    pub fn set_custom_dimensions(&mut self, width: u32, height: u32) -> CarouselResult<()> {
        self.mutate("set_custom_dimensions", |d| d.set_custom_dimensions(width, height))
    }

    /// Apply an orientation shortcut to the active platform.
    pub fn apply_orientation(&mut self, orientation: Orientation) -> CarouselResult<()> {
        self.mutate("apply_orientation", |d| d.apply_orientation(orientation))
    }

    /// Set one text layer of the selected slide.
    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) -> CarouselResult<()> {
        let value = value.into();
        self.mutate("set_text", |d| d.set_text(field, value))
    }

    /// Switch the active background variant.
    pub fn set_background_kind(&mut self, kind: BackgroundKind) -> CarouselResult<()> {
        self.mutate("set_background_kind", |d| d.set_background_kind(kind))
    }

    /// Set a flat background color.
    pub fn set_background_color(&mut self, color: Rgba8) -> CarouselResult<()> {
        self.mutate("set_background_color", |d| d.set_background_color(color))
    }

    /// Set a gradient background.
    pub fn set_gradient(&mut self, gradient: GradientSpec) -> CarouselResult<()> {
        self.mutate("set_gradient", |d| d.set_background_gradient(gradient))
    }

    /// Set an image background.
    pub fn set_background_image(&mut self, source: ImageSource) -> CarouselResult<()> {
        self.mutate("set_background_image", |d| d.set_background_image(source))
    }

    /// Drop the image background in favor of the flat color.
    pub fn remove_background_image(&mut self) -> CarouselResult<()> {
        self.mutate("remove_background_image", Document::remove_background_image)
    }

    /// Set the selected slide's layout.
    pub fn set_layout(&mut self, layout: Layout) -> CarouselResult<()> {
        self.mutate("set_layout", |d| d.set_layout(layout))
    }

    /// Replace the shared logo.
    pub fn set_logo(&mut self, logo: LogoLayer) -> CarouselResult<()> {
        self.mutate("set_logo", |d| d.set_logo(logo))
    }

    /// Set or clear the selected slide's own logo.
    pub fn set_slide_logo(&mut self, logo: Option<LogoLayer>) -> CarouselResult<()> {
        self.mutate("set_slide_logo", |d| d.set_slide_logo(logo))
    }

    /// Parse command text and put the slides into the document.
    ///
    /// Text without slide blocks is a [`CarouselError::Validation`] and changes nothing. Appending
    /// to a full document is a [`CarouselError::Capacity`]. Typography overrides in the text
    /// update the session style; they are not part of the document and not undone.
    #[tracing::instrument(skip(self, text), fields(bytes = text.len()))]
    pub fn apply_commands(
        &mut self,
        text: &str,
        mode: ApplyMode,
    ) -> CarouselResult<ApplyOutcome> {
        let script = CommandParser::new(self.doc.max_slides())
            .with_id_base(now_millis())
            .parse(text);
        if script.is_empty() {
            return Err(CarouselError::validation(
                "no slides found; start each slide with \"## SLIDE\" followed by key: value lines",
            ));
        }

        let parsed = script.slides.len();
        let (added, dropped) = self.mutate("apply_commands", |d| match mode {
            ApplyMode::Replace => {
                let dropped = d.replace_slides(script.slides.clone());
                Ok((parsed - dropped, dropped))
            }
            ApplyMode::Append => {
                if d.len() >= d.max_slides() {
                    return Err(CarouselError::capacity(d.max_slides()));
                }
                let mut slides = script.slides.clone();
                for i in 0..slides.len() {
                    let id = SlideId::fresh(d.slides.iter().chain(&slides[..i]));
                    slides[i].id = id;
                }
                let dropped = d.append_slides(slides);
                d.current_index = d.len() - 1;
                Ok((parsed - dropped, dropped))
            }
        })?;

        script.apply_overrides(&mut self.style.typography);
        let dropped = dropped + script.dropped;
        if dropped > 0 {
            tracing::warn!(dropped, "command slides beyond the cap were discarded");
        }
        Ok(ApplyOutcome {
            added,
            dropped,
            overrides: script.overrides.len(),
        })
    }

    /// Persistable form of the document, stamped with the current time.
    pub fn document_file(&self) -> DocumentFile {
        DocumentFile::capture(&self.doc, Some(now_millis()))
    }

    /// Replace the document with `file`, keeping its selection where valid.
    pub fn load_document(&mut self, file: DocumentFile) -> CarouselResult<()> {
        self.mutate("load_document", |d| {
            file.apply_to(d);
            Ok(())
        })
    }

    /// Restore an autosave unless it is older than the configured maximum age.
    /// Returns whether it was loaded.
    pub fn restore_autosave(&mut self, json: &str) -> CarouselResult<bool> {
        let file = DocumentFile::from_json(json)?;
        if !file.is_fresh(now_millis(), self.config.autosave_max_age_ms) {
            tracing::info!(saved_at = ?file.timestamp, "ignoring stale autosave");
            return Ok(false);
        }
        self.load_document(file)?;
        Ok(true)
    }

    /// Share payload for the current document, expiring after the configured lifetime.
    pub fn share_payload(&self) -> SharePayload {
        SharePayload::create(&self.doc, now_millis(), self.config.share_ttl_ms)
    }

    /// Share payload encoded as a link token.
    pub fn encode_share_token(&self) -> CarouselResult<String> {
        self.share_payload().to_token()
    }

    /// Load a shared document and select its first slide.
    ///
    /// An expired payload fails with [`CarouselError::Expired`] and leaves the document as is.
    pub fn load_shared(&mut self, payload: SharePayload) -> CarouselResult<()> {
        payload.check_fresh(now_millis())?;
        self.mutate("load_shared", |d| {
            payload.document.apply_to(d);
            d.current_index = 0;
            Ok(())
        })
    }

    /// Decode a link token and load it like [`EditorSession::load_shared`].
    pub fn load_share_token(&mut self, token: &str) -> CarouselResult<()> {
        let payload = SharePayload::from_token(token)?;
        self.load_shared(payload)
    }

    /// Ticket for a preview render of the current state.
    pub fn render_ticket(&self) -> RenderTicket {
        RenderTicket {
            slide: self.doc.current_slide().map(|s| s.id),
            generation: self.generation,
        }
    }

    /// Whether a render issued with `ticket` still shows the current state.
    pub fn is_ticket_current(&self, ticket: &RenderTicket) -> bool {
        *ticket == self.render_ticket()
    }

    /// Draw the selected slide, or the empty-state placeholder, onto `surface`.
    pub fn render_current_into(&self, surface: &mut dyn Surface) -> RenderReport {
        let renderer = SlideRenderer::new(&self.loader, &self.style);
        match self.doc.current_slide() {
            Some(slide) => renderer.render_slide(surface, slide, self.doc.logo_for(slide)),
            None => {
                renderer.render_empty_state(surface);
                RenderReport::default()
            }
        }
    }

    /// Render the selected slide at its canvas size, or the placeholder at the platform size.
    pub fn render_current(&self) -> CarouselResult<(FrameRGBA, RenderReport)> {
        let size = match self.doc.current_slide() {
            Some(slide) => self.doc.canvas_size_for(slide),
            None => self.doc.platform_size(),
        };
        let mut surface = PixmapSurface::new(size, &self.fonts)?;
        let report = self.render_current_into(&mut surface);
        Ok((surface.frame(), report))
    }

    /// Exporter configured with this session's resources, logo and quality.
    pub fn exporter(&self) -> Exporter<'_> {
        Exporter::new(&self.loader, &self.fonts, &self.style)
            .with_logo(self.doc.logo.clone())
            .with_jpeg_quality(self.config.jpeg_quality)
    }

    /// Export the selected slide.
    pub fn export_current(&self, format: ExportFormat) -> CarouselResult<ExportReport> {
        let slide = self
            .doc
            .current_slide()
            .ok_or_else(|| CarouselError::validation("no slides to export"))?;
        self.exporter().export_one(
            slide,
            self.doc.current_index,
            self.doc.platform,
            self.doc.platform_size(),
            format,
        )
    }

    /// Export every slide.
    pub fn export_all(&self, format: ExportFormat) -> CarouselResult<ExportReport> {
        self.exporter().export_all(
            &self.doc.slides,
            self.doc.platform,
            self.doc.platform_size(),
            format,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
