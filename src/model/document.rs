use crate::assets::source::ImageSource;
use crate::foundation::core::{Rgba8, Size};
use crate::foundation::error::{CarouselError, CarouselResult};
use crate::model::platform::{Orientation, Platform, PlatformPresets};
use crate::model::slide::{
    BackgroundKind, GradientSpec, Layout, LogoLayer, Slide, SlideId, TextField,
};

/// Full editable state: ordered slides, selection, target platform and the shared logo.
///
/// Every mutation that would grow the document past `max_slides` fails with
/// [`CarouselError::Capacity`] before touching any state. The bulk paths
/// ([`Document::replace_slides`], [`Document::append_slides`]) truncate instead.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Document {
    /// Slides in presentation order.
    pub slides: Vec<Slide>,
    /// Selected slide; always `< slides.len()` when non-empty, `0` when empty.
    pub current_index: usize,
    /// Active platform.
    pub platform: Platform,
    /// Preset table, including user overrides.
    pub presets: PlatformPresets,
    /// Logo shared by slides without their own override.
    pub logo: LogoLayer,
    #[serde(skip, default = "default_max_slides")]
    max_slides: usize,
}

fn default_max_slides() -> usize {
    15
}

impl Default for Document {
    fn default() -> Self {
        Self::new(default_max_slides())
    }
}

impl Document {
    /// Empty document with the given slide cap.
    pub fn new(max_slides: usize) -> Self {
        Self {
            slides: Vec::new(),
            current_index: 0,
            platform: Platform::default(),
            presets: PlatformPresets::default(),
            logo: LogoLayer::default(),
            max_slides,
        }
    }

    /// Slide cap.
    pub fn max_slides(&self) -> usize {
        self.max_slides
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the document holds no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Selected slide, `None` in the empty state.
    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.get(self.current_index)
    }

    /// Size of the active platform preset.
    pub fn platform_size(&self) -> Size {
        self.presets.get(self.platform)
    }

    /// Size `slide` renders at in this document.
    pub fn canvas_size_for(&self, slide: &Slide) -> Size {
        slide.effective_size(self.platform_size())
    }

    /// Logo `slide` is drawn with: its own override, else the shared one.
    pub fn logo_for<'a>(&'a self, slide: &'a Slide) -> &'a LogoLayer {
        slide.logo.as_ref().unwrap_or(&self.logo)
    }

    fn ensure_room(&self) -> CarouselResult<()> {
        if self.slides.len() >= self.max_slides {
            return Err(CarouselError::capacity(self.max_slides));
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> CarouselResult<()> {
        if index >= self.slides.len() {
            return Err(CarouselError::validation(format!(
                "slide index {index} out of range (document has {} slides)",
                self.slides.len()
            )));
        }
        Ok(())
    }

    fn current_mut(&mut self) -> CarouselResult<&mut Slide> {
        let index = self.current_index;
        self.slides
            .get_mut(index)
            .ok_or_else(|| CarouselError::validation("no slide is selected"))
    }

    /// Append a starter slide and select it. Returns its index.
    pub fn add_slide(&mut self) -> CarouselResult<usize> {
        self.ensure_room()?;
        let slide = Slide::starter(SlideId::fresh(&self.slides));
        self.slides.push(slide);
        self.current_index = self.slides.len() - 1;
        Ok(self.current_index)
    }

    /// Insert a deep copy of slide `index` right after it, with a new id, and select the copy.
    pub fn duplicate_slide(&mut self, index: usize) -> CarouselResult<usize> {
        self.check_index(index)?;
        self.ensure_room()?;
        let mut copy = self.slides[index].clone();
        copy.id = SlideId::fresh(&self.slides);
        self.slides.insert(index + 1, copy);
        self.current_index = index + 1;
        Ok(self.current_index)
    }

    /// Remove slide `index`. The selection follows the slide it pointed at, clamped to the new
    /// range; removing the last slide leaves an empty document at index 0.
    pub fn delete_slide(&mut self, index: usize) -> CarouselResult<Slide> {
        self.check_index(index)?;
        let removed = self.slides.remove(index);
        if self.slides.is_empty() {
            self.current_index = 0;
        } else {
            if index < self.current_index {
                self.current_index -= 1;
            }
            self.current_index = self.current_index.min(self.slides.len() - 1);
        }
        Ok(removed)
    }

    /// Remove every slide.
    pub fn clear_all(&mut self) {
        self.slides.clear();
        self.current_index = 0;
    }

    /// Select slide `index`.
    pub fn select_slide(&mut self, index: usize) -> CarouselResult<()> {
        self.check_index(index)?;
        self.current_index = index;
        Ok(())
    }

    /// Select the next slide, wrapping to the first.
    pub fn next_slide(&mut self) {
        if !self.slides.is_empty() {
            self.current_index = (self.current_index + 1) % self.slides.len();
        }
    }

    /// Select the previous slide, wrapping to the last.
    pub fn prev_slide(&mut self) {
        if !self.slides.is_empty() {
            let n = self.slides.len();
            self.current_index = (self.current_index + n - 1) % n;
        }
    }

    /// Switch the active platform.
    ///
    /// With `apply_to_current`, the selected slide adopts the preset size as its own override.
    /// Switching to [`Platform::Custom`] only changes the identifier.
    pub fn set_platform(&mut self, platform: Platform, apply_to_current: bool) {
        self.platform = platform;
        if platform == Platform::Custom || !apply_to_current {
            return;
        }
        let size = self.presets.get(platform);
        if let Some(slide) = self.slides.get_mut(self.current_index) {
            slide.width = Some(size.width);
            slide.height = Some(size.height);
        }
    }

    /// Overwrite the active platform's size.
    pub fn set_custom_dimensions(&mut self, width: u32, height: u32) -> CarouselResult<()> {
        let size = Size::new(width, height)?;
        self.presets.set(self.platform, size)
    }

    /// Write an orientation shortcut's size onto the active platform slot.
    pub fn apply_orientation(&mut self, orientation: Orientation) -> CarouselResult<()> {
        match orientation.size() {
            Some(size) => self.presets.set(self.platform, size),
            None => Ok(()),
        }
    }

    /// Set one text field of the selected slide.
    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) -> CarouselResult<()> {
        *self.current_mut()?.text.get_mut(field) = value.into();
        Ok(())
    }

    /// Switch the selected slide's active background variant.
    pub fn set_background_kind(&mut self, kind: BackgroundKind) -> CarouselResult<()> {
        self.current_mut()?.background.kind = kind;
        Ok(())
    }

    /// Set the flat color and make it active.
    pub fn set_background_color(&mut self, color: Rgba8) -> CarouselResult<()> {
        let bg = &mut self.current_mut()?.background;
        bg.color = color;
        bg.kind = BackgroundKind::Color;
        Ok(())
    }

    /// Set the gradient and make it active.
    pub fn set_background_gradient(&mut self, gradient: GradientSpec) -> CarouselResult<()> {
        let bg = &mut self.current_mut()?.background;
        bg.gradient = gradient;
        bg.kind = BackgroundKind::Gradient;
        Ok(())
    }

    /// Set the background image and make it active.
    pub fn set_background_image(&mut self, source: ImageSource) -> CarouselResult<()> {
        let bg = &mut self.current_mut()?.background;
        bg.image = Some(source);
        bg.kind = BackgroundKind::Image;
        Ok(())
    }

    /// Drop the background image and fall back to the flat color.
    pub fn remove_background_image(&mut self) -> CarouselResult<()> {
        let bg = &mut self.current_mut()?.background;
        bg.image = None;
        bg.kind = BackgroundKind::Color;
        Ok(())
    }

    /// Set the selected slide's layout preset.
    pub fn set_layout(&mut self, layout: Layout) -> CarouselResult<()> {
        self.current_mut()?.layout = layout;
        Ok(())
    }

    /// Replace the shared logo.
    pub fn set_logo(&mut self, logo: LogoLayer) -> CarouselResult<()> {
        logo.validate()?;
        self.logo = logo;
        Ok(())
    }

    /// Set or clear the selected slide's own logo.
    pub fn set_slide_logo(&mut self, logo: Option<LogoLayer>) -> CarouselResult<()> {
        if let Some(l) = &logo {
            l.validate()?;
        }
        self.current_mut()?.logo = logo;
        Ok(())
    }

    /// Replace all slides, truncating to the cap. Selects the first slide.
    /// Returns how many slides were dropped.
    pub fn replace_slides(&mut self, mut slides: Vec<Slide>) -> usize {
        let dropped = slides.len().saturating_sub(self.max_slides);
        slides.truncate(self.max_slides);
        self.slides = slides;
        self.current_index = 0;
        dropped
    }

    /// Append slides up to the cap, keeping the selection. Returns how many were dropped.
    pub fn append_slides(&mut self, slides: Vec<Slide>) -> usize {
        let room = self.max_slides.saturating_sub(self.slides.len());
        let dropped = slides.len().saturating_sub(room);
        self.slides.extend(slides.into_iter().take(room));
        dropped
    }

    /// Re-establish the selection invariant after a bulk field assignment.
    pub(crate) fn clamp_selection(&mut self) {
        if self.slides.is_empty() {
            self.current_index = 0;
        } else {
            self.current_index = self.current_index.min(self.slides.len() - 1);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/document.rs"]
mod tests;
