//! Canvas: the top-level object a host application drives.
//!
//! A [`Canvas`] owns the [`Ui`], the [`InputHandler`] and the [`Renderer`].
//! The host resizes it, sets its scale, calls [`Canvas::render`] once per
//! frame and feeds device-space input through an
//! [`InputTranslator`](crate::input::InputTranslator).

use tracing::{debug, warn};

use crate::control::{Control, ControlId, Ui};
use crate::error::Result;
use crate::geometry::Size;
use crate::input::{FocusTarget, InputEvent, InputHandler, RoutePool, DEFAULT_POOL_CAPACITY};
use crate::property::Invalidation;
use crate::render::Renderer;
use crate::style::Resources;

// ---------------------------------------------------------------------------
// CanvasConfig
// ---------------------------------------------------------------------------

/// Initial settings of a [`Canvas`].
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    /// Rendering size in device units.
    pub size: Size,
    /// Device units per layout unit.
    pub scale: f32,
    /// Spare route buffers kept by the input handler.
    pub route_pool_capacity: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            size: Size::new(80.0, 24.0),
            scale: 1.0,
            route_pool_capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

impl CanvasConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_route_pool_capacity(mut self, capacity: usize) -> Self {
        self.route_pool_capacity = capacity;
        self
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// Hosts one control tree on one rendering surface.
pub struct Canvas {
    ui: Ui,
    input: InputHandler,
    renderer: Box<dyn Renderer>,
    size: Size,
    scale: f32,
    disposed: bool,
}

impl Canvas {
    /// A canvas with the default configuration.
    pub fn create(renderer: impl Renderer + 'static, resources: Resources) -> Self {
        Self::with_config(renderer, resources, CanvasConfig::default())
    }

    pub fn with_config(
        renderer: impl Renderer + 'static,
        resources: Resources,
        config: CanvasConfig,
    ) -> Self {
        let mut renderer: Box<dyn Renderer> = Box::new(renderer);
        let scale = if valid_scale(config.scale) { config.scale } else { 1.0 };
        renderer.resize(config.size);
        renderer.scale(scale);
        debug!(size = ?config.size, scale, "canvas created");
        Self {
            ui: Ui::new(resources),
            input: InputHandler::new(RoutePool::new(config.route_pool_capacity)),
            renderer,
            size: config.size,
            scale,
            disposed: false,
        }
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut Ui {
        &mut self.ui
    }

    pub fn input(&self) -> &InputHandler {
        &self.input
    }

    pub fn renderer(&self) -> &dyn Renderer {
        &*self.renderer
    }

    /// Add `control` and make it the root in one step.
    pub fn mount<C: Control>(&mut self, control: C) -> Result<ControlId> {
        let id = self.ui.add(control);
        self.set_root(Some(id))?;
        Ok(id)
    }

    /// Replace the root control. The previous root is detached but kept.
    pub fn set_root(&mut self, root: Option<ControlId>) -> Result<()> {
        self.ui.set_root(root)
    }

    pub fn root(&self) -> Option<ControlId> {
        self.ui.root()
    }

    /// Device units per layout unit.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Change the scale. Non-positive or non-finite factors are ignored.
    pub fn set_scale(&mut self, scale: f32) {
        if !valid_scale(scale) {
            warn!(scale, "invalid canvas scale ignored");
            return;
        }
        if scale == self.scale {
            return;
        }
        debug!(from = self.scale, to = scale, "canvas scale");
        self.scale = scale;
        self.renderer.scale(scale);
        self.invalidate();
    }

    /// Surface size in device units.
    pub fn rendering_size(&self) -> Size {
        self.size
    }

    pub fn set_rendering_size(&mut self, size: Size) {
        if size == self.size {
            return;
        }
        debug!(?size, "canvas resized");
        self.size = size;
        self.renderer.resize(size);
        self.invalidate();
    }

    /// Surface size in layout units.
    pub fn layout_size(&self) -> Size {
        self.size.unscale(self.scale)
    }

    /// Flush pending work and bring layout up to date.
    pub fn layout(&mut self) {
        if self.disposed {
            return;
        }
        let size = self.layout_size();
        self.ui.update_layout(size, Some(&mut *self.renderer));
    }

    /// Lay out and paint one frame.
    pub fn render(&mut self) {
        if self.disposed {
            return;
        }
        self.layout();
        self.renderer.begin_frame();
        self.ui.render(&mut *self.renderer);
        self.renderer.end_frame();
    }

    /// Deliver an event in device units. Positions and deltas are divided by
    /// the scale before routing. Returns whether a handler marked it handled.
    pub fn process_input(&mut self, event: InputEvent) -> bool {
        self.handle_input(event.unscale(self.scale))
    }

    /// Deliver an event already in layout units.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if self.disposed {
            return false;
        }
        self.layout();
        self.input.handle(&mut self.ui, event)
    }

    pub fn set_keyboard_focus(&mut self, target: impl Into<FocusTarget>) -> bool {
        self.input.set_keyboard_focus(target)
    }

    pub fn unset_keyboard_focus(&mut self, target: impl Into<FocusTarget>) -> bool {
        self.input.unset_keyboard_focus(target)
    }

    pub fn set_pointer_focus(&mut self, target: impl Into<FocusTarget>) -> bool {
        self.input.set_pointer_focus(&mut self.ui, target)
    }

    pub fn unset_pointer_focus(&mut self, target: impl Into<FocusTarget>) -> bool {
        self.input.unset_pointer_focus(&mut self.ui, target)
    }

    /// Detach the root. Afterwards rendering and input are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if let Err(error) = self.ui.set_root(None) {
            warn!(%error, "detaching root on dispose");
        }
        self.disposed = true;
        debug!("canvas disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn invalidate(&mut self) {
        let root = self.ui.root_visual();
        self.ui.invalidate(root, Invalidation::Measure);
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("ui", &self.ui)
            .field("size", &self.size)
            .field("scale", &self.scale)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

fn valid_scale(scale: f32) -> bool {
    scale.is_finite() && scale > 0.0
}
