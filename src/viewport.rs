use crate::config::ViewportConfig;
use crate::foundation::core::{Point, Region, Size, Vec2};

/// Zoom and pan state of the canvas view.
///
/// `offset` is the screen position of the world origin, so
/// `screen = world * zoom + offset`.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    zoom: f64,
    offset: Vec2,
    screen: Size,
    cfg: ViewportConfig,
}

impl Viewport {
    /// Create a viewport for a screen of `screen` pixels, showing the world center.
    pub fn new(screen: Size, cfg: ViewportConfig) -> Self {
        let mut v = Self {
            zoom: 1.0,
            offset: Vec2::ZERO,
            screen,
            cfg,
        };
        v.reset();
        v
    }

    /// Current zoom (screen pixels per world unit).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Screen position of the world origin.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Screen size in pixels.
    pub fn screen_size(&self) -> Size {
        self.screen
    }

    /// Update the screen size. The world stays anchored at the top-left.
    pub fn set_screen_size(&mut self, screen: Size) {
        self.screen = screen;
    }

    /// Limits this viewport was configured with.
    pub fn config(&self) -> &ViewportConfig {
        &self.cfg
    }

    /// `true` when the zoom is too small for pointer gestures to map sensibly into the world.
    pub fn accepts_gestures(&self) -> bool {
        self.zoom > self.cfg.gesture_min_zoom
    }

    /// Map a screen point into world space.
    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.offset.x) / self.zoom,
            (p.y - self.offset.y) / self.zoom,
        )
    }

    /// Map a world point into screen space.
    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(
            p.x * self.zoom + self.offset.x,
            p.y * self.zoom + self.offset.y,
        )
    }

    /// World point under the center of the screen.
    pub fn world_center(&self) -> Point {
        self.screen_to_world(Point::new(self.screen.width / 2.0, self.screen.height / 2.0))
    }

    /// World region currently on screen.
    pub fn visible_world(&self) -> Region {
        let tl = self.screen_to_world(Point::ORIGIN);
        Region::new(
            tl.x,
            tl.y,
            self.screen.width / self.zoom,
            self.screen.height / self.zoom,
        )
    }

    /// Translate the view by a screen-space delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor`, keeping the world point under `anchor` fixed on screen.
    ///
    /// Returns `false` when the factor is unusable (non-finite or `<= 0`).
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) -> bool {
        self.zoom_between(anchor, anchor, factor)
    }

    /// Zoom by `factor` around `from` and move that world point to `to`.
    ///
    /// This is the pinch update: the world point under the previous pinch center ends up under
    /// the current one, which pans and zooms in a single step.
    pub fn zoom_between(&mut self, from: Point, to: Point, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let world = self.screen_to_world(from);
        let zoom = self.clamp_zoom(self.zoom * factor);
        self.zoom = zoom;
        self.offset = Vec2::new(to.x - world.x * zoom, to.y - world.y * zoom);
        true
    }

    /// Apply a wheel delta at `anchor`. Deltas inside the dead zone are ignored.
    pub fn wheel(&mut self, anchor: Point, delta_y: f64) -> bool {
        if !delta_y.is_finite() || delta_y.abs() < self.cfg.wheel_dead_zone {
            return false;
        }
        let factor = (-delta_y * self.cfg.wheel_sensitivity).exp();
        self.zoom_at(anchor, factor)
    }

    /// Restore the initial view: the world center in the middle of the screen, zoomed so that
    /// `initial_view_width` world units span the screen width.
    pub fn reset(&mut self) {
        let zoom = self.clamp_zoom(self.screen.width / self.cfg.initial_view_width);
        let half_world = self.cfg.world_size / 2.0;
        self.zoom = zoom;
        self.offset = Vec2::new(
            self.screen.width / 2.0 - half_world * zoom,
            self.screen.height / 2.0 - half_world * zoom,
        );
    }

    /// Fit `bounds` using the configured padding and zoom cap; `None` resets the view.
    pub fn fit_to_content(&mut self, bounds: Option<Region>) {
        self.fit_to(bounds, self.cfg.fit_padding, self.cfg.fit_max_zoom);
    }

    /// Fit `bounds` padded by `padding` on each side into the screen, never zooming past
    /// `max_zoom`, and center the view on it. `None` resets the view.
    pub fn fit_to(&mut self, bounds: Option<Region>, padding: f64, max_zoom: f64) {
        let Some(bounds) = bounds else {
            self.reset();
            return;
        };
        let scale_x = self.screen.width / (bounds.width + padding * 2.0);
        let scale_y = self.screen.height / (bounds.height + padding * 2.0);
        let fit = scale_x.min(scale_y).min(max_zoom);
        if !fit.is_finite() || fit <= 0.0 {
            return;
        }
        let zoom = self.clamp_zoom(fit);
        let center = bounds.center();
        self.zoom = zoom;
        self.offset = Vec2::new(
            self.screen.width / 2.0 - center.x * zoom,
            self.screen.height / 2.0 - center.y * zoom,
        );
        tracing::debug!(zoom, ?center, "viewport fit to content");
    }

    fn clamp_zoom(&self, z: f64) -> f64 {
        if z.is_nan() {
            return self.cfg.min_zoom;
        }
        z.clamp(self.cfg.min_zoom, self.cfg.max_zoom)
    }
}

#[cfg(test)]
#[path = "../tests/unit/viewport.rs"]
mod tests;
