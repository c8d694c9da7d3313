//! Memoized gradients
//!
//! Gradients are built lazily on first use and then reused every frame. An
//! entry is never rebuilt in place: when the viewport changes the whole map
//! is dropped and the next getter builds a fresh object.

use std::collections::HashMap;
use std::rc::Rc;

use super::canvas::{Canvas, ColorStop};
use crate::error::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Shape {
    Linear,
    Radial,
}

pub struct GradientCache<G> {
    entries: HashMap<(Shape, &'static str), Rc<G>>,
    width: u32,
    height: u32,
}

impl<G> Default for GradientCache<G> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            width: 0,
            height: 0,
        }
    }
}

impl<G> GradientCache<G> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every gradient if the surface size changed. Returns `true` when
    /// the cache was cleared.
    pub fn invalidate(&mut self, width: u32, height: u32) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        self.entries.clear();
        self.width = width;
        self.height = height;
        true
    }

    /// Get or build a linear gradient named `key`
    #[allow(clippy::too_many_arguments)]
    pub fn get_linear<C>(
        &mut self,
        ctx: &mut C,
        key: &'static str,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        stops: &[ColorStop],
    ) -> Result<Rc<G>, RenderError>
    where
        C: Canvas<Gradient = G>,
    {
        if let Some(gradient) = self.entries.get(&(Shape::Linear, key)) {
            return Ok(Rc::clone(gradient));
        }
        let gradient = Rc::new(ctx.create_linear_gradient(x0, y0, x1, y1, stops)?);
        self.entries.insert((Shape::Linear, key), Rc::clone(&gradient));
        Ok(gradient)
    }

    /// Get or build a radial gradient named `key`
    #[allow(clippy::too_many_arguments)]
    pub fn get_radial<C>(
        &mut self,
        ctx: &mut C,
        key: &'static str,
        x0: f32,
        y0: f32,
        r0: f32,
        x1: f32,
        y1: f32,
        r1: f32,
        stops: &[ColorStop],
    ) -> Result<Rc<G>, RenderError>
    where
        C: Canvas<Gradient = G>,
    {
        if let Some(gradient) = self.entries.get(&(Shape::Radial, key)) {
            return Ok(Rc::clone(gradient));
        }
        let gradient = Rc::new(ctx.create_radial_gradient(x0, y0, r0, x1, y1, r1, stops)?);
        self.entries.insert((Shape::Radial, key), Rc::clone(&gradient));
        Ok(gradient)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::headless::RecordingCanvas;

    const STOPS: &[ColorStop] = &[(0.0, "#000"), (1.0, "#fff")];

    #[test]
    fn test_same_size_returns_same_instance() {
        let mut ctx = RecordingCanvas::new(800, 400);
        let mut cache = GradientCache::new();
        cache.invalidate(800, 400);

        let a = cache.get_linear(&mut ctx, "sky", 0.0, 0.0, 0.0, 400.0, STOPS).unwrap();
        let b = cache.get_linear(&mut ctx, "sky", 0.0, 0.0, 0.0, 400.0, STOPS).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(ctx.stats().gradients_created, 1);
    }

    #[test]
    fn test_resize_rebuilds() {
        let mut ctx = RecordingCanvas::new(800, 400);
        let mut cache = GradientCache::new();
        cache.invalidate(800, 400);
        let before = cache.get_radial(&mut ctx, "vignette", 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, STOPS).unwrap();

        assert!(!cache.invalidate(800, 400));
        assert!(cache.invalidate(1024, 600));
        let after = cache.get_radial(&mut ctx, "vignette", 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, STOPS).unwrap();
        assert!(!Rc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_linear_and_radial_keys_do_not_collide() {
        let mut ctx = RecordingCanvas::new(10, 10);
        let mut cache = GradientCache::new();
        cache.get_linear(&mut ctx, "glow", 0.0, 0.0, 1.0, 1.0, STOPS).unwrap();
        cache.get_radial(&mut ctx, "glow", 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, STOPS).unwrap();
        assert_eq!(cache.len(), 2);
    }
}
