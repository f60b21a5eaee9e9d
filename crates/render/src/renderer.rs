use glam::Vec3;
use ringflow_anim::AnimationContext;
use std::fmt::Write;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            target: Vec3::NEG_Z,
            fov_degrees: 75.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads animation state and a view configuration, then
/// produces output. It never mutates the rings.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given animation state and view.
    fn render(&self, anim: &AnimationContext, view: &RenderView) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable listing of the active rings. Used by the CLI
/// and by tests of the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, anim: &AnimationContext, view: &RenderView) -> String {
        tracing::trace!(
            frame = anim.frame_count(),
            active = anim.active_count(),
            "debug text render"
        );
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Rings (frame={}, active={}/{}) ===",
            anim.frame_count(),
            anim.active_count(),
            anim.rings().len()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        );

        for ring in anim.visible_rings() {
            let _ = writeln!(
                out,
                "  [{}] {} z={:.3} opacity={:.3} scale={:.3}",
                ring.index,
                ring.color,
                ring.transform.position.z,
                ring.opacity,
                ring.transform.scale.x
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringflow_anim::AnimationConfig;

    fn context() -> AnimationContext {
        AnimationContext::new(AnimationConfig::default()).unwrap()
    }

    #[test]
    fn debug_renderer_before_first_frame() {
        let anim = context();
        let output = DebugTextRenderer::new().render(&anim, &RenderView::default());

        assert!(output.contains("frame=0"));
        assert!(output.contains("active=0/4"));
        assert!(!output.contains("opacity="));
    }

    #[test]
    fn debug_renderer_lists_only_active_rings() {
        let mut anim = context();
        anim.frame(0.0);
        let interval = anim.config().interval_ms();
        anim.frame(interval);

        let output = DebugTextRenderer::new().render(&anim, &RenderView::default());
        assert!(output.contains("active=2/4"));
        assert!(output.contains("[0] #00ff00"));
        assert!(output.contains("[1] #ff0000"));
        assert!(!output.contains("#0000ff"));
        assert_eq!(output.matches("opacity=").count(), 2);
    }

    #[test]
    fn render_view_default_looks_down_negative_z() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 75.0);
        assert_eq!(view.eye, Vec3::ZERO);
        assert!(view.target.z < 0.0);
    }
}
