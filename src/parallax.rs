use crate::intersection::Viewport;

/// Largest translation, in px, applied to the hero's background layer.
pub const MAX_LAYER_SHIFT: f64 = 24.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayerOffset {
    pub x: f64,
    pub y: f64,
}

impl LayerOffset {
    pub fn css_vars(&self) -> String {
        format!("--parallax-x: {:.2}px; --parallax-y: {:.2}px;", self.x, self.y)
    }
}

/// Maps a pointer position to a layer shift that moves against the pointer,
/// reaching `max_shift` at the viewport edges.
pub fn layer_offset(
    pointer_x: f64,
    pointer_y: f64,
    viewport: Viewport,
    max_shift: f64,
) -> LayerOffset {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return LayerOffset::default();
    }

    let axis = |position: f64, extent: f64| {
        let centred = (position / extent - 0.5) * 2.0;
        -centred.clamp(-1.0, 1.0) * max_shift
    };

    LayerOffset {
        x: axis(pointer_x, viewport.width),
        y: axis(pointer_y, viewport.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    #[test]
    fn centre_is_at_rest() {
        assert_eq!(
            layer_offset(500.0, 400.0, VIEWPORT, MAX_LAYER_SHIFT),
            LayerOffset { x: 0.0, y: 0.0 }
        );
    }

    #[test]
    fn layer_moves_against_the_pointer_and_stays_bounded() {
        let corner = layer_offset(0.0, 800.0, VIEWPORT, MAX_LAYER_SHIFT);
        assert_eq!(corner, LayerOffset { x: 24.0, y: -24.0 });

        let outside = layer_offset(5_000.0, -300.0, VIEWPORT, MAX_LAYER_SHIFT);
        assert_eq!(outside, LayerOffset { x: -24.0, y: 24.0 });
    }

    #[test]
    fn degenerate_viewport_yields_no_shift() {
        let flat = Viewport {
            width: 0.0,
            height: 0.0,
        };
        let offset = layer_offset(10.0, 10.0, flat, MAX_LAYER_SHIFT);
        assert_eq!(offset, LayerOffset::default());
        assert_eq!(offset.css_vars(), "--parallax-x: 0.00px; --parallax-y: 0.00px;");
    }
}
