use crate::node::Transform;

use super::{InputEvent, MouseButton};

/// Rotation produced by one pointer move of a pan.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PanDelta {
    pub dx: f32,
    pub dy: f32,
}

impl PanDelta {
    /// Horizontal drag turns around Y, vertical drag around X.
    pub fn apply(self, transform: &mut Transform) {
        transform.rotation[1] -= self.dx;
        transform.rotation[0] -= self.dy;
    }
}

/// Tracks a left-button drag.
///
/// Each move yields `(last - current) / extent * sensitivity` per axis, so a
/// drag across the full window width turns the object by `sensitivity`
/// radians.
#[derive(Debug, Clone)]
pub struct PanGesture {
    sensitivity: f32,
    last: Option<(f32, f32)>,
}

impl PanGesture {
    pub const DEFAULT_SENSITIVITY: f32 = 5.0;

    pub fn new(sensitivity: f32) -> Self {
        Self {
            sensitivity,
            last: None,
        }
    }

    pub fn begin(&mut self, x: f32, y: f32) {
        self.last = Some((x, y));
    }

    pub fn end(&mut self) {
        self.last = None;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }

    /// Moves the pan to `(x, y)` inside a view of `extent` (width, height).
    ///
    /// `None` when no pan is active or the extent is degenerate.
    pub fn moved(&mut self, x: f32, y: f32, extent: (f32, f32)) -> Option<PanDelta> {
        let (last_x, last_y) = self.last?;
        let (width, height) = extent;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }

        self.last = Some((x, y));
        Some(PanDelta {
            dx: (last_x - x) / width * self.sensitivity,
            dy: (last_y - y) / height * self.sensitivity,
        })
    }

    /// Feeds one input event; returns a delta for pointer moves during a pan.
    pub fn handle(&mut self, event: &InputEvent, extent: (f32, f32)) -> Option<PanDelta> {
        match *event {
            InputEvent::PointerButton {
                button: MouseButton::Left,
                pressed,
                x,
                y,
            } => {
                if pressed {
                    self.begin(x, y);
                } else {
                    self.end();
                }
                None
            }
            InputEvent::PointerMoved { x, y } => self.moved(x, y, extent),
            InputEvent::PointerLeft | InputEvent::Focused(false) => {
                self.end();
                None
            }
            _ => None,
        }
    }
}

impl Default for PanGesture {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SENSITIVITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTENT: (f32, f32) = (800.0, 600.0);

    fn press(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton {
            button: MouseButton::Left,
            pressed: true,
            x,
            y,
        }
    }

    #[test]
    fn moves_without_press_are_ignored() {
        let mut pan = PanGesture::default();
        assert_eq!(pan.handle(&InputEvent::PointerMoved { x: 10.0, y: 10.0 }, EXTENT), None);
        assert!(!pan.is_active());
    }

    #[test]
    fn delta_is_scaled_by_extent_and_sensitivity() {
        let mut pan = PanGesture::default();
        pan.handle(&press(400.0, 300.0), EXTENT);

        let d = pan
            .handle(&InputEvent::PointerMoved { x: 320.0, y: 360.0 }, EXTENT)
            .unwrap();
        assert!((d.dx - 80.0 / 800.0 * 5.0).abs() < 1e-6);
        assert!((d.dy - -60.0 / 600.0 * 5.0).abs() < 1e-6);

        // Deltas are relative to the previous move, not the press.
        let d = pan
            .handle(&InputEvent::PointerMoved { x: 320.0, y: 360.0 }, EXTENT)
            .unwrap();
        assert_eq!(d, PanDelta { dx: 0.0, dy: 0.0 });
    }

    #[test]
    fn apply_subtracts_from_rotation() {
        let mut t = Transform::default();
        PanDelta { dx: 0.5, dy: -0.25 }.apply(&mut t);
        assert_eq!(t.rotation, [0.25, -0.5, 0.0]);
    }

    #[test]
    fn release_and_leave_end_the_pan() {
        let mut pan = PanGesture::default();
        pan.handle(&press(0.0, 0.0), EXTENT);
        pan.handle(
            &InputEvent::PointerButton {
                button: MouseButton::Left,
                pressed: false,
                x: 0.0,
                y: 0.0,
            },
            EXTENT,
        );
        assert!(!pan.is_active());

        pan.handle(&press(0.0, 0.0), EXTENT);
        pan.handle(&InputEvent::PointerLeft, EXTENT);
        assert!(!pan.is_active());
    }

    #[test]
    fn right_button_does_not_pan() {
        let mut pan = PanGesture::default();
        pan.handle(
            &InputEvent::PointerButton {
                button: MouseButton::Right,
                pressed: true,
                x: 0.0,
                y: 0.0,
            },
            EXTENT,
        );
        assert!(!pan.is_active());
    }

    #[test]
    fn zero_extent_yields_nothing() {
        let mut pan = PanGesture::default();
        pan.begin(1.0, 1.0);
        assert_eq!(pan.moved(2.0, 2.0, (0.0, 600.0)), None);
    }
}
