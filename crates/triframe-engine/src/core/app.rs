use winit::event::WindowEvent;

use crate::input::InputEvent;

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the program driving the runtime.
pub trait App {
    /// Called for every raw window event, before the runtime handles it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called for window events that translate into an [`InputEvent`].
    fn on_input(&mut self, event: &InputEvent, window: &WindowCtx<'_>) -> AppControl {
        let _ = (event, window);
        AppControl::Continue
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
