use std::cell::RefCell;
use std::rc::Rc;

use super::interpolator::Frame;

/// A visual surface that renders the shared playback position: the car
/// dot on the track map, a marker on a channel chart.
pub trait FrameSink {
    fn present(&mut self, frame: &Frame);
}

/// Fans each computed frame out to every registered surface, so all
/// surfaces observe the same frame for a given tick instead of each
/// re-deriving the interpolation.
#[derive(Default)]
pub struct RenderSync {
    sinks: Vec<Box<dyn FrameSink>>,
}

impl RenderSync {
    /// Register a surface. Surfaces attached after playback started simply
    /// begin receiving frames from the next publish.
    pub fn attach(&mut self, sink: Box<dyn FrameSink>) {
        self.sinks.push(sink);
    }

    /// Push one frame to every surface. Publishing with no surfaces
    /// attached is a no-op; surfaces and trace loads can race during setup.
    pub fn publish(&mut self, frame: &Frame) {
        for sink in self.sinks.iter_mut() {
            sink.present(frame);
        }
    }

    pub fn surface_count(&self) -> usize {
        self.sinks.len()
    }
}

/// Sink that stores the latest frame in a shared cell. Immediate-mode
/// surfaces keep a clone of the cell and redraw from it every paint.
#[derive(Clone, Default)]
pub struct SharedFrame {
    latest: Rc<RefCell<Option<Frame>>>,
}

impl SharedFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Frame> {
        *self.latest.borrow()
    }

    pub fn clear(&self) {
        *self.latest.borrow_mut() = None;
    }
}

impl FrameSink for SharedFrame {
    fn present(&mut self, frame: &Frame) {
        *self.latest.borrow_mut() = Some(*frame);
    }
}
