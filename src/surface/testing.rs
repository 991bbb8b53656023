//! In-memory host fakes shared by the unit tests.

use std::cell::RefCell;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::camera::core::Camera;
use crate::surface::host::{
    ContextId, FrameScheduler, FrameToken, GraphicsContext, Renderer,
};

/// One side effect observed by the fakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
    Create(u64),
    SetSize(u32, u32),
    Render(u64),
    EndFrame(u64),
    Dispose,
    Destroy(u64),
}

/// Ordered log of fake calls, shared by every fake created from it.
#[derive(Debug, Clone, Default)]
pub(crate) struct Journal(Rc<RefCell<Vec<Call>>>);

impl Journal {
    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().iter().filter(|&c| pred(c)).count()
    }
}

/// Scene stand-in that counts loop updates.
#[derive(Debug, Default)]
pub(crate) struct FakeScene {
    pub(crate) updates: u32,
}

/// Context whose drawing buffer is the layout scaled by a pixel density,
/// unless pinned to a fixed size.
#[derive(Debug)]
pub(crate) struct FakeContext {
    id: u64,
    layout: (u32, u32),
    density: u32,
    fixed: Option<(u32, u32)>,
    destroy_ok: bool,
    journal: Journal,
}

impl FakeContext {
    pub(crate) fn new(id: u64, journal: &Journal) -> Self {
        Self {
            id,
            layout: (0, 0),
            density: 1,
            fixed: None,
            destroy_ok: true,
            journal: journal.clone(),
        }
    }

    pub(crate) fn with_density(mut self, density: u32) -> Self {
        self.density = density;
        self
    }

    pub(crate) fn set_density(&mut self, density: u32) {
        self.density = density;
    }

    pub(crate) fn with_buffer(mut self, width: u32, height: u32) -> Self {
        self.fixed = Some((width, height));
        self
    }

    pub(crate) fn failing_destroy(mut self) -> Self {
        self.destroy_ok = false;
        self
    }
}

impl GraphicsContext for FakeContext {
    type Destroy = Ready<bool>;

    fn id(&self) -> ContextId {
        ContextId(self.id)
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        self.fixed.unwrap_or((
            self.layout.0 * self.density,
            self.layout.1 * self.density,
        ))
    }

    fn fit_layout(&mut self, width: u32, height: u32) {
        self.layout = (width, height);
    }

    fn end_frame(&mut self) {
        self.journal.push(Call::EndFrame(self.id));
    }

    fn destroy(self) -> Self::Destroy {
        self.journal.push(Call::Destroy(self.id));
        ready(self.destroy_ok)
    }
}

/// Renderer that only records what it was asked to do.
#[derive(Debug)]
pub(crate) struct FakeRenderer {
    size: (u32, u32),
    journal: Journal,
}

impl Renderer for FakeRenderer {
    type Context = FakeContext;
    type Scene = FakeScene;

    fn create(context: &mut FakeContext) -> Self {
        context.journal.push(Call::Create(context.id));
        Self {
            size: (0, 0),
            journal: context.journal.clone(),
        }
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.journal.push(Call::SetSize(width, height));
    }

    fn back_buffer_size(&self) -> (u32, u32) {
        self.size
    }

    fn render(
        &mut self,
        context: &mut FakeContext,
        _scene: &FakeScene,
        _camera: &Camera,
    ) {
        self.journal.push(Call::Render(context.id));
    }

    fn dispose(self) {
        self.journal.push(Call::Dispose);
    }
}

#[derive(Debug, Default)]
struct SchedulerState {
    next: u64,
    scheduled: Vec<FrameToken>,
    cancelled: Vec<FrameToken>,
}

/// Scheduler that fires only when the test says so. Clones share state.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeScheduler(Rc<RefCell<SchedulerState>>);

impl FakeScheduler {
    pub(crate) fn scheduled(&self) -> Vec<FrameToken> {
        self.0.borrow().scheduled.clone()
    }

    pub(crate) fn cancelled(&self) -> Vec<FrameToken> {
        self.0.borrow().cancelled.clone()
    }

    /// Remove and return every outstanding token, as if a frame elapsed.
    pub(crate) fn take_due(&self) -> Vec<FrameToken> {
        std::mem::take(&mut self.0.borrow_mut().scheduled)
    }
}

impl FrameScheduler for FakeScheduler {
    fn schedule_frame(&mut self) -> FrameToken {
        let mut state = self.0.borrow_mut();
        state.next += 1;
        let token = FrameToken(state.next);
        state.scheduled.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let mut state = self.0.borrow_mut();
        state.scheduled.retain(|t| *t != token);
        state.cancelled.push(token);
    }
}
