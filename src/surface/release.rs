use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{ready, Context, Poll};

use rustc_hash::FxHashSet;

use crate::error::ViewError;
use crate::surface::host::ContextId;

/// Context ids whose destruction has been issued but not confirmed.
pub(crate) type PendingReleases = Rc<RefCell<FxHashSet<ContextId>>>;

/// Outstanding destruction of a graphics context that the view has already
/// let go of.
///
/// The host must drive this to completion. A failed destruction is fatal:
/// the future resolves to [`ViewError::ContextDestruction`] and the context
/// id stays blocked so it is never bound again.
#[must_use = "context destruction must be awaited"]
pub struct ContextRelease<F> {
    context: ContextId,
    destroy: Pin<Box<F>>,
    pending: PendingReleases,
}

impl<F: Future<Output = bool>> ContextRelease<F> {
    pub(crate) fn new(context: ContextId, destroy: F, pending: PendingReleases) -> Self {
        let _ = pending.borrow_mut().insert(context);
        log::debug!("destroying graphics context {context}");
        Self {
            context,
            destroy: Box::pin(destroy),
            pending,
        }
    }

    /// Context being destroyed.
    #[must_use]
    pub fn context(&self) -> ContextId {
        self.context
    }
}

impl<F: Future<Output = bool>> Future for ContextRelease<F> {
    type Output = Result<(), ViewError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let destroyed = ready!(self.destroy.as_mut().poll(cx));
        let context = self.context;
        if destroyed {
            let _ = self.pending.borrow_mut().remove(&context);
            log::debug!("graphics context {context} destroyed");
            Poll::Ready(Ok(()))
        } else {
            log::error!("host failed to destroy graphics context {context}");
            Poll::Ready(Err(ViewError::ContextDestruction { context }))
        }
    }
}

impl<F> std::fmt::Debug for ContextRelease<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextRelease")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::future::ready;

    use super::*;

    fn pending_set() -> PendingReleases {
        Rc::new(RefCell::new(FxHashSet::default()))
    }

    #[test]
    fn success_clears_the_pending_id() {
        let pending = pending_set();
        let release = ContextRelease::new(ContextId(1), ready(true), Rc::clone(&pending));
        assert!(pending.borrow().contains(&ContextId(1)));
        assert!(pollster::block_on(release).is_ok());
        assert!(pending.borrow().is_empty());
    }

    #[test]
    fn failure_is_fatal_and_keeps_the_id_blocked() {
        let pending = pending_set();
        let release = ContextRelease::new(ContextId(2), ready(false), Rc::clone(&pending));
        let err = pollster::block_on(release).unwrap_err();
        assert!(matches!(
            err,
            ViewError::ContextDestruction {
                context: ContextId(2)
            }
        ));
        assert!(pending.borrow().contains(&ContextId(2)));
    }

    #[test]
    fn unpolled_release_stays_pending() {
        let pending = pending_set();
        let release = ContextRelease::new(
            ContextId(3),
            async { true },
            Rc::clone(&pending),
        );
        assert_eq!(release.context(), ContextId(3));
        drop(release);
        assert!(pending.borrow().contains(&ContextId(3)));
    }
}
