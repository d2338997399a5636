//! Race-resolved display of loaded images.
//!
//! Every show request takes a ticket and becomes the pending request. When its
//! image settles, the request only lands on screen if it still holds the
//! pending ticket. Later requests therefore supersede earlier ones without
//! cancelling their loads, whatever order the loads finish in.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use tokio::sync::oneshot;
use tracing::debug;

use crate::cache::{ImageId, LoadPhase, LoadState};
use crate::error::{Result, ViewerError};
use crate::history::{HistoryEntry, HistoryStatus};
use crate::host::{Dimensions, FileHandle, ImageHost, ImageResource};
use crate::session::{Session, SessionState};
use crate::transform::ViewTransform;

/// Summary of the image on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct ShownImage {
    pub id: ImageId,
    pub name: String,
    pub path: String,
    pub dimensions: Dimensions,
}

/// What the viewer currently presents.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Displayed {
    #[default]
    Nothing,
    Image(ShownImage),
    /// "Failed to load" indication for a read or decode failure.
    Failed { id: ImageId, reason: String },
    /// The requested image was evicted before it could be shown.
    Unavailable(ImageId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShowOptions {
    /// Record the request in the history log.
    pub add_history: bool,
}

/// How a show request ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShowOutcome {
    Shown(ImageId),
    Failed(ImageId),
    Unavailable(ImageId),
    /// A newer request was made before this one settled. Nothing changed.
    Superseded(ImageId),
}

impl ShowOutcome {
    pub fn id(&self) -> ImageId {
        match *self {
            ShowOutcome::Shown(id)
            | ShowOutcome::Failed(id)
            | ShowOutcome::Unavailable(id)
            | ShowOutcome::Superseded(id) => id,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, ShowOutcome::Superseded(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ShowRequest {
    id: ImageId,
    ticket: u64,
}

#[derive(Default)]
pub struct DisplayCoordinator {
    displayed: Displayed,
    pending: Option<ShowRequest>,
    next_ticket: u64,
}

impl DisplayCoordinator {
    pub fn displayed(&self) -> &Displayed {
        &self.displayed
    }

    /// Id of the most recent unsettled request.
    pub fn pending(&self) -> Option<ImageId> {
        self.pending.map(|r| r.id)
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Id of the image on screen, if one is shown.
    pub fn shown_id(&self) -> Option<ImageId> {
        match &self.displayed {
            Displayed::Image(shown) => Some(shown.id),
            _ => None,
        }
    }

    pub(crate) fn request(&mut self, id: ImageId) -> ShowRequest {
        let request = ShowRequest {
            id,
            ticket: self.next_ticket,
        };
        self.next_ticket += 1;
        self.pending = Some(request);
        request
    }

    pub(crate) fn is_current(&self, request: ShowRequest) -> bool {
        self.pending == Some(request)
    }

    /// Land `displayed` if `request` is still the pending one.
    pub(crate) fn settle(&mut self, request: ShowRequest, displayed: Displayed) -> bool {
        if !self.is_current(request) {
            return false;
        }
        self.pending = None;
        self.displayed = displayed;
        true
    }

    pub(crate) fn reset(&mut self) {
        self.displayed = Displayed::Nothing;
        self.pending = None;
    }
}

impl<F: FileHandle, H: ImageHost> Session<F, H> {
    /// Request `id` on screen.
    ///
    /// The request becomes pending, and the history entry (with
    /// `add_history`) is written, before this returns, so both follow call
    /// order rather than completion order. Settling runs on its own local
    /// task, so the display updates whether or not the returned future is
    /// polled; the future only reports how the request ended.
    pub fn show(&self, id: ImageId, options: ShowOptions) -> impl Future<Output = ShowOutcome> + 'static {
        let (request, phase_rx) = {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            let request = state.display.request(id);
            if options.add_history {
                let entry = match state.cache.get(id) {
                    Some(image) => HistoryEntry {
                        status: match image.phase() {
                            LoadPhase::Loading => HistoryStatus::Pending,
                            LoadPhase::Ready => HistoryStatus::Loaded,
                            LoadPhase::Failed => HistoryStatus::Failed,
                        },
                        ..HistoryEntry::new(id, image.name.as_str(), image.path.as_str())
                    },
                    None => HistoryEntry {
                        status: HistoryStatus::Evicted,
                        ..HistoryEntry::new(id, "", "")
                    },
                };
                state.history.add(entry);
            }
            (request, state.cache.subscribe(id))
        };
        debug!(%id, ticket = request.ticket, "Show requested");

        let state = Rc::clone(&self.state);
        let (outcome_tx, outcome_rx) = oneshot::channel();
        tokio::task::spawn_local(async move {
            if let Some(mut phase_rx) = phase_rx {
                // A closed channel means the entry was evicted mid-load.
                let _ = phase_rx.wait_for(|phase| *phase != LoadPhase::Loading).await;
            }
            let outcome = resolve_show(&state, request);
            let _ = outcome_tx.send(outcome);
        });

        async move {
            // The settle task only goes away with its LocalSet.
            outcome_rx.await.unwrap_or(ShowOutcome::Unavailable(id))
        }
    }

    /// Show the history entry at `index` and move the cursor there.
    pub fn show_from_history(&self, index: usize) -> Result<impl Future<Output = ShowOutcome> + 'static> {
        let id = self.state.borrow_mut().history.set_cursor(index)?.id;
        Ok(self.show(id, ShowOptions::default()))
    }

    /// Step one entry back in history (older).
    pub fn history_back(&self) -> Option<impl Future<Output = ShowOutcome> + 'static> {
        let index = self.state.borrow().history.older()?;
        self.show_from_history(index).ok()
    }

    /// Step one entry forward in history (newer).
    pub fn history_forward(&self) -> Option<impl Future<Output = ShowOutcome> + 'static> {
        let index = self.state.borrow().history.newer()?;
        self.show_from_history(index).ok()
    }

    /// Pick a random candidate, start loading it and show it.
    pub fn roll(&self) -> Result<impl Future<Output = ShowOutcome> + 'static> {
        let index = {
            let mut state = self.state.borrow_mut();
            let len = state.candidates.len();
            if len == 0 {
                return Err(ViewerError::EmptyCandidatePool);
            }
            state.selector.roll(len)
        };
        let id = self.load_candidate(index)?;
        debug!(index, %id, "Rolled candidate");
        Ok(self.show(id, ShowOptions { add_history: true }))
    }
}

fn resolve_show<F, R: ImageResource>(
    state: &RefCell<SessionState<F, R>>,
    request: ShowRequest,
) -> ShowOutcome {
    let mut state = state.borrow_mut();
    let state = &mut *state;
    let id = request.id;
    if !state.display.is_current(request) {
        debug!(%id, "Show superseded");
        return ShowOutcome::Superseded(id);
    }

    let (displayed, outcome) = match state.cache.get(id).map(|image| (image, &image.state)) {
        Some((image, LoadState::Ready { dimensions, .. })) => {
            state.transform = ViewTransform::fit(*dimensions, state.viewport);
            let shown = ShownImage {
                id,
                name: image.name.clone(),
                path: image.path.clone(),
                dimensions: *dimensions,
            };
            (Displayed::Image(shown), ShowOutcome::Shown(id))
        }
        Some((_, LoadState::Failed { reason })) => (
            Displayed::Failed {
                id,
                reason: reason.clone(),
            },
            ShowOutcome::Failed(id),
        ),
        Some((_, LoadState::Loading)) | None => (Displayed::Unavailable(id), ShowOutcome::Unavailable(id)),
    };
    state.display.settle(request, displayed);
    debug!(%id, outcome = ?outcome, scale = state.transform.scale_percent, "Show settled");
    outcome
}
