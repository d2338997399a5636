//! One viewer session: the candidate pool, cache, history and view state for a
//! single drop target.
//!
//! A `Session` is a cheap handle over shared single-threaded state. Loads and
//! shows are spawned with [`tokio::task::spawn_local`], so every method that
//! starts one must run inside a [`tokio::task::LocalSet`]. State is only
//! borrowed between suspension points; each transition is applied in one borrow.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use tracing::{debug, info};

use crate::cache::{fetch_image, ImageCache, ImageId, LoadPhase};
use crate::candidates::CandidatePool;
use crate::config::ViewerConfig;
use crate::display::{DisplayCoordinator, Displayed};
use crate::error::{Result, ViewerError};
use crate::history::{History, HistoryEntry, HistoryStatus};
use crate::host::{FileHandle, ImageHost, ImageResource};
use crate::selector::RandomSelector;
use crate::transform::{DragAnchor, Point, ViewTransform, Viewport};

pub(crate) struct SessionState<F, R: ImageResource> {
    pub(crate) config: ViewerConfig,
    pub(crate) candidates: CandidatePool<F>,
    pub(crate) selector: RandomSelector,
    pub(crate) cache: ImageCache<R>,
    pub(crate) history: History,
    pub(crate) display: DisplayCoordinator,
    pub(crate) transform: ViewTransform,
    pub(crate) viewport: Viewport,
    drag: Option<DragAnchor>,
    next_id: u64,
}

impl<F, R: ImageResource> SessionState<F, R> {
    fn allocate_id(&mut self) -> ImageId {
        let id = ImageId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

pub struct Session<F: FileHandle, H: ImageHost> {
    pub(crate) state: Rc<RefCell<SessionState<F, H::Resource>>>,
    host: Rc<H>,
}

impl<F: FileHandle, H: ImageHost> Clone for Session<F, H> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            host: Rc::clone(&self.host),
        }
    }
}

impl<F: FileHandle, H: ImageHost> Session<F, H> {
    pub fn new(host: H, config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        let state = SessionState {
            candidates: CandidatePool::default(),
            selector: RandomSelector::new(config.seed),
            cache: ImageCache::new(config.cache_capacity),
            history: History::new(config.history_capacity),
            display: DisplayCoordinator::default(),
            transform: ViewTransform::default(),
            viewport: Viewport::default(),
            drag: None,
            next_id: 1,
            config,
        };
        Ok(Self {
            state: Rc::new(RefCell::new(state)),
            host: Rc::new(host),
        })
    }

    pub fn config(&self) -> ViewerConfig {
        self.state.borrow().config.clone()
    }

    /// Replace the candidate pool with the image files among `handles`.
    ///
    /// The no-repeat cursor is reset and whatever was displayed or pending is
    /// cleared. Cache and history are kept. Returns the candidate count.
    pub fn drop_new_candidates(&self, handles: impl IntoIterator<Item = F>) -> usize {
        let mut state = self.state.borrow_mut();
        let pool = CandidatePool::from_handles(handles, state.config.image_extensions.as_slice());
        let count = pool.len();
        state.candidates = pool;
        state.selector.reset();
        state.display.reset();
        state.transform = ViewTransform::default();
        state.drag = None;
        info!(candidates = count, "New candidates dropped");
        count
    }

    pub fn candidates_count(&self) -> usize {
        self.state.borrow().candidates.len()
    }

    /// Start loading the candidate at `index`. Returns immediately.
    pub fn load_candidate(&self, index: usize) -> Result<ImageId> {
        let handle = {
            let state = self.state.borrow();
            let total = state.candidates.len();
            state
                .candidates
                .get(index)
                .cloned()
                .ok_or(ViewerError::CandidateIndexOutOfRange { index, total })?
        };
        Ok(self.load(handle))
    }

    fn load(&self, handle: Rc<F>) -> ImageId {
        let id = {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            let protect = state.display.shown_id();
            let evicted = state.cache.evict_for_insert(protect);
            state.history.mark_evicted(&evicted);

            let id = state.allocate_id();
            state
                .cache
                .insert_loading(id, handle.name(), handle.full_path());
            id
        };
        debug!(%id, path = handle.full_path(), "Load started");

        let state = Rc::clone(&self.state);
        let host = Rc::clone(&self.host);
        tokio::task::spawn_local(async move {
            let result = fetch_image(handle.as_ref(), host.as_ref()).await;
            let mut state = state.borrow_mut();
            let state = &mut *state;
            if state.cache.complete(id, result) {
                let status = match state.cache.phase(id) {
                    Some(LoadPhase::Ready) => HistoryStatus::Loaded,
                    _ => HistoryStatus::Failed,
                };
                state.history.mark(id, status);
            }
        });
        id
    }

    pub fn on_viewport_resize(&self, width: f64, height: f64) {
        self.state.borrow_mut().viewport = Viewport::new(width, height);
    }

    /// Zoom around `cursor` (viewport coordinates). No-op without an image.
    pub fn on_wheel(&self, delta_y: f64, cursor: Point) -> bool {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let Displayed::Image(shown) = state.display.displayed() else {
            return false;
        };
        let dimensions = shown.dimensions;
        let cursor = state.viewport.to_centered(cursor);
        state
            .transform
            .zoom(delta_y, cursor, dimensions, &state.config.zoom);
        true
    }

    pub fn on_drag_start(&self, pos: Point) {
        let mut state = self.state.borrow_mut();
        let anchor = DragAnchor::begin(pos, &state.transform);
        state.drag = Some(anchor);
    }

    pub fn on_drag_move(&self, pos: Point) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        if let Some(anchor) = state.drag {
            anchor.apply(pos, &mut state.transform);
        }
    }

    pub fn on_drag_end(&self, pos: Point) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        if let Some(anchor) = state.drag.take() {
            anchor.apply(pos, &mut state.transform);
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().drag.is_some()
    }

    pub fn transform(&self) -> ViewTransform {
        self.state.borrow().transform
    }

    pub fn viewport(&self) -> Viewport {
        self.state.borrow().viewport
    }

    pub fn displayed(&self) -> Displayed {
        self.state.borrow().display.displayed().clone()
    }

    /// Whether a show request is still waiting for its image.
    pub fn is_loading(&self) -> bool {
        self.state.borrow().display.is_loading()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.borrow().history.iter().cloned().collect()
    }

    pub fn history_cursor(&self) -> usize {
        self.state.borrow().history.cursor()
    }

    pub fn cache_len(&self) -> usize {
        self.state.borrow().cache.len()
    }

    /// Resident image ids, oldest first.
    pub fn cached_ids(&self) -> Vec<ImageId> {
        self.state.borrow().cache.ids().collect()
    }

    pub fn image_phase(&self, id: ImageId) -> Option<LoadPhase> {
        self.state.borrow().cache.phase(id)
    }

    /// Wait until the load of `id` settles, without touching the display.
    /// Resolves to `None` if the image is (or gets) evicted first.
    pub fn wait_settled(&self, id: ImageId) -> impl Future<Output = Option<LoadPhase>> + 'static {
        let phase_rx = self.state.borrow().cache.subscribe(id);
        async move {
            let mut phase_rx = phase_rx?;
            let phase = phase_rx
                .wait_for(|phase| *phase != LoadPhase::Loading)
                .await
                .ok()
                .map(|phase| *phase);
            phase
        }
    }

    /// Borrow the resource of a ready image, e.g. to paint it.
    pub fn with_resource<T>(&self, id: ImageId, f: impl FnOnce(&H::Resource) -> T) -> Option<T> {
        self.state.borrow().cache.with_resource(id, f)
    }

    /// Release every cached resource and clear the display.
    ///
    /// Loads still in flight complete into an empty cache and release their
    /// resources immediately.
    pub fn teardown(&self) -> usize {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        state.display.reset();
        let ids: Vec<ImageId> = state.cache.ids().collect();
        state.history.mark_evicted(&ids);
        let released = state.cache.clear();
        info!(released, "Session torn down");
        released
    }
}
