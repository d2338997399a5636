#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use tokio::sync::Notify;
use tokio::task::LocalSet;

use picknroll_core::config::ViewerConfig;
use picknroll_core::{Dimensions, FileHandle, ImageBytes, ImageHost, ImageResource, Result, Session, ViewerError};

/// In-memory file whose bytes spell out its dimensions (`"WxH"`).
pub struct MockFile {
    name: String,
    full_path: String,
    contents: Option<Vec<u8>>,
    gate: Option<Rc<Notify>>,
}

impl MockFile {
    pub fn image(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            full_path: format!("/drop/{name}"),
            contents: Some(format!("{width}x{height}").into_bytes()),
            gate: None,
        }
    }

    /// Bytes the mock decoder rejects.
    pub fn corrupt(name: &str) -> Self {
        Self {
            contents: Some(b"not an image".to_vec()),
            ..Self::image(name, 1, 1)
        }
    }

    /// A file whose read fails.
    pub fn unreadable(name: &str) -> Self {
        Self {
            contents: None,
            ..Self::image(name, 1, 1)
        }
    }

    /// Hold the read until the returned `Notify` fires.
    pub fn gated(mut self) -> (Self, Rc<Notify>) {
        let gate = Rc::new(Notify::new());
        self.gate = Some(Rc::clone(&gate));
        (self, gate)
    }
}

impl FileHandle for MockFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_path(&self) -> &str {
        &self.full_path
    }

    async fn read_bytes(&self) -> Result<ImageBytes> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.contents {
            Some(bytes) => Ok(bytes.as_slice().into()),
            None => Err(ViewerError::Read {
                path: self.full_path.clone(),
                reason: "permission denied".into(),
            }),
        }
    }
}

/// Shared record of resources created and released by a [`MockHost`].
#[derive(Default)]
pub struct ResourceLog {
    pub created: Cell<usize>,
    pub released: RefCell<Vec<String>>,
}

impl ResourceLog {
    pub fn release_count(&self, label: &str) -> usize {
        self.released.borrow().iter().filter(|l| *l == label).count()
    }

    pub fn total_released(&self) -> usize {
        self.released.borrow().len()
    }

    pub fn live(&self) -> usize {
        self.created.get() - self.total_released()
    }
}

pub struct MockResource {
    label: String,
    log: Rc<ResourceLog>,
}

impl MockResource {
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl ImageResource for MockResource {
    fn release(&mut self) {
        self.log.released.borrow_mut().push(self.label.clone());
    }
}

pub struct MockHost {
    pub log: Rc<ResourceLog>,
}

impl MockHost {
    pub fn with_log() -> (Self, Rc<ResourceLog>) {
        let log = Rc::new(ResourceLog::default());
        (
            Self {
                log: Rc::clone(&log),
            },
            log,
        )
    }
}

impl ImageHost for MockHost {
    type Resource = MockResource;

    async fn create_resource(&self, bytes: ImageBytes) -> Result<MockResource> {
        self.log.created.set(self.log.created.get() + 1);
        Ok(MockResource {
            label: String::from_utf8_lossy(&bytes).into_owned(),
            log: Rc::clone(&self.log),
        })
    }

    async fn decode_dimensions(&self, bytes: ImageBytes) -> Result<Dimensions> {
        let text = String::from_utf8_lossy(&bytes);
        let parsed = text
            .split_once('x')
            .and_then(|(w, h)| Some(Dimensions::new(w.parse().ok()?, h.parse().ok()?)));
        parsed.ok_or_else(|| ViewerError::Decode(format!("cannot parse {text:?}")))
    }
}

pub type MockSession = Session<MockFile, MockHost>;

pub fn session_with(config: ViewerConfig) -> (MockSession, Rc<ResourceLog>) {
    let (host, log) = MockHost::with_log();
    let session = Session::new(host, config).expect("valid config");
    session.on_viewport_resize(800.0, 600.0);
    (session, log)
}

pub fn session() -> (MockSession, Rc<ResourceLog>) {
    session_with(ViewerConfig {
        seed: Some(7),
        ..ViewerConfig::default()
    })
}

/// `n` distinct images named `img{i}.png`, each `(100 + i) x 100`.
pub fn images(n: usize) -> Vec<MockFile> {
    (0..n)
        .map(|i| MockFile::image(&format!("img{i}.png"), 100 + i as u32, 100))
        .collect()
}

/// Drive `fut` on a `LocalSet` so spawned loads make progress.
pub async fn run_local<F: Future>(fut: F) -> F::Output {
    LocalSet::new().run_until(fut).await
}
