pub mod cache;
pub mod candidates;
pub mod config;
pub mod consts;
pub mod display;
pub mod error;
pub mod history;
pub mod host;
pub mod io;
pub mod selector;
pub mod session;
pub mod transform;

pub use cache::{ImageId, LoadPhase, LoadState, LoadedImage};
pub use display::{Displayed, ShowOptions, ShowOutcome, ShownImage};
pub use error::{Result, ViewerError};
pub use host::{Dimensions, FileHandle, ImageBytes, ImageHost, ImageResource};
pub use session::Session;
