use std::rc::Rc;

use crate::host::FileHandle;

/// Whether `name` ends in one of `extensions` (without the dot).
///
/// Only the text after the last `.` is compared, ignoring ASCII case on both
/// sides. A name without a dot is compared whole, so `"png"` alone matches `png`.
pub fn has_image_ext<S: AsRef<str>>(name: &str, extensions: &[S]) -> bool {
    let ext = name.rsplit('.').next().unwrap_or(name);
    extensions.iter().any(|e| e.as_ref().eq_ignore_ascii_case(ext))
}

/// Image-bearing file handles of the current drop.
pub struct CandidatePool<F> {
    handles: Vec<Rc<F>>,
}

impl<F> Default for CandidatePool<F> {
    fn default() -> Self {
        Self {
            handles: Vec::new(),
        }
    }
}

impl<F: FileHandle> CandidatePool<F> {
    /// Keep only the handles whose name carries an image extension.
    pub fn from_handles<S: AsRef<str>>(
        handles: impl IntoIterator<Item = F>,
        extensions: &[S],
    ) -> Self {
        let handles = handles
            .into_iter()
            .filter(|h| has_image_ext(h.name(), extensions))
            .map(Rc::new)
            .collect();
        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rc<F>> {
        self.handles.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &F> {
        self.handles.iter().map(|h| h.as_ref())
    }
}
