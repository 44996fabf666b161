use std::path::Path;

/// Filesystem operations the scheduler needs beyond rendering.
///
/// Rendered frames are written by the [`Renderer`](crate::Renderer) itself; the sink duplicates
/// finished files for held frames and prepares directories.
pub trait FileSink {
    /// Copy `src` to `dst`, replacing `dst`.
    fn copy(&mut self, src: &Path, dst: &Path) -> std::io::Result<()>;
    /// Return `true` when `path` is present.
    fn exists(&self, path: &Path) -> bool;
    /// Create `path` and its parents.
    fn make_dirs(&mut self, path: &Path) -> std::io::Result<()>;
}

/// [`FileSink`] over `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsSink;

impl FileSink for FsSink {
    fn copy(&mut self, src: &Path, dst: &Path) -> std::io::Result<()> {
        std::fs::copy(src, dst).map(|_| ())
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn make_dirs(&mut self, path: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/sink.rs"]
mod tests;
