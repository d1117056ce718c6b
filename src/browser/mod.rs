//! File explorer state.
//!
//! The browser owns the current directory and a refresh token. The listing is
//! derived from both and recomputed only when either changes. Navigation is
//! validated before it is committed, and a directory that becomes unreadable
//! while displayed sends the browser back to its initial path.

mod entry;
mod nav;

pub use entry::{compare_entries, is_hidden, read_listing, DirEntry, HIDDEN_PREFIX};
pub use nav::{child_of, parent_of, NavTarget, PARENT};

use crate::error::{ScratchError, Result};
use crate::reactive::{Derived, Versioned};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Stamp a listing was derived from: (path version, refresh token).
type ListingStamp = (u64, u64);

/// Directory browser with a derived, cached listing.
#[derive(Debug)]
pub struct DirectoryBrowser {
    initial: PathBuf,
    current: Versioned<PathBuf>,
    refresh_token: u64,
    listing: Derived<ListingStamp, Vec<DirEntry>>,
    notice: Option<String>,
}

impl DirectoryBrowser {
    /// Creates a browser rooted at `initial`.
    pub fn new(initial: impl Into<PathBuf>) -> Self {
        let initial = initial.into();
        Self {
            current: Versioned::new(initial.clone()),
            initial,
            refresh_token: 0,
            listing: Derived::new(),
            notice: None,
        }
    }

    /// The path the browser started in.
    pub fn initial_path(&self) -> &Path {
        &self.initial
    }

    /// The directory currently shown.
    pub fn current_path(&self) -> &Path {
        self.current.get()
    }

    /// Current value of the refresh token.
    pub fn refresh_token(&self) -> u64 {
        self.refresh_token
    }

    fn stamp(&self) -> ListingStamp {
        (self.current.version(), self.refresh_token)
    }

    /// Returns the visible entries of the current directory.
    ///
    /// If the directory cannot be read, the browser resets to its initial path,
    /// records a notice and returns an empty listing. The next call lists the
    /// initial path.
    pub fn list(&mut self) -> &[DirEntry] {
        let stamp = self.stamp();
        if !self.listing.is_fresh(&stamp) {
            let entries = self.compute_listing();
            // Stored under the stamp read before any reset, so a reset forces a recompute
            self.listing.store(stamp, entries);
        }
        self.listing.peek().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the most recently computed listing without touching the disk.
    pub fn cached_listing(&self) -> &[DirEntry] {
        self.listing.peek().map(Vec::as_slice).unwrap_or(&[])
    }

    fn compute_listing(&mut self) -> Vec<DirEntry> {
        let path = self.current.get().clone();
        match read_listing(&path) {
            Ok(entries) => {
                debug!("Listed {} entries in {}", entries.len(), path.display());
                entries
            }
            Err(e) => {
                warn!("Cannot read {}: {}", path.display(), e);
                if path != self.initial {
                    self.notice = Some(format!(
                        "Cannot read {}: {e}. Back to {}",
                        path.display(),
                        self.initial.display()
                    ));
                    self.current.set(self.initial.clone());
                } else {
                    self.notice = Some(format!("Cannot read {}: {e}", path.display()));
                }
                Vec::new()
            }
        }
    }

    /// Moves to `target` if it resolves to a readable directory.
    ///
    /// On failure the current path is left unchanged.
    pub fn change_directory(&mut self, target: &NavTarget) -> Result<&Path> {
        let candidate = nav::resolve(self.current.get(), target)?;

        if let Err(e) = std::fs::read_dir(&candidate) {
            return Err(ScratchError::directory(format!(
                "{} is not a readable directory: {e}",
                candidate.display()
            )));
        }

        debug!("Changing directory to {}", candidate.display());
        self.current.set(candidate);
        Ok(self.current.get().as_path())
    }

    /// Returns true if navigating to the parent is possible lexically.
    pub fn has_parent(&self) -> bool {
        parent_of(self.current.get()).is_some()
    }

    /// Path of `name` within the current directory. The name is not checked
    /// against the file system.
    pub fn resolve_entry_path(&self, name: &str) -> PathBuf {
        self.current.get().join(name)
    }

    /// Forces the next [`list`](Self::list) to re-read the directory.
    pub fn force_refresh(&mut self) {
        self.refresh_token = self.refresh_token.wrapping_add(1);
    }

    /// Takes the pending notice produced by a listing failure, if any.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}
