//! Per-pass decoration caching.
//!
//! A cache holds the last decoration set of one pass and decides on every
//! update whether that set can be carried through the edit or has to be
//! thrown away. Selection-only updates move ranges through the patch delta;
//! content changes and explicit invalidation recompute.

use std::fmt;

use log::{debug, warn};

use super::pass::PassName;
use super::types::DecorationSet;
use crate::editing::Patch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Nothing computed yet; the next update computes.
    Empty,
    Computed,
    /// The pass is switched off and emits nothing.
    Disabled,
}

/// Counters for how updates were served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub recomputes: u64,
    pub remaps: u64,
    pub failures: u64,
}

#[derive(Debug, Clone)]
pub struct DecorationCache {
    pass: PassName,
    state: CacheState,
    set: DecorationSet,
    invalidated: bool,
    stats: CacheStats,
}

static NOTHING: DecorationSet = DecorationSet::empty();

impl DecorationCache {
    pub fn new(pass: PassName, enabled: bool) -> Self {
        Self {
            pass,
            state: if enabled {
                CacheState::Empty
            } else {
                CacheState::Disabled
            },
            set: DecorationSet::empty(),
            invalidated: false,
            stats: CacheStats::default(),
        }
    }

    pub fn pass(&self) -> PassName {
        self.pass
    }

    pub fn state(&self) -> CacheState {
        self.state
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn is_enabled(&self) -> bool {
        self.state != CacheState::Disabled
    }

    /// The current decorations. Always empty while disabled.
    pub fn decorations(&self) -> &DecorationSet {
        match self.state {
            CacheState::Disabled => &NOTHING,
            _ => &self.set,
        }
    }

    /// Forces the next update to recompute.
    pub fn invalidate(&mut self) {
        if self.state == CacheState::Computed {
            self.invalidated = true;
        }
    }

    /// Disabling drops the stored set. Enabling starts from `Empty`.
    pub fn set_enabled(&mut self, enabled: bool) {
        match (enabled, self.state) {
            (false, CacheState::Disabled) | (true, CacheState::Empty | CacheState::Computed) => {}
            (false, _) => {
                self.state = CacheState::Disabled;
                self.set = DecorationSet::empty();
                self.invalidated = false;
            }
            (true, CacheState::Disabled) => self.state = CacheState::Empty,
        }
    }

    /// Brings the cache up to date with the document after `patches`, the
    /// edits applied since the last update in order. An empty slice is a
    /// refresh without an edit.
    ///
    /// `compute` runs only when a recompute is due. When it fails the
    /// previous set is remapped instead and the cache stays due for a
    /// recompute on the next update.
    pub fn update<E, F>(&mut self, patches: &[&Patch], compute: F) -> &DecorationSet
    where
        E: fmt::Display,
        F: FnOnce() -> Result<DecorationSet, E>,
    {
        if self.state == CacheState::Disabled {
            return &NOTHING;
        }

        let due = self.state == CacheState::Empty
            || self.invalidated
            || patches.iter().any(|p| p.doc_changed());

        if !due {
            if !patches.is_empty() {
                self.remap(patches);
                self.stats.remaps += 1;
                debug!("{}: remapped {} ranges", self.pass, self.set.len());
            }
            return &self.set;
        }

        match compute() {
            Ok(set) => {
                debug!("{}: recomputed {} ranges", self.pass, set.len());
                self.set = set;
                self.state = CacheState::Computed;
                self.invalidated = false;
                self.stats.recomputes += 1;
            }
            Err(e) => {
                warn!("{}: recompute failed, keeping previous ranges: {e}", self.pass);
                self.remap(patches);
                self.invalidated = self.state == CacheState::Computed;
                self.stats.failures += 1;
            }
        }
        &self.set
    }

    fn remap(&mut self, patches: &[&Patch]) {
        for patch in patches {
            self.set = self.set.remap(patch);
        }
    }
}
