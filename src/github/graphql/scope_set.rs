//! Resolved scopes of one level
//!
//! Turns a list of validated requests into the set of tags a composer emits, keyed in
//! catalog order so the output never depends on the order of the input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{PageWindow, ScopeRequest, ScopeTag};

/// Flags that change the emitted text independently of the requested scopes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComposeOptions {
    /// Emit `totalCount` on every paginated connection (diagnostic toggle).
    pub include_total_count: bool,
    /// Add the `essential` account scope whenever any account scope is requested.
    pub implicit_essential: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSet<S: ScopeTag> {
    windows: BTreeMap<S, PageWindow>,
}

impl<S: ScopeTag> ScopeSet<S> {
    /// Resolves requests into a set of tags with one window each.
    ///
    /// `all` expands to every other tag of the level that was not requested explicitly.
    /// When a tag is requested more than once the greatest window wins, which keeps the
    /// result independent of request order.
    pub fn resolve(requests: &[ScopeRequest<S>]) -> Self {
        let mut windows: BTreeMap<S, PageWindow> = BTreeMap::new();
        let mut all_window: Option<PageWindow> = None;

        for request in requests {
            let window = request.window();
            if request.scope_name.is_all() {
                all_window = Some(match all_window {
                    Some(current) => current.max(window),
                    None => window,
                });
                continue;
            }
            match windows.get_mut(&request.scope_name) {
                Some(current) if *current < window => *current = window,
                Some(_) => {}
                None => {
                    windows.insert(request.scope_name, window);
                }
            }
        }

        if let Some(all_window) = all_window {
            for tag in S::iter().filter(|tag| !tag.is_all()) {
                windows.entry(tag).or_insert_with(|| all_window.clone());
            }
        }

        Self { windows }
    }

    /// Set of plain tags that carry no pagination of their own.
    pub fn from_tags(tags: &[S]) -> Self {
        let requests: Vec<ScopeRequest<S>> = tags.iter().map(|tag| ScopeRequest::of(*tag)).collect();
        Self::resolve(&requests)
    }

    pub fn contains(&self, tag: S) -> bool {
        self.windows.contains_key(&tag)
    }

    pub fn window(&self, tag: S) -> Option<&PageWindow> {
        self.windows.get(&tag)
    }

    /// Window of `tag`, or the nested default when it was not requested.
    pub fn window_or_nested(&self, tag: S) -> PageWindow {
        self.window(tag).cloned().unwrap_or_else(PageWindow::nested)
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Whether the count tag is the only resolved tag.
    pub fn is_count_only(&self) -> bool {
        self.windows.len() == 1 && self.windows.keys().all(|tag| tag.is_count())
    }

    pub fn has_count(&self) -> bool {
        self.windows.keys().any(|tag| tag.is_count())
    }

    /// Tags in catalog order.
    pub fn tags(&self) -> impl Iterator<Item = S> + '_ {
        self.windows.keys().copied()
    }

    /// Adds `tag` with `window` unless it is already present.
    pub fn with_implicit(mut self, tag: S, window: PageWindow) -> Self {
        self.windows.entry(tag).or_insert(window);
        self
    }
}
