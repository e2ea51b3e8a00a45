//! Change notification for graph consumers
//!
//! Listeners hear about every structural change in the order it happens.
//! During bulk work (loading a file, rebuilding a lineage) notifications are
//! paused; when the outermost pause ends each listener gets a single
//! `graph_rebuilt` and is expected to re-read the graph wholesale.

use super::types::{EdgeRef, VertexRef};

/// Receiver of structural change notifications
///
/// Removal notifications arrive while the entity is still in the graph.
pub trait GraphListener: Send {
    fn vertex_added(&mut self, _v: VertexRef) {}

    fn vertex_removed(&mut self, _v: VertexRef) {}

    fn edge_added(&mut self, _e: EdgeRef) {}

    fn edge_removed(&mut self, _e: EdgeRef) {}

    fn graph_rebuilt(&mut self) {}
}

/// Handle returned when registering a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registered listeners plus the pause depth
#[derive(Default)]
pub struct GraphListeners {
    listeners: Vec<(ListenerId, Box<dyn GraphListener>)>,
    next_id: u64,
    paused: u32,
}

impl GraphListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Box<dyn GraphListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> Option<Box<dyn GraphListener>> {
        let pos = self.listeners.iter().position(|(lid, _)| *lid == id)?;
        Some(self.listeners.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn is_paused(&self) -> bool {
        self.paused > 0
    }

    pub fn pause(&mut self) {
        self.paused += 1;
    }

    /// End one pause; the outermost resume fires `graph_rebuilt`
    pub fn resume(&mut self) {
        if self.paused == 0 {
            return;
        }
        self.paused -= 1;
        if self.paused == 0 {
            for (_, listener) in &mut self.listeners {
                listener.graph_rebuilt();
            }
        }
    }

    pub(crate) fn notify(&mut self, f: impl Fn(&mut dyn GraphListener)) {
        if self.is_paused() {
            return;
        }
        for (_, listener) in &mut self.listeners {
            f(listener.as_mut());
        }
    }
}

impl std::fmt::Debug for GraphListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphListeners")
            .field("listeners", &self.listeners.len())
            .field("paused", &self.paused)
            .finish()
    }
}
