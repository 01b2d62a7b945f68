//! Render session: the current patch snapshot plus command handling.
//!
//! Edits produce a new immutable snapshot that is swapped in under a short
//! write lock. Edits are serialized by an upgradable read lock, which still
//! admits readers. Renders clone the snapshot under a read lock and run with
//! the lock released, so a render always observes one consistent patch.

use std::sync::Arc;

use fmsynth_patch::{Patch, PatchCommand};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};

use crate::error::EngineResult;
use crate::graph::{RenderOutput, SynthGraph};
use crate::render::RenderRequest;

/// Commands accepted by a [`SynthSession`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    /// Apply an edit to the current patch.
    Edit(PatchCommand),
    /// Render the current patch.
    RequestRender(RenderRequest),
}

/// Replies produced by [`SynthSession::handle`].
#[derive(Debug, Clone)]
pub enum EngineReply {
    /// The edit was applied; this is the new snapshot.
    PatchUpdated(Arc<Patch>),
    /// Render result.
    Rendered(RenderOutput),
}

#[derive(Debug, Clone)]
struct Snapshot {
    patch: Arc<Patch>,
    graph: Arc<SynthGraph>,
}

/// Owns the current patch and renders it on request.
#[derive(Debug)]
pub struct SynthSession {
    current: RwLock<Snapshot>,
}

impl SynthSession {
    /// Creates a session from a patch, validating it first.
    pub fn new(patch: Patch) -> EngineResult<Self> {
        patch.validate()?;
        let graph = SynthGraph::new(&patch.algorithm)?;
        Ok(Self {
            current: RwLock::new(Snapshot {
                patch: Arc::new(patch),
                graph: Arc::new(graph),
            }),
        })
    }

    /// The current patch snapshot.
    pub fn patch(&self) -> Arc<Patch> {
        Arc::clone(&self.current.read().patch)
    }

    /// The graph for the current patch.
    pub fn graph(&self) -> Arc<SynthGraph> {
        Arc::clone(&self.current.read().graph)
    }

    /// Handles one command.
    pub fn handle(&self, command: EngineCommand) -> EngineResult<EngineReply> {
        match command {
            EngineCommand::Edit(edit) => self.edit(&edit).map(EngineReply::PatchUpdated),
            EngineCommand::RequestRender(request) => {
                self.render(&request).map(EngineReply::Rendered)
            }
        }
    }

    /// Applies an edit and returns the new snapshot.
    ///
    /// Concurrent edits apply one after another, each to the snapshot left by
    /// the previous one. On error the current patch is left unchanged.
    pub fn edit(&self, command: &PatchCommand) -> EngineResult<Arc<Patch>> {
        let base = self.current.upgradable_read();
        let next = Arc::new(base.patch.apply(command)?);

        let graph = if !command.changes_topology() || base.graph.matches(&next) {
            Arc::clone(&base.graph)
        } else {
            log::debug!("rebuilding graph for algorithm {:?}", next.algorithm);
            Arc::new(SynthGraph::new(&next.algorithm)?)
        };

        let mut current = RwLockUpgradableReadGuard::upgrade(base);
        *current = Snapshot {
            patch: Arc::clone(&next),
            graph,
        };
        log::debug!("applied {}", command.name());
        Ok(next)
    }

    /// Renders the current snapshot.
    pub fn render(&self, request: &RenderRequest) -> EngineResult<RenderOutput> {
        let snapshot = self.current.read().clone();
        snapshot.graph.render(&snapshot.patch, request)
    }
}
