use crate::RenderableGraph;

/// The external rendering capability. Each mounted graph is represented by a
/// handle that must be disposed before the next one is mounted.
pub trait RenderHost {
    type Handle;

    fn mount(&mut self, graph: &RenderableGraph) -> Self::Handle;

    fn dispose(&mut self, handle: Self::Handle);
}

/// Owns at most one live render handle.
#[derive(Debug)]
pub struct RenderSlot<H: RenderHost> {
    host: H,
    current: Option<H::Handle>,
}

impl<H: RenderHost> RenderSlot<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            current: None,
        }
    }

    /// Dispose the live handle, if any, then mount `graph`.
    pub fn replace(&mut self, graph: &RenderableGraph) -> &H::Handle {
        self.clear();
        self.current.insert(self.host.mount(graph))
    }

    pub fn clear(&mut self) {
        if let Some(handle) = self.current.take() {
            self.host.dispose(handle);
        }
    }

    pub fn current(&self) -> Option<&H::Handle> {
        self.current.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<H: RenderHost> Drop for RenderSlot<H> {
    fn drop(&mut self) {
        self.clear();
    }
}
