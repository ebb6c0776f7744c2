//! Holder for an in-progress form value kept apart from the collection.

#[derive(Debug, Clone, Default)]
pub struct DraftHolder<T: Clone + Default> {
    current: T,
}

impl<T: Clone + Default> DraftHolder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(initial: T) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    /// Builds the next draft from the previous one and replaces it wholesale.
    pub fn edit(&mut self, change: impl FnOnce(T) -> T) {
        let previous = self.current.clone();
        self.current = change(previous);
    }

    pub fn reset(&mut self) {
        self.current = T::default();
    }

    pub fn take(&mut self) -> T {
        std::mem::take(&mut self.current)
    }
}
