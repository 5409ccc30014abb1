use crate::catalog::OperationId;

/// At most one chosen operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<OperationId>,
}

impl Selection {
    pub fn select(&mut self, id: OperationId) {
        self.current = Some(id);
    }

    pub fn current(&self) -> Option<OperationId> {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}
