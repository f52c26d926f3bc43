//! DTOs for executives_sea adapter.

#[derive(Debug, Clone)]
pub struct ExecutiveCreate {
    pub sid: String,
    pub name: String,
    pub position: Option<String>,
}

impl ExecutiveCreate {
    pub fn new(sid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            name: name.into(),
            position: None,
        }
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }
}
