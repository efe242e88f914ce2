use crate::services::driver::ElementHandle;

/// A selectable item inside one menu category. The handle triggers the
/// actual selection through the driver; the description is what preference
/// keywords match against.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub description: String,
    pub handle: ElementHandle,
}

impl MenuItem {
    pub fn new(description: impl Into<String>, handle: ElementHandle) -> Self {
        Self {
            description: description.into(),
            handle,
        }
    }
}
