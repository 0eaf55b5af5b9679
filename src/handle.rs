//! Arena handles for bodies and joints owned by a [`World`](crate::World).
//!
//! Slots are never reused, so a handle to a removed object stays dead.

/// Handle to a body inside a world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) usize);

impl BodyHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a joint inside a world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointHandle(pub(crate) usize);

impl JointHandle {
    pub fn index(self) -> usize {
        self.0
    }
}
