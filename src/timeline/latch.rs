/// One-shot guard: armed once, fired at most once per arming.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceLatch {
    armed: bool,
}

impl AdvanceLatch {
    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Disarm and report whether this call was the one that fired.
    pub fn fire(&mut self) -> bool {
        std::mem::replace(&mut self.armed, false)
    }
}
