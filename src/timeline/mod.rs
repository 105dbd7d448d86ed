pub(crate) mod latch;
pub(crate) mod sequencer;
pub(crate) mod state;
