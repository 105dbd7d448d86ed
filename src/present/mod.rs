pub(crate) mod decor;
pub(crate) mod port;
