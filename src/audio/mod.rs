pub(crate) mod toggle;
