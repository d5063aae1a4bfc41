pub(crate) mod common;
mod selection;
