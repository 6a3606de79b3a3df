//! Everything between a selection and the layers a generation call produces.

pub(crate) mod job;
pub(crate) mod policy;
pub(crate) mod prompt;
pub(crate) mod references;
pub(crate) mod service;
