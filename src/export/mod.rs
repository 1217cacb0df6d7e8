pub(crate) mod archive;
pub(crate) mod encode;
pub(crate) mod pdf;
pub(crate) mod pipeline;
