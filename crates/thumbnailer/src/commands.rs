mod handle;
mod serve;

pub(crate) use handle::handle;
pub(crate) use serve::serve;
