mod split_handle;

pub use split_handle::SplitHandle;
