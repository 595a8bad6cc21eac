pub mod cancel;
pub mod consts;
pub mod logging;

pub use cancel::CancellationToken;
