#[cfg(feature = "context")]
mod context;
#[cfg(feature = "http")]
mod http;
