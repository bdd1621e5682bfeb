pub mod backoff;
pub mod basis;
pub mod download;
pub mod fetch;
pub mod markets;

pub mod util;
