#![deny(warnings)]
pub mod codec;
pub mod model;
pub mod scoring;
pub mod session;
pub mod survey;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "votematch"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
