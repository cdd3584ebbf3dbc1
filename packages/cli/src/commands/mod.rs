pub mod build;
pub mod diff;
pub mod fingerprint;
pub mod init;
pub mod render;
pub mod scan;

pub use build::{build, BuildArgs};
pub use diff::{diff, DiffArgs};
pub use fingerprint::{fingerprint, FingerprintArgs};
pub use init::{init, InitArgs};
pub use render::{render, RenderArgs};
pub use scan::{scan, ScanArgs};
