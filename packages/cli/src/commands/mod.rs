pub mod demo;
pub mod init;

pub use demo::{demo, DemoArgs};
pub use init::{init, InitArgs};
