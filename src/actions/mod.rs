//! Editor-triggered actions
//!
//! Each action reads what it needs through the host capability traits and
//! returns as soon as its work is queued.

pub mod system_open;

pub use system_open::{open_sys, OpenSysContext};
