//! Real browser backends.

pub mod cdp;
pub mod webdriver;
