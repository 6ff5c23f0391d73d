#![doc = include_str!("../README.md")]

mod common;
mod config;
mod dump;
mod error;
mod monitor;
mod resolver;
mod store;

pub use crate::common::{IpVersion, Prefix, SreEntry, MAX_V6_ANCHOR};
pub use crate::config::Config;
pub use crate::error::{
    AddError, ConfigError, DumpError, DuplicateError, ParseError, RangeError, ResolveError,
};
pub use crate::monitor::Monitor;
