pub mod bundle;
pub mod condition;
pub mod mapping;
pub mod playground;
pub mod search;
pub mod server;
pub mod suggest;

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};

/// Read a file, or stdin when no path is given
pub(crate) fn read_input(file: &Option<String>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}")),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
