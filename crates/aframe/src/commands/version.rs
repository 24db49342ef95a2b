//! Version command

use anyhow::Result;
use serde::Serialize;

use crate::cli::VersionArgs;

#[derive(Debug, Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
}

impl VersionInfo {
    fn current() -> Self {
        Self {
            name: "aframe",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

pub fn run(args: VersionArgs) -> Result<()> {
    let info = VersionInfo::current();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{} {}", info.name, info.version);
    }
    Ok(())
}
