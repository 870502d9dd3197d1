//! Running the `hue-control` executable as a subprocess
//!
//! Only used when lights should be driven through the installed
//! binary instead of the in-process [crate::BridgeClient].

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::models::{SetRequest, Target};
use crate::{Error, Result};

/// Name of the bridge client executable
pub const BRIDGE_BINARY: &str = "hue-control";

const CONVENTIONAL_PATHS: [&str; 3] = [
    "./hue-control",
    "../hue-control/hue-control",
    "./scripts/hue-control/hue-control",
];

fn binary_name() -> String {
    format!("{}{}", BRIDGE_BINARY, env::consts::EXE_SUFFIX)
}

/// Every place the executable may live, in the order they are tried
///
/// Next to our own executable (sibling `hue-control/` directory, then
/// the same directory), each `PATH` entry, then a few conventional
/// paths relative to `cwd`.
pub fn candidates(exe: Option<&Path>, path_var: Option<&OsStr>, cwd: &Path) -> Vec<PathBuf> {
    let name = binary_name();
    let mut paths = Vec::new();

    if let Some(dir) = exe.and_then(Path::parent) {
        paths.push(dir.join("..").join(BRIDGE_BINARY).join(&name));
        paths.push(dir.join(&name));
    }

    if let Some(path_var) = path_var {
        paths.extend(env::split_paths(path_var).map(|dir| dir.join(&name)));
    }

    paths.extend(
        CONVENTIONAL_PATHS
            .iter()
            .map(|p| cwd.join(format!("{}{}", p, env::consts::EXE_SUFFIX))),
    );
    paths
}

/// Locate the `hue-control` executable for this process
pub fn find_bridge_binary() -> Result<PathBuf> {
    let exe = env::current_exe().ok();
    let path_var = env::var_os("PATH");
    let cwd = env::current_dir().map_err(|e| Error::io("current directory", e))?;

    candidates(exe.as_deref(), path_var.as_deref(), &cwd)
        .into_iter()
        .find(|p| {
            debug!("looking for {} at {}", BRIDGE_BINARY, p.display());
            p.is_file()
        })
        .ok_or_else(|| Error::DependencyMissing(BRIDGE_BINARY.to_string()))
}

/// Command line for a `hue-control set` call
///
/// # Examples
///
/// ```
/// use hue_control::delegate::set_args;
/// use hue_control::models::{Brightness, ColorPreset, SetRequest, Target};
///
/// let mut request = SetRequest::new(Brightness::create(80).unwrap());
/// request.color(ColorPreset::Cool);
///
/// assert_eq!(
///     set_args(&Target::All, &request),
///     vec!["set", "--color", "cool", "--brightness", "80"]
/// );
/// assert_eq!(
///     set_args(&Target::Room("Den".to_string()), &request),
///     vec!["set", "--color", "cool", "--brightness", "80", "--room", "Den"]
/// );
/// ```
///
pub fn set_args(target: &Target, request: &SetRequest) -> Vec<String> {
    let mut args = vec!["set".to_string()];
    if let Some(color) = request.preset() {
        args.push("--color".to_string());
        args.push(color.to_string());
    }
    args.push("--brightness".to_string());
    args.push(request.brightness().value().to_string());
    if let Target::Room(name) = target {
        args.push("--room".to_string());
        args.push(name.clone());
    }
    args
}

/// Run `hue-control set` with our stdio, waiting for it to finish
pub fn run_set(binary: &Path, target: &Target, request: &SetRequest) -> Result<()> {
    let args = set_args(target, request);
    debug!("running {} {:?}", binary.display(), args);

    let status = Command::new(binary)
        .args(&args)
        .status()
        .map_err(|e| Error::io("spawn hue-control", e))?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::DelegateFailed(status))
    }
}
