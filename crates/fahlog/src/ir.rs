use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SemVer {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SemVer {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// One `-key [value]` entry of the core's `Args:` property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandArgument {
    pub key: String,
    pub value: Option<String>,
}

impl CommandArgument {
    pub fn new(key: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            key: key.into(),
            value: value.map(str::to_string),
        }
    }

    pub fn flag(key: impl Into<String>) -> Self {
        Self::new(key, None)
    }
}

/// The fixed preamble written by the core before any library banners.
///
/// String fields hold the text exactly as logged. Values the core wrapped
/// across several physical lines keep their embedded line breaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreHeader {
    pub core: String,
    #[serde(rename = "type")]
    pub core_type: String,
    pub version: SemVer,
    pub author: String,
    pub copyright: String,
    pub homepage: String,
    pub date: NaiveDate,
    pub time: String,
    pub revision: String,
    pub branch: String,
    pub compiler: String,
    pub options: String,
    pub platform: String,
    pub bits: String,
    pub mode: String,
    pub maintainers: String,
    pub args: Vec<CommandArgument>,
}

impl CoreHeader {
    /// Returns the first argument with the given key.
    pub fn arg(&self, key: &str) -> Option<&CommandArgument> {
        self.args.iter().find(|arg| arg.key == key)
    }

    /// Returns the value of the first argument with the given key, if it has one.
    pub fn arg_value(&self, key: &str) -> Option<&str> {
        self.arg(key).and_then(|arg| arg.value.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub profile: String,
    pub version: String,
    pub name: String,
    pub vendor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    pub vendor: String,
    pub version: String,
    pub driver_version: Option<String>,
}

/// A compute platform together with the devices enumerated under it.
///
/// Device order is the order of the `-- N --` markers in the log, so
/// `devices[i]` is device index `i` as referenced by `-opencl-device`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub info: PlatformInfo,
    pub devices: Vec<Device>,
}

/// Outcome of the core's `Using <backend> and gpu <n>` report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeBackendStatus {
    /// True when the core engaged the CUDA backend.
    pub enabled: bool,
    pub selected_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreLog {
    pub version: SemVer,
    pub platforms: Vec<Platform>,
    pub backend_status: Option<ComputeBackendStatus>,
    /// `Performance since last checkpoint` samples in ns/day, in log order.
    pub checkpoint_perfs: Vec<f64>,
    /// Final `Average performance` in ns/day; `None` when the run was cut short.
    pub average_perf: Option<f64>,
}

impl CoreLog {
    pub fn platform_count(&self) -> usize {
        self.platforms.len()
    }

    pub fn device_count(&self) -> usize {
        self.platforms.iter().map(|p| p.devices.len()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.average_perf.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScienceLog {
    pub header: CoreHeader,
    pub log: CoreLog,
}
