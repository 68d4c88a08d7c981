use crate::discover::LogFile;
use fahlog::{ResolveError, ResolveOptions, ScienceLog};
use serde::{Deserialize, Serialize};

/// One log reduced to the identity of the hardware that ran it and the
/// throughput it reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub run: u32,
    pub clone: u32,
    #[serde(rename = "gen")]
    pub generation: u32,
    /// The header's `Platform` property, e.g. `win32 10`.
    pub os: String,
    pub platform_name: String,
    pub platform_vendor: String,
    pub platform_version: String,
    pub device_name: String,
    pub device_vendor: String,
    pub device_version: String,
    pub driver_version: Option<String>,
    pub cuda_enabled: bool,
    pub average_perf: Option<f64>,
}

impl ResultRow {
    pub fn from_log(
        file: &LogFile,
        log: &ScienceLog,
        options: &ResolveOptions,
    ) -> Result<Self, ResolveError> {
        let active = log.active_hardware_with(options)?;
        Ok(Self {
            run: file.run,
            clone: file.clone,
            generation: file.generation,
            os: log.header.platform.clone(),
            platform_name: active.platform.name.clone(),
            platform_vendor: active.platform.vendor.clone(),
            platform_version: active.platform.version.clone(),
            device_name: active.device.name.clone(),
            device_vendor: active.device.vendor.clone(),
            device_version: active.device.version.clone(),
            driver_version: active.device.driver_version.clone(),
            cuda_enabled: log.cuda_enabled(),
            average_perf: log.log.average_perf,
        })
    }
}
