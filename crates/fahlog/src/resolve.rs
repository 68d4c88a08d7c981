//! Which of the enumerated platforms and devices a run actually used.
//!
//! The core reports every OpenCL platform it can see, but runs on one device.
//! When the CUDA backend is engaged the status line names the device index on
//! the CUDA platform; otherwise the `-opencl-platform` / `-opencl-device`
//! arguments select it, with index 0 standing in for an absent argument.

use crate::config::ResolveOptions;
use crate::error::ResolveError;
use crate::ir::{Device, PlatformInfo, ScienceLog};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Chosen by the `Using CUDA and gpu N` status line.
    BackendStatus,
    /// Chosen by the OpenCL index arguments, or their defaults.
    Arguments,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveHardware<'a> {
    pub platform_index: usize,
    pub device_index: usize,
    pub platform: &'a PlatformInfo,
    pub device: &'a Device,
    pub selection: Selection,
}

impl ScienceLog {
    /// True when the status line reports the CUDA backend.
    pub fn cuda_enabled(&self) -> bool {
        self.log.backend_status.is_some_and(|status| status.enabled)
    }

    pub fn active_hardware(&self) -> Result<ActiveHardware<'_>, ResolveError> {
        self.active_hardware_with(&ResolveOptions::default())
    }

    pub fn active_hardware_with(
        &self,
        options: &ResolveOptions,
    ) -> Result<ActiveHardware<'_>, ResolveError> {
        let (platform_index, device_index, selection) = match self.log.backend_status {
            Some(status) if status.enabled => {
                let platform_index = self
                    .log
                    .platforms
                    .iter()
                    .position(|p| p.info.name.trim() == options.cuda_platform_name)
                    .ok_or_else(|| ResolveError::BackendPlatformNotFound {
                        name: options.cuda_platform_name.clone(),
                    })?;
                (platform_index, status.selected_index, Selection::BackendStatus)
            }
            _ => (
                self.index_argument(&options.platform_arg)?,
                self.index_argument(&options.device_arg)?,
                Selection::Arguments,
            ),
        };

        let platform = self.log.platforms.get(platform_index).ok_or(
            ResolveError::PlatformOutOfRange {
                index: platform_index,
                available: self.log.platforms.len(),
            },
        )?;
        let device = platform
            .devices
            .get(device_index)
            .ok_or(ResolveError::DeviceOutOfRange {
                platform: platform_index,
                index: device_index,
                available: platform.devices.len(),
            })?;

        log::trace!(
            "active hardware: platform {platform_index}, device {device_index} ({selection:?})"
        );
        Ok(ActiveHardware {
            platform_index,
            device_index,
            platform: &platform.info,
            device,
            selection,
        })
    }

    /// The device the run used; see [`ScienceLog::active_hardware`].
    pub fn active_device(&self) -> Result<&Device, ResolveError> {
        self.active_hardware().map(|active| active.device)
    }

    fn index_argument(&self, key: &str) -> Result<usize, ResolveError> {
        let Some(arg) = self.header.arg(key) else {
            return Ok(0);
        };
        arg.value
            .as_deref()
            .and_then(|value| value.parse().ok())
            .ok_or_else(|| ResolveError::InvalidIndexArgument {
                key: key.to_string(),
                value: arg.value.clone(),
            })
    }
}
