//! Format revisions of the science log.
//!
//! The core's log layout drifted between releases: early builds wrote exactly
//! three library banners between the header and the runtime log and never
//! reported a driver version or the selected compute backend, later builds
//! added an optional `OpenMM` banner, `DRIVER_VERSION` lines and the
//! `Using CUDA and gpu N` status line. A [`FormatConfig`] describes one such
//! layout and is selected once per document.

use serde::{Deserialize, Serialize};

/// Banner heading that opens every Core22 log.
pub const CORE_BANNER: &str = "Core22 Folding@home Core";

/// First line of the runtime section, right after the section break.
pub const RUNTIME_BANNER: &str = "Folding@home GPU Core22 Folding@home Core";

/// Platform name under which the CUDA runtime enumerates NVIDIA hardware.
pub const CUDA_PLATFORM_NAME: &str = "NVIDIA CUDA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatRevision {
    /// Three anonymous banners, no driver versions, no backend status line.
    Legacy,
    /// Named banners with optional `OpenMM`, driver versions and backend status.
    #[default]
    Current,
}

impl FormatRevision {
    pub fn config(self) -> FormatConfig {
        match self {
            FormatRevision::Legacy => FormatConfig::legacy(),
            FormatRevision::Current => FormatConfig::current(),
        }
    }
}

/// A diagnostic banner section between the header and the runtime log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerSection {
    pub name: String,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl BannerSection {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionLayout {
    /// Exactly `count` sections, whatever their headings.
    Fixed { count: usize },
    /// The listed sections in order; optional ones may be missing.
    Named { sections: Vec<BannerSection> },
}

impl Default for SectionLayout {
    fn default() -> Self {
        SectionLayout::Named {
            sections: vec![
                BannerSection::required("libFAH"),
                BannerSection::required("CBang"),
                BannerSection::required("System"),
                BannerSection::optional("OpenMM"),
            ],
        }
    }
}

/// What to do with input left over after the runtime log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingInput {
    #[default]
    Ignore,
    /// Only whitespace may follow the last recognised line.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub core_banner: String,
    pub runtime_banner: String,
    pub sections: SectionLayout,
    /// Accept an optional `DRIVER_VERSION` line in device blocks.
    pub driver_version: bool,
    /// Scan for the `Using <backend> and gpu <n>` status line.
    pub backend_status: bool,
    pub trailing: TrailingInput,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self::current()
    }
}

impl FormatConfig {
    pub fn current() -> Self {
        Self {
            core_banner: CORE_BANNER.to_string(),
            runtime_banner: RUNTIME_BANNER.to_string(),
            sections: SectionLayout::default(),
            driver_version: true,
            backend_status: true,
            trailing: TrailingInput::Ignore,
        }
    }

    pub fn legacy() -> Self {
        Self {
            sections: SectionLayout::Fixed { count: 3 },
            driver_version: false,
            backend_status: false,
            ..Self::current()
        }
    }

    pub fn with_trailing(mut self, trailing: TrailingInput) -> Self {
        self.trailing = trailing;
        self
    }
}

/// Knobs for active-device resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Platform `NAME` that identifies the CUDA backend.
    pub cuda_platform_name: String,
    pub platform_arg: String,
    pub device_arg: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            cuda_platform_name: CUDA_PLATFORM_NAME.to_string(),
            platform_arg: "opencl-platform".to_string(),
            device_arg: "opencl-device".to_string(),
        }
    }
}
