//! The runtime log written after the section break: platform and device
//! enumeration, the selected compute backend, and performance samples.

use super::lexical::{index_marker, var_def};
use super::primitives::{
    PResult, blank_line, floating, index, line_with, numbered, semver, take_until_match,
};
use crate::config::FormatConfig;
use crate::ir::{ComputeBackendStatus, CoreLog, Device, Platform, PlatformInfo};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{map, opt, value, verify},
    error::context,
    multi::many0,
    sequence::{delimited, preceded, terminated, tuple},
};

/// Backend name the core prints when it runs on CUDA rather than OpenCL.
pub const CUDA_BACKEND: &str = "CUDA";

fn perf(input: &str) -> PResult<'_, f64> {
    terminated(floating, tag(" ns/day"))(input)
}

pub fn checkpoint_perf(input: &str) -> PResult<'_, f64> {
    context(
        "checkpoint performance line",
        line_with(preceded(tag("Performance since last checkpoint: "), perf)),
    )(input)
}

pub fn average_perf(input: &str) -> PResult<'_, f64> {
    context(
        "average performance line",
        line_with(preceded(tag("Average performance: "), perf)),
    )(input)
}

/// `Using <CUDA|OpenCL> and gpu <index>`
pub fn backend_status(input: &str) -> PResult<'_, ComputeBackendStatus> {
    context(
        "compute backend status line",
        line_with(map(
            tuple((
                tag("Using "),
                alt((tag(CUDA_BACKEND), tag("OpenCL"))),
                tag(" and gpu "),
                index,
            )),
            |(_, backend, _, selected_index)| ComputeBackendStatus {
                enabled: backend == CUDA_BACKEND,
                selected_index,
            },
        )),
    )(input)
}

fn platform_count(input: &str) -> PResult<'_, usize> {
    context(
        "`[N] compatible platform(s):` line",
        line_with(delimited(char('['), index, tag("] compatible platform(s):"))),
    )(input)
}

fn platform_info(input: &str, idx: usize) -> PResult<'_, PlatformInfo> {
    context(
        "platform block",
        preceded(
            index_marker(idx),
            map(
                tuple((
                    var_def("PROFILE"),
                    var_def("VERSION"),
                    var_def("NAME"),
                    var_def("VENDOR"),
                )),
                |(profile, version, name, vendor)| PlatformInfo {
                    profile,
                    version,
                    name,
                    vendor,
                },
            ),
        ),
    )(input)
}

fn device(input: &str, idx: usize, with_driver: bool) -> PResult<'_, Device> {
    let (input, _) = index_marker(idx)(input)?;
    let (input, name) = var_def("DEVICE_NAME")(input)?;
    let (input, vendor) = var_def("DEVICE_VENDOR")(input)?;
    let (input, version) = var_def("DEVICE_VERSION")(input)?;
    let (input, driver_version) = if with_driver {
        opt(var_def("DRIVER_VERSION"))(input)?
    } else {
        (input, None)
    };

    Ok((
        input,
        Device {
            name,
            vendor,
            version,
            driver_version,
        },
    ))
}

/// `(<count>) device(s) found on platform <idx>:` followed by the devices
/// and a blank line.
fn device_listing<'a>(
    input: &'a str,
    platform_idx: usize,
    with_driver: bool,
) -> PResult<'a, Vec<Device>> {
    let (input, count) = context(
        "`(N) device(s) found on platform` line",
        line_with(terminated(
            delimited(char('('), index, tag(") device(s) found on platform ")),
            tuple((verify(index, |n: &usize| *n == platform_idx), char(':'))),
        )),
    )(input)?;
    let (input, devices) = numbered(input, count, |input: &'a str, idx| {
        context("device block", |i: &'a str| device(i, idx, with_driver))(input)
    })?;
    let (input, _) = blank_line(input)?;
    Ok((input, devices))
}

fn any_perf_line(input: &str) -> PResult<'_, ()> {
    alt((value((), checkpoint_perf), value((), average_perf)))(input)
}

fn checkpoint_perfs(input: &str) -> PResult<'_, Vec<f64>> {
    many0(preceded(take_until_match(any_perf_line), checkpoint_perf))(input)
}

fn located_backend_status(input: &str) -> PResult<'_, Option<ComputeBackendStatus>> {
    opt(preceded(
        take_until_match(alt((value((), backend_status), any_perf_line))),
        backend_status,
    ))(input)
}

pub fn core_log<'a>(input: &'a str, config: &FormatConfig) -> PResult<'a, CoreLog> {
    let (input, _) = context(
        "runtime banner",
        line_with(tag(config.runtime_banner.as_str())),
    )(input)?;
    let (input, version) = context(
        "`Version` line",
        line_with(preceded(tag("Version "), semver)),
    )(input)?;
    let (input, count) = platform_count(input)?;
    let (input, infos) = numbered(input, count, platform_info)?;
    let (mut input, _) = blank_line(input)?;

    let mut platforms = Vec::with_capacity(infos.len());
    for (idx, info) in infos.into_iter().enumerate() {
        let (rest, devices) = device_listing(input, idx, config.driver_version)?;
        platforms.push(Platform { info, devices });
        input = rest;
    }

    let (input, backend_status) = if config.backend_status {
        located_backend_status(input)?
    } else {
        (input, None)
    };
    let (input, checkpoint_perfs) = checkpoint_perfs(input)?;
    let (input, average_perf) =
        opt(preceded(take_until_match(average_perf), average_perf))(input)?;

    Ok((
        input,
        CoreLog {
            version,
            platforms,
            backend_status,
            checkpoint_perfs,
            average_perf,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::SemVer;

    const BODY: &str = "\
Folding@home GPU Core22 Folding@home Core
Version 0.0.11
  [2] compatible platform(s):
    -- 0 --
      PROFILE = FULL_PROFILE
      VERSION = OpenCL 1.2 CUDA 11.0.228
         NAME = NVIDIA CUDA
       VENDOR = NVIDIA Corporation
    -- 1 --
      PROFILE = FULL_PROFILE
      VERSION = OpenCL 2.1 AMD-APP (3110.6)
         NAME = AMD Accelerated Parallel Processing
       VENDOR = Advanced Micro Devices, Inc.

  (1) device(s) found on platform 0:
    -- 0 --
        DEVICE_NAME = GeForce RTX 2070 SUPER
      DEVICE_VENDOR = NVIDIA Corporation
     DEVICE_VERSION = OpenCL 1.2 CUDA
     DRIVER_VERSION = 451.48

  (1) device(s) found on platform 1:
    -- 0 --
        DEVICE_NAME = Ellesmere
      DEVICE_VENDOR = Advanced Micro Devices, Inc.
     DEVICE_VERSION = OpenCL 2.0 AMD-APP (3110.6)

Reading tar file core.xml
Using CUDA and gpu 0
Completed 0 out of 2500000 steps (0%)
Completed 25000 out of 2500000 steps (1%)
Performance since last checkpoint: 112.36 ns/day
Completed 50000 out of 2500000 steps (2%)
Performance since last checkpoint: 113 ns/day
Completed 2500000 out of 2500000 steps (100%)
Average performance: 112.5 ns/day
Saving result file ..\\logfile_01.txt
";

    #[test]
    fn test_core_log_structure() {
        let (rest, log) = core_log(BODY, &FormatConfig::current()).unwrap();
        assert!(rest.trim_start().starts_with("Saving result file"));
        assert_eq!(log.version, SemVer::new(0, 0, 11));
        assert_eq!(log.platforms.len(), 2);
        assert_eq!(log.platforms[0].info.name, "NVIDIA CUDA");
        assert_eq!(log.platforms[1].info.vendor, "Advanced Micro Devices, Inc.");
        assert_eq!(log.platforms[0].devices[0].driver_version.as_deref(), Some("451.48"));
        assert_eq!(log.platforms[1].devices[0].driver_version, None);
        assert_eq!(
            log.backend_status,
            Some(ComputeBackendStatus {
                enabled: true,
                selected_index: 0
            })
        );
        assert_eq!(log.checkpoint_perfs, vec![112.36, 113.0]);
        assert_eq!(log.average_perf, Some(112.5));
    }

    #[test]
    fn test_status_line_after_checkpoint_is_not_picked_up() {
        let body = BODY.replace("Using CUDA and gpu 0\n", "").replace(
            "Completed 50000",
            "Using OpenCL and gpu 1\nCompleted 50000",
        );
        let (_, log) = core_log(&body, &FormatConfig::current()).unwrap();
        assert_eq!(log.backend_status, None);
        assert_eq!(log.checkpoint_perfs.len(), 2);
    }

    #[test]
    fn test_opencl_status_is_not_enabled() {
        let body = BODY.replace("Using CUDA and gpu 0", "Using OpenCL and gpu 1");
        let (_, log) = core_log(&body, &FormatConfig::current()).unwrap();
        assert_eq!(
            log.backend_status,
            Some(ComputeBackendStatus {
                enabled: false,
                selected_index: 1
            })
        );
    }

    #[test]
    fn test_legacy_revision_ignores_driver_and_status() {
        let body = BODY.replace("     DRIVER_VERSION = 451.48\n", "");
        let (_, log) = core_log(&body, &FormatConfig::legacy()).unwrap();
        assert_eq!(log.backend_status, None);
        assert_eq!(log.platforms[0].devices[0].driver_version, None);
    }

    #[test]
    fn test_zero_platforms() {
        let body = "\
Folding@home GPU Core22 Folding@home Core
Version 0.0.11
  [0] compatible platform(s):

Average performance: 10 ns/day
";
        let (_, log) = core_log(body, &FormatConfig::current()).unwrap();
        assert!(log.platforms.is_empty());
        assert!(log.checkpoint_perfs.is_empty());
        assert_eq!(log.average_perf, Some(10.0));
    }

    #[test]
    fn test_device_listing_checks_platform_index() {
        let body = BODY.replace("found on platform 1:", "found on platform 2:");
        assert!(core_log(&body, &FormatConfig::current()).is_err());
    }

    #[test]
    fn test_declared_device_count_is_enforced() {
        let body = BODY.replace(
            "(1) device(s) found on platform 1:",
            "(2) device(s) found on platform 1:",
        );
        assert!(core_log(&body, &FormatConfig::current()).is_err());
    }
}
