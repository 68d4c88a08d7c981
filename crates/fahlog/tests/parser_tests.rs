use fahlog::config::{BannerSection, SectionLayout};
use fahlog::ir::{ComputeBackendStatus, SemVer};
use fahlog::{FormatConfig, FormatRevision, LoadError, ScienceLogParser};
use std::io::Write;

const CURRENT: &str = include_str!("fixtures/current_cuda.log");
const LEGACY: &str = include_str!("fixtures/legacy_opencl.log");

#[test]
fn test_current_fixture_structure() {
    let log = fahlog::parse(CURRENT).unwrap();

    assert_eq!(log.header.core, "Core22");
    assert_eq!(log.header.version, SemVer::new(0, 0, 11));
    assert_eq!(log.header.date.to_string(), "2020-06-26");
    assert_eq!(log.header.args.len(), 10);

    assert_eq!(log.log.platform_count(), 2);
    assert_eq!(log.log.device_count(), 2);
    assert!(log.log.platforms[0].devices.is_empty());
    assert_eq!(
        log.log.platforms[1].devices[1].name,
        "GeForce GTX 1060 6GB"
    );
    assert_eq!(
        log.log.backend_status,
        Some(ComputeBackendStatus {
            enabled: true,
            selected_index: 1
        })
    );
    assert_eq!(log.log.checkpoint_perfs, vec![181.62, 183.4]);
    assert_eq!(log.log.average_perf, Some(182.71));
}

#[test]
fn test_legacy_fixture_with_both_revisions() {
    let legacy = ScienceLogParser::with_revision(FormatRevision::Legacy)
        .parse(LEGACY)
        .unwrap();
    assert_eq!(legacy.log.platforms[0].devices.len(), 2);
    assert_eq!(legacy.log.backend_status, None);

    // Three named banners also satisfy the current layout.
    let current = fahlog::parse(LEGACY).unwrap();
    assert_eq!(current, legacy);
}

#[test]
fn test_legacy_revision_rejects_current_layout() {
    let parser = ScienceLogParser::with_revision(FormatRevision::Legacy);
    assert!(parser.parse(CURRENT).is_err());

    // Even with three banners, `DRIVER_VERSION` is not part of a legacy device block.
    let heading = CURRENT.find("* OpenMM *").unwrap();
    let start = CURRENT[..heading].rfind('\n').unwrap() + 1;
    let rule = start + CURRENT[start..].find(&"*".repeat(80)).unwrap();
    let three_banners = format!("{}{}", &CURRENT[..start], &CURRENT[rule..]);
    assert!(fahlog::parse(&three_banners).is_ok());
    assert!(parser.parse(&three_banners).is_err());
}

#[test]
fn test_crlf_line_endings() {
    let crlf = CURRENT.replace('\n', "\r\n");
    let log = fahlog::parse(&crlf).unwrap();
    let expected = fahlog::parse(CURRENT).unwrap();
    assert_eq!(log.log, expected.log);
    assert_eq!(log.header.args, expected.header.args);
    assert_eq!(log.header.date, expected.header.date);
}

#[test]
fn test_missing_mandatory_section() {
    let text = CURRENT.replacen("CBang", "Cbang", 1);
    let err = fahlog::parse(&text).unwrap_err();
    assert_eq!(err.expected, "named banner section");
}

#[test]
fn test_custom_section_layout() {
    let config = FormatConfig {
        sections: SectionLayout::Named {
            sections: vec![
                BannerSection::required("libFAH"),
                BannerSection::optional("Extra"),
                BannerSection::required("CBang"),
                BannerSection::required("System"),
                BannerSection::required("OpenMM"),
            ],
        },
        ..FormatConfig::current()
    };
    let log = ScienceLogParser::with_config(config).parse(CURRENT).unwrap();
    assert_eq!(log.log.platform_count(), 2);
}

#[test]
fn test_platform_count_mismatch_is_fatal() {
    let text = CURRENT.replace("[2] compatible platform(s):", "[3] compatible platform(s):");
    let err = fahlog::parse(&text).unwrap_err();
    assert_eq!(err.expected, "`-- <index> --` marker");
}

#[test]
fn test_error_message_names_line() {
    let text = CURRENT.replace(
        "       Date: Jun 26 2020\n       Time: 19:49:16",
        "       Date: 26/06/2020\n       Time: 19:49:16",
    );
    let err = fahlog::parse(&text).unwrap_err();
    assert_eq!(err.line, 8);
    assert_eq!(err.expected, "build date like `Jan 5 2023`");
    assert!(err.to_string().contains("in core header"));
}

#[test]
fn test_read_science_log_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CURRENT.as_bytes()).unwrap();
    let log = fahlog::read_science_log(file.path()).unwrap();
    assert_eq!(log.log.average_perf, Some(182.71));
}

#[test]
fn test_load_errors_are_distinct() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0x2a, 0xff, 0xfe, 0x0a]).unwrap();
    let err = fahlog::read_science_log(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::Decode { .. }));
    assert_eq!(err.path(), file.path());

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"not a science log\n").unwrap();
    let err = fahlog::read_science_log(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));

    let err = fahlog::read_science_log("does/not/exist/science.log").unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}
