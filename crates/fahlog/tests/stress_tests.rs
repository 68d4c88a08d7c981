use std::fmt::Write;
use std::time::{Duration, Instant};

const CURRENT: &str = include_str!("fixtures/current_cuda.log");

fn with_checkpoints(count: usize) -> String {
    let start = CURRENT.find("Completed 0 out of").unwrap();
    let mut text = CURRENT[..start].to_string();
    for i in 0..count {
        writeln!(text, "Completed {} out of 1000000 steps", i * 1000).unwrap();
        writeln!(text, "Performance since last checkpoint: {}.25 ns/day", 100 + i % 50).unwrap();
    }
    text.push_str("Average performance: 124.5 ns/day\n");
    text
}

#[test]
fn test_many_checkpoints() {
    let log = fahlog::parse(&with_checkpoints(20_000)).unwrap();
    assert_eq!(log.log.checkpoint_perfs.len(), 20_000);
    assert_eq!(log.log.checkpoint_perfs[49], 149.25);
    assert_eq!(log.log.average_perf, Some(124.5));
}

#[test]
fn test_large_unstructured_tail() {
    let mut text = CURRENT.to_string();
    for i in 0..50_000 {
        writeln!(text, "Saving result file part{i}.bin").unwrap();
    }
    let log = fahlog::parse(&text).unwrap();
    assert_eq!(log.log.average_perf, Some(182.71));
}

#[test]
fn test_many_devices() {
    let mut devices = String::new();
    for i in 0..256 {
        writeln!(
            devices,
            "    -- {i} --\n        DEVICE_NAME = GPU {i}\n      \
             DEVICE_VENDOR = Acme\n     DEVICE_VERSION = OpenCL 3.0"
        )
        .unwrap();
    }
    let start = CURRENT.find("  (2) device(s) found on platform 1:").unwrap();
    let end = CURRENT.find("Reading tar file core.xml").unwrap();
    let text = format!(
        "{}  (256) device(s) found on platform 1:\n{devices}\n{}",
        &CURRENT[..start],
        &CURRENT[end..]
    );
    let log = fahlog::parse(&text).unwrap();
    assert_eq!(log.log.platforms[1].devices.len(), 256);
    assert_eq!(log.log.platforms[1].devices[255].name, "GPU 255");
    assert_eq!(log.active_device().unwrap().name, "GPU 1");
}

/// Whitespace runs are scanned once; a quadratic rescan would take minutes
/// at these sizes.
const PADDING: usize = 200_000;

fn parse_within_budget(text: &str) -> fahlog::ScienceLog {
    let start = Instant::now();
    let log = fahlog::parse(text).unwrap();
    assert!(start.elapsed() < Duration::from_secs(5), "took {:?}", start.elapsed());
    log
}

#[test]
fn test_blank_lines_inside_banner() {
    let cpu = CURRENT.find("        CPU:").unwrap();
    let text = format!("{}{}{}", &CURRENT[..cpu], "\n".repeat(PADDING), &CURRENT[cpu..]);
    let log = parse_within_budget(&text);
    assert_eq!(log.log.platforms.len(), 2);
}

#[test]
fn test_blank_run_before_checkpoints() {
    let completed = CURRENT.find("Completed 0 out of").unwrap();
    let padding = " \n".repeat(PADDING);
    let text = format!("{}{padding}{}", &CURRENT[..completed], &CURRENT[completed..]);
    let log = parse_within_budget(&text);
    assert_eq!(log.log.checkpoint_perfs, vec![181.62, 183.4]);
}

#[test]
fn test_indented_checkpoint_line() {
    let completed = CURRENT.find("Completed 0 out of").unwrap();
    let indent = " ".repeat(PADDING);
    let text = format!("{}{indent}{}", &CURRENT[..completed], &CURRENT[completed..]);
    let log = parse_within_budget(&text);
    assert_eq!(log.log.average_perf, Some(182.71));
}
