#![no_main]
use fahlog::{FormatRevision, ScienceLogParser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Lossy conversion keeps inputs that are "almost" text in play.
    let s = String::from_utf8_lossy(data);
    for revision in [FormatRevision::Current, FormatRevision::Legacy] {
        if let Ok(log) = ScienceLogParser::with_revision(revision).parse(&s) {
            let _ = log.active_hardware();
        }
    }
});
