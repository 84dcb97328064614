use logqa_core::parser::{LineOutcome, LogParser};
use logqa_core::{format_entries, reassemble, split_text, Chunker, ChunkerConfig};

const SAMPLE: &str = "[2024-01-01 10:00:00] auth ERROR: login failed\nnot a log line\n[2024-01-01 10:00:05] auth INFO: retry succeeded";

#[test]
fn test_mixed_input_skips_freeform_line() {
    let parser = LogParser::new();
    let report = parser.parse(SAMPLE);

    assert_eq!(report.entries.len(), 2);
    assert!(report.diagnostics.is_empty()); // middle line never matched, so no warning
    assert_eq!(report.skipped, 1);

    let first = &report.entries[0];
    assert_eq!(first.service, "auth");
    assert_eq!(first.level, "ERROR");
    assert_eq!(first.message, "login failed");
    assert_eq!(first.original, "[2024-01-01 10:00:00] auth ERROR: login failed");

    let second = &report.entries[1];
    assert_eq!(second.service, "auth");
    assert_eq!(second.level, "INFO");
    assert_eq!(second.message, "retry succeeded");
    assert!(first.timestamp < second.timestamp);
}

#[test]
fn test_empty_input() {
    let parser = LogParser::new();
    let report = parser.parse("");

    assert!(report.entries.is_empty());
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.skipped, 0);
}

#[test]
fn test_bad_timestamp_gives_one_diagnostic() {
    let parser = LogParser::new();
    let raw = "[2024-01-01 10:00:00] api INFO: start\n[yesterday] api WARN: clock skew\n[2024-01-01 10:00:09] api INFO: done";
    let report = parser.parse(raw);

    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.entries[0].message, "start");
    assert_eq!(report.entries[1].message, "done");

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].line_number, 2);
    assert_eq!(report.diagnostics[0].line, "[yesterday] api WARN: clock skew");
}

#[test]
fn test_only_malformed_lines() {
    let parser = LogParser::new();
    let raw = "[bad] svc ERROR: one\nno brackets here\n[2024-02-30 00:00:00] svc ERROR: two\n    at stack.trace(Foo.java:1)";
    let report = parser.parse(raw);

    assert!(report.entries.is_empty());
    // the two bracketed lines warn, the other two are silent
    assert_eq!(report.diagnostics.len(), 2);
    assert_eq!(report.skipped, 2);
}

#[test]
fn test_parse_is_deterministic_and_keeps_order() {
    let parser = LogParser::new();
    // out of chronological order on purpose, the parser must not re-sort
    let raw = "[2024-01-01 12:00:00] b INFO: later\n[2024-01-01 09:00:00] a INFO: earlier\n[2024-01-01 12:00:00] b INFO: later";

    let first = parser.parse(raw);
    let second = parser.parse(raw);

    assert_eq!(first, second);
    assert_eq!(first.entries.len(), 3); // duplicates kept
    assert_eq!(first.entries[0].message, "later");
    assert_eq!(first.entries[1].message, "earlier");
}

#[test]
fn test_parse_line_variants() {
    let parser = LogParser::new();
    assert_eq!(parser.parse_line(1, "hello"), LineOutcome::Skipped);
    assert!(matches!(
        parser.parse_line(1, "[2024-01-01 25:00:00] x ERROR: y"),
        LineOutcome::BadTimestamp(_)
    ));
}

#[test]
fn test_entries_serialize() {
    let parser = LogParser::new();
    let report = parser.parse(SAMPLE);
    let json = serde_json::to_value(&report.entries[0]).unwrap();

    assert_eq!(json["service"], "auth");
    assert_eq!(json["level"], "ERROR");
    assert_eq!(json["timestamp"], "2024-01-01T10:00:00");
}

#[test]
fn test_pipeline_round_trip() {
    let parser = LogParser::new();
    let mut raw = String::new();
    for i in 0..50 {
        raw.push_str(&format!(
            "[2024-03-{:02} 08:{:02}:00] svc-{} {}: request {} handled\n",
            (i % 28) + 1,
            i % 60,
            i % 4,
            if i % 7 == 0 { "ERROR" } else { "INFO" },
            i
        ));
    }

    let report = parser.parse(&raw);
    assert_eq!(report.entries.len(), 50);

    let context = format_entries(&report.entries);
    for (size, overlap) in [(1000, 0), (200, 40), (97, 13), (64, 0), (64, 16)] {
        let chunks = Chunker::new(ChunkerConfig::new(size, overlap)).unwrap().split(&context);
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| c.chars().count() <= size), "size {}", size);
        assert_eq!(reassemble(&chunks, overlap), context, "size {} overlap {}", size, overlap);
    }

    let chunks = split_text(&context, 1000, 0).unwrap();
    assert!(chunks[0].starts_with("Time: 2024-03-01 08:00:00\nService: svc-0\nLevel: ERROR"));
}
