// Unit tests for domain models

use super::*;

#[test]
fn test_time_spec_parse_seconds() {
    assert_eq!(TimeSpec::parse("45").unwrap().as_seconds(), 45);
    assert_eq!(TimeSpec::parse("0").unwrap().as_seconds(), 0);
}

#[test]
fn test_time_spec_parse_mm_ss() {
    assert_eq!(TimeSpec::parse("01:30").unwrap().as_seconds(), 90);
}

#[test]
fn test_time_spec_parse_hh_mm_ss() {
    assert_eq!(TimeSpec::parse("1:02:03").unwrap().as_seconds(), 3723);
}

#[test]
fn test_time_spec_parse_days() {
    assert_eq!(TimeSpec::parse("1:00:00:00").unwrap().as_seconds(), 86_400);
    assert_eq!(TimeSpec::parse("2:01:01:01").unwrap().as_seconds(), 176_461);
}

#[test]
fn test_time_spec_components_are_not_range_checked() {
    // 90 seconds written as a single component or overflowing minutes
    assert_eq!(TimeSpec::parse("0:90").unwrap().as_seconds(), 90);
    assert_eq!(TimeSpec::parse("75:00").unwrap().as_seconds(), 4500);
}

#[test]
fn test_time_spec_parse_negative() {
    let time = TimeSpec::parse("-0:10").unwrap();
    assert_eq!(time.as_seconds(), -10);
    assert!(time.is_negative());
    assert_eq!(TimeSpec::parse("-1:00").unwrap().as_seconds(), -60);
}

#[test]
fn test_time_spec_trims_whitespace() {
    assert_eq!(TimeSpec::parse("  2:00 ").unwrap().as_seconds(), 120);
}

#[test]
fn test_time_spec_parse_invalid() {
    assert!(TimeSpec::parse("").is_err());
    assert!(TimeSpec::parse("abc").is_err());
    assert!(TimeSpec::parse("1:xx").is_err());
    assert!(TimeSpec::parse("1::2").is_err());
    assert!(TimeSpec::parse("1.5").is_err());
    assert!(TimeSpec::parse("-").is_err());
    assert!(TimeSpec::parse("--5").is_err());
    assert!(TimeSpec::parse("1:-5").is_err());
    assert!(TimeSpec::parse("+5").is_err());
}

#[test]
fn test_time_spec_too_many_components() {
    let err = TimeSpec::parse("1:2:3:4:5").unwrap_err();
    assert!(matches!(err, DomainError::InvalidTimeSpec { .. }));
    assert!(err.to_string().contains("1:2:3:4:5"));
}

#[test]
fn test_time_spec_overflow_is_an_error() {
    assert!(TimeSpec::parse("99999999999999999999").is_err());
    assert!(TimeSpec::parse("999999999999999:00:00:00").is_err());
}

#[test]
fn test_time_spec_display() {
    assert_eq!(TimeSpec::from_seconds(3723).to_string(), "1:02:03");
    assert_eq!(TimeSpec::from_seconds(-10).to_string(), "-0:00:10");
    assert_eq!(TimeSpec::from_seconds(90_000).to_string(), "25:00:00");
}

#[test]
fn test_time_spec_from_str() {
    let time: TimeSpec = "2:30".parse().unwrap();
    assert_eq!(time.as_seconds(), 150);
}

#[test]
fn test_window_full_range() {
    let window = Window::full(120);
    assert_eq!(window.start(), 0);
    assert_eq!(window.end(), 120);
    assert_eq!(window.length(), 120);
    assert!(window.is_full_range());
}

#[test]
fn test_window_partial_range() {
    let window = Window::new(10, 40, 120).unwrap();
    assert_eq!(window.length(), 30);
    assert!(!window.is_full_range());
}

#[test]
fn test_window_invalid() {
    assert!(Window::new(130, 130, 120).is_err());
    assert!(Window::new(0, 121, 120).is_err());
    assert!(Window::new(50, 40, 120).is_err());
}

#[test]
fn test_window_empty_range_is_allowed() {
    let window = Window::new(30, 30, 120).unwrap();
    assert_eq!(window.length(), 0);
}

#[test]
fn test_media_handle_accessors() {
    let handle = MediaHandle::input("/videos/clip.mkv");
    assert_eq!(handle.kind(), HandleKind::Input);
    assert_eq!(handle.file_name(), "clip.mkv");
    assert_eq!(handle.extension().as_deref(), Some("mkv"));

    let bare = MediaHandle::new("/videos/clip", HandleKind::Segment);
    assert_eq!(bare.extension(), None);
}

#[test]
fn test_manifest_render_repeats_entries() {
    let mut manifest = Manifest::new();
    manifest.push_repeated(Path::new("/tmp/a.mp4"), 2);
    manifest.push_repeated(Path::new("/tmp/b.mp4"), 1);
    manifest.push_repeated(Path::new("/tmp/c.mp4"), 0);

    assert_eq!(manifest.len(), 3);
    assert_eq!(
        manifest.render(),
        "file '/tmp/a.mp4'\nfile '/tmp/a.mp4'\nfile '/tmp/b.mp4'\n"
    );
    assert_eq!(manifest.source_extension().as_deref(), Some("mp4"));
}

#[test]
fn test_manifest_escapes_single_quotes() {
    let mut manifest = Manifest::new();
    manifest.push_repeated(Path::new("/tmp/it's.mp4"), 1);
    assert_eq!(manifest.render(), "file '/tmp/it'\\''s.mp4'\n");
}

#[test]
fn test_empty_manifest() {
    let manifest = Manifest::new();
    assert!(manifest.is_empty());
    assert_eq!(manifest.render(), "");
    assert_eq!(manifest.source_extension(), None);
}
