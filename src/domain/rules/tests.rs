// Unit tests for business rules

use super::*;

fn domains() -> Vec<String> {
    vec!["youtube.com".to_string(), "youtu.be".to_string()]
}

#[test]
fn test_resolve_defaults_to_full_range() {
    for duration in [1, 59, 300, 36_000] {
        let window = WindowResolver::resolve(None, None, duration).unwrap();
        assert_eq!(window.start(), 0);
        assert_eq!(window.end(), duration);
        assert!(window.is_full_range());
    }
}

#[test]
fn test_resolve_negative_start() {
    let window = WindowResolver::resolve(Some(-10), None, 100).unwrap();
    assert_eq!(window.start(), 90);
    assert_eq!(window.end(), 100);
    assert_eq!(window.length(), 10);
}

#[test]
fn test_resolve_negative_end() {
    let window = WindowResolver::resolve(Some(5), Some(-5), 100).unwrap();
    assert_eq!(window.start(), 5);
    assert_eq!(window.end(), 95);
}

#[test]
fn test_resolve_explicit_bounds() {
    let window = WindowResolver::resolve(Some(20), Some(50), 100).unwrap();
    assert_eq!((window.start(), window.end()), (20, 50));
    assert!(!window.is_full_range());
}

#[test]
fn test_resolve_start_after_end() {
    let err = WindowResolver::resolve(Some(60), Some(50), 100).unwrap_err();
    assert!(matches!(err, DomainError::InvalidWindow(_)));
    assert!(err.to_string().contains("greater than end time"));
}

#[test]
fn test_resolve_bounds_beyond_duration() {
    assert!(WindowResolver::resolve(Some(101), None, 100).is_err());
    assert!(WindowResolver::resolve(None, Some(101), 100).is_err());
}

#[test]
fn test_resolve_negative_past_beginning() {
    assert!(WindowResolver::resolve(Some(-101), None, 100).is_err());
    assert!(WindowResolver::resolve(None, Some(-200), 100).is_err());
}

#[test]
fn test_resolve_specs() {
    let window = WindowResolver::resolve_specs(
        Some(TimeSpec::parse("0:30").unwrap()),
        Some(TimeSpec::parse("-0:10").unwrap()),
        120,
    )
    .unwrap();
    assert_eq!((window.start(), window.end()), (30, 110));
}

#[test]
fn test_classify_existing_file_is_local() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("clip.mp4");
    std::fs::write(&file, b"data").unwrap();

    let source = SourceClassifier::classify(file.to_str().unwrap(), &domains()).unwrap();
    assert_eq!(source, Source::Local(file));
    assert!(!source.is_remote());
}

#[test]
fn test_classify_supported_url() {
    let source =
        SourceClassifier::classify("https://www.youtube.com/watch?v=dQw4w9WgXcQ", &domains())
            .unwrap();
    assert!(source.is_remote());

    let short = SourceClassifier::classify("https://YOUTU.BE/dQw4w9WgXcQ", &domains()).unwrap();
    assert!(short.is_remote());
}

#[test]
fn test_classify_unsupported() {
    let err = SourceClassifier::classify("https://example.com/video.mp4", &domains()).unwrap_err();
    assert_eq!(
        err,
        DomainError::UnsupportedSource("https://example.com/video.mp4".to_string())
    );
    assert!(SourceClassifier::classify("missing-file.mp4", &domains()).is_err());
}
