use mlnet_core::errors::{ErrorInfo, MlnError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("aspects", 2)
        .with_context("reason", "example")
}

#[test]
fn shape_error_surface() {
    let err = MlnError::Shape(sample_info("invalid-arity", "wrong number of indices"));
    assert_eq!(err.code(), "invalid-arity");
    assert_eq!(err.info().context.get("aspects"), Some(&"2".to_string()));
}

#[test]
fn coupling_error_keeps_family_when_enriched() {
    let err = MlnError::coupling("inter-layer-write", "multiplex rejects inter-layer edges")
        .with_context("aspect", 1)
        .with_hint("write intra-layer edges only");
    match &err {
        MlnError::Coupling(info) => {
            assert_eq!(info.context.get("aspect"), Some(&"1".to_string()));
            assert_eq!(info.hint.as_deref(), Some("write intra-layer edges only"));
        }
        other => panic!("unexpected family: {other:?}"),
    }
}

#[test]
fn display_includes_context_and_hint() {
    let err = MlnError::Requirement(
        ErrorInfo::new("intersection-length", "bad intersections")
            .with_context("expected", 4)
            .with_hint("one entry per layer subset"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("requirement error: bad intersections"));
    assert!(rendered.contains("expected=4"));
    assert!(rendered.contains("hint: one entry per layer subset"));
}

#[test]
fn errors_round_trip_json() {
    let err = MlnError::BackendMissing(sample_info("no-backend", "missing capability"));
    let json = serde_json::to_string(&err).expect("serialize");
    let decoded: MlnError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
