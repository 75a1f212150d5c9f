use brems_core::errors::{BremsError, ExError, ExErrorKind};
use brems_core::model::parse_proposed_strict;
use brems_core::ReviewConfig;
use brems_core_types::RequestId;

#[test]
fn test_invalid_proposal_verifiable_by_kind() {
    let err = BremsError::InvalidProposal {
        reason: "root is an array".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidProposal);
    assert_eq!(ex_err.code(), "ERR_INVALID_PROPOSAL");
    assert_eq!(ex_err.op(), Some("parse_proposed"));
    assert!(ex_err.message().contains("array"));
}

#[test]
fn test_unknown_entity_is_config_error() {
    let ex_err: ExError = BremsError::UnknownEntity {
        entity: "uncle".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidConfig);
    assert_eq!(ex_err.section(), Some("suppress_defaults"));
    assert!(ex_err.to_string().contains("uncle"));
}

#[test]
fn test_config_read_maps_to_io() {
    let err = ReviewConfig::load("/definitely/not/here/review.toml").unwrap_err();
    assert!(matches!(err, BremsError::ConfigRead { .. }));

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::Io);
    assert_eq!(ex_err.op(), Some("load_config"));
}

#[test]
fn test_strict_parse_errors() {
    for text in ["", "not json", "[1]", "\"{}\"", "null"] {
        let err = parse_proposed_strict(text).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidProposal, "input {:?}", text);
    }
}

#[test]
fn test_request_id_in_display() {
    let request_id = RequestId::new();
    let err = ExError::new(ExErrorKind::InvalidInput)
        .with_op("review")
        .with_request_id(request_id.clone())
        .with_message("--request and --current are exclusive");

    let s = err.to_string();
    assert!(s.starts_with("[ERR_INVALID_INPUT] in operation 'review'"));
    assert!(s.contains(request_id.as_str()));
    assert_eq!(err.request_id(), Some(&request_id));
}

#[test]
fn test_error_kind_codes_are_unique() {
    let kinds = [
        ExErrorKind::InvalidInput,
        ExErrorKind::InvalidProposal,
        ExErrorKind::InvalidSnapshot,
        ExErrorKind::UnexpectedValueShape,
        ExErrorKind::InvalidConfig,
        ExErrorKind::InvalidDateFormat,
        ExErrorKind::Io,
        ExErrorKind::Serialization,
    ];
    let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), kinds.len());
    assert!(codes.iter().all(|c| c.starts_with("ERR_")));
}
