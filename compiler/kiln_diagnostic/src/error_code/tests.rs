use super::*;

#[test]
fn codes_render_as_their_name() {
    for code in ErrorCode::ALL {
        assert_eq!(code.to_string(), format!("{code:?}"));
    }
}

#[test]
fn argument_errors() {
    let argument: Vec<_> = ErrorCode::ALL
        .iter()
        .filter(|c| c.is_argument_error())
        .collect();
    assert_eq!(argument.len(), 4);
    assert!(!ErrorCode::E6005.is_argument_error());
}

#[test]
fn every_code_has_a_description() {
    for code in ErrorCode::ALL {
        assert!(!code.description().is_empty(), "{code} lacks a description");
    }
}
