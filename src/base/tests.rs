use crate::base::neterror::NetError;

#[test]
fn test_net_error_roundtrip() {
    // Standard Chromium error
    let original = NetError::ConnectionRefused;
    let code = original.as_i32();
    assert_eq!(code, -102);
    let converted = NetError::from(code);
    assert!(matches!(converted, NetError::ConnectionRefused));

    // DNS range
    let dns = NetError::DnsMalformedResponse;
    assert_eq!(dns.as_i32(), -800);
    assert_eq!(NetError::from(-800), NetError::DnsMalformedResponse);
}

#[test]
fn test_unknown_error() {
    let err = NetError::from(-9999);
    assert!(matches!(err, NetError::Unknown(-9999)));
    assert_eq!(err.as_i32(), -9999);
}

#[test]
fn test_context_variants_share_base_code() {
    let err = NetError::NameNotResolvedFor {
        domain: "blocked.example".to_string(),
    };
    assert_eq!(err.as_i32(), NetError::NameNotResolved.as_i32());
    assert!(err.to_string().contains("blocked.example"));

    // Context is lost on the way back; only the code survives.
    assert_eq!(NetError::from(err.as_i32()), NetError::NameNotResolved);
}

#[test]
fn test_collision_avoidance() {
    // Custom codes must stay out of the DNS range.
    let dns_range = -899..=-800;
    for err in [
        NetError::HttpBodyError,
        NetError::JsonParseError,
        NetError::InvalidProvider("x".into()),
    ] {
        assert!(!dns_range.contains(&err.as_i32()));
    }
}
