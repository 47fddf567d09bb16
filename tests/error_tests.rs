use pontolog::errors::{AppError, BridgeError};

#[test]
fn test_classify_structured_json_payloads() {
    let cases = [
        (r#"{"type":"blocked","message":"fora do horário"}"#, "blocked"),
        (r#"{"type":"network","message":"sem conexão"}"#, "network"),
        (r#"{"type":"auth","message":"sessão expirada"}"#, "auth"),
        (
            r#"{"type":"invalid_operation","message":"operação inválida"}"#,
            "invalid_operation",
        ),
        (r#"{"type":"runtime","message":"bridge indisponível"}"#, "runtime"),
    ];

    for (raw, expected) in cases {
        assert_eq!(
            BridgeError::classify(raw).kind(),
            expected,
            "payload {raw} misclassified"
        );
    }
}

#[test]
fn test_classify_extracts_structured_message() {
    let err = BridgeError::classify(r#"{"type":"blocked","message":"fora do horário permitido"}"#);
    assert_eq!(err.message(), "fora do horário permitido");
}

#[test]
fn test_classify_substring_fallback() {
    assert_eq!(
        BridgeError::classify("Registro bloqueado pelo servidor").kind(),
        "blocked"
    );
    assert_eq!(BridgeError::classify("Falha de conexão").kind(), "network");
    assert_eq!(BridgeError::classify("network timeout").kind(), "network");
    assert_eq!(
        BridgeError::classify("Operação inválida para o dia").kind(),
        "invalid_operation"
    );
}

#[test]
fn test_classify_unknown_falls_back_to_runtime() {
    assert_eq!(BridgeError::classify("something unexpected").kind(), "runtime");
    assert_eq!(BridgeError::classify("").kind(), "runtime");
    // Unknown structured types fall through the substring path too.
    assert_eq!(
        BridgeError::classify(r#"{"type":"weird","message":"?"}"#).kind(),
        "runtime"
    );
}

#[test]
fn test_app_error_exposes_bridge_kind_through_wrappers() {
    let inner = AppError::Bridge(BridgeError::Network("sem conexão".to_string()));
    assert_eq!(inner.bridge_kind(), Some("network"));

    let wrapped = AppError::RetriesExhausted {
        key: "ponto-execucao".to_string(),
        attempts: 3,
        source: Box::new(inner),
    };
    assert_eq!(wrapped.bridge_kind(), Some("network"));

    assert_eq!(AppError::Other("boom".to_string()).bridge_kind(), None);
}
