use webapp_traffic::error::ProvisionError;

#[test]
fn display_env_missing() {
    let err = ProvisionError::EnvMissing("CLIENT_ID".into());
    assert_eq!(err.to_string(), "environment variable missing: CLIENT_ID");
}

#[test]
fn display_authentication() {
    let err = ProvisionError::Authentication("400 Bad Request: invalid_client".into());
    assert_eq!(
        err.to_string(),
        "authentication failed: 400 Bad Request: invalid_client"
    );
}

#[test]
fn display_api() {
    let err = ProvisionError::Api {
        url: "https://management.azure.com/x".into(),
        status: 409,
        message: "Conflict: name taken".into(),
    };
    assert_eq!(
        err.to_string(),
        "request to https://management.azure.com/x failed with status 409: Conflict: name taken"
    );
}

#[test]
fn display_operation_failed() {
    let err = ProvisionError::OperationFailed {
        operation: "https://op".into(),
        status: "Canceled".into(),
        message: "OperationCanceled: superseded".into(),
    };
    assert_eq!(
        err.to_string(),
        "operation https://op finished with status Canceled: OperationCanceled: superseded"
    );
}

#[test]
fn display_missing_field() {
    let err = ProvisionError::MissingField("id".into());
    assert_eq!(err.to_string(), "response is missing field: id");
}

#[test]
fn display_command_not_found() {
    let err = ProvisionError::CommandNotFound("openssl".into());
    assert_eq!(err.to_string(), "command not found: openssl");
}

#[test]
fn display_prerequisite_missing() {
    let err = ProvisionError::PrerequisiteMissing("openssl".into());
    assert_eq!(err.to_string(), "prerequisite missing: openssl");
}

#[test]
fn display_other() {
    let err = ProvisionError::Other("custom error".into());
    assert_eq!(err.to_string(), "custom error");
}

#[test]
fn from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err: ProvisionError = io_err.into();
    assert!(matches!(err, ProvisionError::Io(_)));
}

#[test]
fn from_json_error() {
    let json_err = serde_json::from_str::<Vec<u64>>("invalid").unwrap_err();
    let err: ProvisionError = json_err.into();
    assert!(matches!(err, ProvisionError::Json(_)));
}
