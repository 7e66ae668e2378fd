// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    status  = { Request::Status, r#"{"type":"Status"}"# },
    restart = { Request::Restart, r#"{"type":"Restart"}"# },
)]
fn request_is_tagged_by_type(request: Request, json: &str) {
    assert_eq!(serde_json::to_string(&request).unwrap(), json);
}

#[test]
fn status_active_commit_defaults_to_none() {
    let json = r#"{"type":"Status","uptime_secs":3,"version":"0.2.0+abc","commit":"abc"}"#;
    let response: Response = serde_json::from_str(json).expect("deserialize failed");
    assert_eq!(
        response,
        Response::Status {
            uptime_secs: 3,
            version: "0.2.0+abc".to_string(),
            commit: "abc".to_string(),
            active_commit: None,
        }
    );
}

#[test]
fn unknown_request_type_is_rejected() {
    let result: Result<Request, _> = serde_json::from_str(r#"{"type":"Upgrade"}"#);
    assert!(result.is_err());
}
