//! Verify request building and envelope parsing against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each vector describes inputs, the expected request, a simulated response
//! and the expected outcome. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gameserver_core::{
    ApiError, GetTitleDataRequest, GetTitleDataResult, HttpResponse, Invoker, RemoteError, ServerClient,
    Settings,
};
use gameserver_core::testing::RecordingTransport;

const BASE_URL: &str = "http://localhost:3000";
const SECRET: &str = "vector-secret";

fn settings() -> Settings {
    Settings::new("TITLE", Some(SECRET.to_string())).with_base_url(BASE_URL)
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::json(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

// ---------------------------------------------------------------------------
// GetTitleData
// ---------------------------------------------------------------------------

#[test]
fn get_title_data_test_vectors() {
    let raw = include_str!("../../test-vectors/get_title_data.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: GetTitleDataRequest = serde_json::from_value(case["input"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        // Verify what reaches the wire.
        let transport = Arc::new(RecordingTransport::new().then_respond(simulated(case)));
        let client = ServerClient::new(settings()).with_transport(transport.clone());
        let result = client.get_title_data(&input).unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1, "{name}: round trips");
        let req = &requests[0];
        assert_eq!(
            req.url,
            format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()),
            "{name}: url"
        );
        for header in expected_req["headers"].as_array().unwrap() {
            let pair = header.as_array().unwrap();
            let (key, value) = (pair[0].as_str().unwrap(), pair[1].as_str().unwrap());
            assert_eq!(req.header(key), Some(value), "{name}: header {key}");
        }
        let req_body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        // Verify parse.
        let expected: GetTitleDataResult = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(result, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Failure envelopes
// ---------------------------------------------------------------------------

#[test]
fn failure_envelope_test_vectors() {
    let raw = include_str!("../../test-vectors/envelopes.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let handled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&handled);
        let invoker = Invoker::new(settings(), Arc::new(RecordingTransport::new()))
            .with_error_handler(Arc::new(move |_: &RemoteError| {
                counter.fetch_add(1, Ordering::SeqCst);
            }));

        let err = invoker
            .parse_response::<GetTitleDataResult>("/Server/GetTitleData", simulated(case))
            .unwrap_err();

        match case["expected_error"].as_str().unwrap() {
            "Remote" => {
                let remote = err.as_remote().unwrap_or_else(|| panic!("{name}: expected Remote, got {err:?}"));
                assert_eq!(
                    u64::from(remote.error_code),
                    case["expected_error_code"].as_u64().unwrap(),
                    "{name}: error code"
                );
                assert_eq!(
                    remote.error_message,
                    case["expected_error_message"].as_str().unwrap(),
                    "{name}: error message"
                );
                assert_eq!(handled.load(Ordering::SeqCst), 1, "{name}: handler calls");
            }
            "Decode" => {
                assert!(matches!(err, ApiError::Decode { .. }), "{name}: expected Decode, got {err:?}");
                assert_eq!(handled.load(Ordering::SeqCst), 0, "{name}: handler calls");
            }
            other => panic!("{name}: unknown expected_error: {other}"),
        }
    }
}
