//! The one generic remote call every backend operation goes through.
//!
//! # Design
//! `Invoker` splits a call into building a request and parsing a response,
//! with the transport in between:
//!
//! ```text
//! build_request ──► Transport::execute ──► parse_response
//!   (credentials,       (one POST)          (envelope decode,
//!    serialization)                          error handler)
//! ```
//!
//! Nothing is retained between calls. Credential checks run before any I/O,
//! so a misconfigured client never touches the network.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::envelope::{self, Envelope};
use crate::error::{ApiError, ApiResult, RemoteError};
use crate::http::{HttpRequest, HttpResponse, SDK_HEADER, SDK_VERSION, SECRET_KEY_HEADER};
use crate::settings::Settings;
use crate::transport::Transport;

/// Callback notified of every error envelope the backend returns.
///
/// Runs synchronously on the thread that decoded the response, before the
/// error is returned to the caller.
pub type ErrorHandler = Arc<dyn Fn(&RemoteError) + Send + Sync>;

/// Executes single backend calls. Cheap to clone; clones share settings,
/// transport and error handler.
#[derive(Clone)]
pub struct Invoker {
    settings: Arc<Settings>,
    transport: Arc<dyn Transport>,
    error_handler: Option<ErrorHandler>,
}

impl Invoker {
    pub fn new(settings: Settings, transport: Arc<dyn Transport>) -> Self {
        Self {
            settings: Arc::new(settings),
            transport,
            error_handler: None,
        }
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_error_handler(mut self, handler: ErrorHandler) -> Self {
        self.error_handler = Some(handler);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Fail fast if the client cannot authenticate or has nowhere to send.
    fn check_configuration(&self) -> ApiResult<&str> {
        let secret = self.settings.secret_key().ok_or_else(|| {
            ApiError::Configuration("secret key must be set before calling the server API".to_string())
        })?;
        if self.settings.title_id().is_empty() {
            return Err(ApiError::Configuration("title id must not be empty".to_string()));
        }
        if self.settings.endpoint().is_empty() {
            return Err(ApiError::Configuration("base url must not be empty".to_string()));
        }
        Ok(secret)
    }

    /// Build the POST for `path` carrying `request` as its JSON body.
    ///
    /// # Errors
    /// `Configuration` when credentials are missing, `Serialization` when the
    /// payload cannot be encoded.
    pub fn build_request<Req: Serialize + ?Sized>(&self, path: &str, request: &Req) -> ApiResult<HttpRequest> {
        let secret = self.check_configuration()?;
        let body = serde_json::to_string(request).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            url: format!("{}{path}", self.settings.endpoint()),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                (SECRET_KEY_HEADER.to_string(), secret.to_string()),
                (SDK_HEADER.to_string(), SDK_VERSION.to_string()),
            ],
            body,
        })
    }

    /// Decode the response for `path`. Remote errors are passed to the
    /// error handler, if one is installed, before being returned.
    pub fn parse_response<Resp: DeserializeOwned>(&self, path: &str, response: HttpResponse) -> ApiResult<Resp> {
        match envelope::decode(&response) {
            Ok(Envelope::Success(payload)) => {
                debug!(path, status = response.status, "call succeeded");
                Ok(payload)
            }
            Ok(Envelope::Failure(remote)) => {
                warn!(
                    path,
                    status = response.status,
                    error = %remote.error,
                    error_code = remote.error_code,
                    "backend returned an error"
                );
                if let Some(handler) = &self.error_handler {
                    handler(&remote);
                }
                Err(ApiError::Remote(remote))
            }
            Err(err) => {
                warn!(path, status = response.status, %err, "undecodable response");
                Err(err)
            }
        }
    }

    /// Perform one blocking round trip.
    pub fn invoke<Req, Resp>(&self, path: &str, request: &Req) -> ApiResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let http_request = self.build_request(path, request)?;
        debug!(path, url = %http_request.url, "sending request");
        let response = self.transport.execute(&http_request).map_err(|err| {
            warn!(path, %err, "transport failure");
            ApiError::from(err)
        })?;
        self.parse_response(path, response)
    }

    /// Perform one round trip on Tokio's blocking pool.
    ///
    /// Configuration errors are reported without spawning anything.
    ///
    /// # Errors
    /// Besides the errors of [`Invoker::invoke`], `Worker` when called outside
    /// a Tokio runtime or when the worker task does not complete.
    pub async fn invoke_async<Req, Resp>(&self, path: &'static str, request: Req) -> ApiResult<Resp>
    where
        Req: Serialize + Send + 'static,
        Resp: DeserializeOwned + Send + 'static,
    {
        self.check_configuration()?;
        let handle = tokio::runtime::Handle::try_current().map_err(|e| ApiError::Worker(e.to_string()))?;
        let invoker = self.clone();
        handle
            .spawn_blocking(move || invoker.invoke(path, &request))
            .await
            .map_err(|e| ApiError::Worker(e.to_string()))?
    }
}

impl fmt::Debug for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("settings", &self.settings)
            .field("error_handler", &self.error_handler.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use serde::Deserialize;

    use super::*;
    use crate::error::TransportError;
    use crate::testing::RecordingTransport;

    const PATH: &str = "/Server/GetTitleData";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Keys {
        keys: Vec<String>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct TitleData {
        data: HashMap<String, String>,
    }

    fn keys() -> Keys {
        Keys {
            keys: vec!["a".to_string()],
        }
    }

    fn invoker(transport: Arc<RecordingTransport>) -> Invoker {
        let settings = Settings::new("TITLE", Some("s3cret".to_string())).with_base_url("http://stub");
        Invoker::new(settings, transport)
    }

    #[test]
    fn build_request_sets_url_headers_and_body() {
        let req = invoker(Arc::new(RecordingTransport::new()))
            .build_request(PATH, &keys())
            .unwrap();
        assert_eq!(req.url, "http://stub/Server/GetTitleData");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("X-SecretKey"), Some("s3cret"));
        assert_eq!(req.header(SDK_HEADER), Some(SDK_VERSION));
        let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(body, serde_json::json!({"Keys": ["a"]}));
    }

    #[test]
    fn derived_endpoint_is_used_without_override() {
        let settings = Settings::new("ABCD", Some("s3cret".to_string()));
        let req = Invoker::new(settings, Arc::new(RecordingTransport::new()))
            .build_request(PATH, &keys())
            .unwrap();
        assert_eq!(req.url, "https://ABCD.example-backend.com/Server/GetTitleData");
    }

    #[test]
    fn missing_secret_fails_before_any_request() {
        let transport = Arc::new(RecordingTransport::replying(r#"{"code":200,"status":"OK","data":{}}"#));
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let invoker = Invoker::new(Settings::new("TITLE", None), transport.clone())
            .with_error_handler(Arc::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }));

        let err = invoker.invoke::<_, TitleData>(PATH, &keys()).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
        assert_eq!(transport.round_trips(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_title_id_is_a_configuration_error() {
        let transport = Arc::new(RecordingTransport::new());
        let invoker = Invoker::new(Settings::new("", Some("s3cret".to_string())), transport.clone());
        let err = invoker.invoke::<_, TitleData>(PATH, &keys()).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
        assert_eq!(transport.round_trips(), 0);
    }

    #[test]
    fn success_envelope_returns_payload() {
        let transport = Arc::new(RecordingTransport::replying(
            r#"{"code":200,"status":"OK","data":{"Data":{"a":"1"}}}"#,
        ));
        let data: TitleData = invoker(transport).invoke(PATH, &keys()).unwrap();
        assert_eq!(data.data, HashMap::from([("a".to_string(), "1".to_string())]));
    }

    #[test]
    fn remote_error_reaches_handler_once_and_caller() {
        let transport = Arc::new(RecordingTransport::new().then_respond(HttpResponse::json(
            400,
            r#"{"status":"error","errorCode":1074,"errorMessage":"AccountNotFound"}"#,
        )));
        let seen: Arc<Mutex<Vec<RemoteError>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let invoker = invoker(transport).with_error_handler(Arc::new(move |err| {
            sink.lock().unwrap().push(err.clone());
        }));

        let err = invoker.invoke::<_, TitleData>(PATH, &keys()).unwrap_err();
        let remote = err.as_remote().unwrap();
        assert_eq!(remote.error_code, 1074);
        assert_eq!(remote.error_message, "AccountNotFound");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(&seen[0], remote);
    }

    #[test]
    fn transport_failure_skips_handler() {
        let transport = Arc::new(RecordingTransport::new().then_fail("connection refused"));
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let invoker = invoker(transport.clone()).with_error_handler(Arc::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        let err = invoker.invoke::<_, TitleData>(PATH, &keys()).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(transport.round_trips(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn decode_failure_skips_handler() {
        let transport = Arc::new(RecordingTransport::replying(r#"{"unexpected":true}"#));
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let invoker = invoker(transport).with_error_handler(Arc::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        let err = invoker.invoke::<_, TitleData>(PATH, &keys()).unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn repeated_calls_are_independent_round_trips() {
        let transport = Arc::new(RecordingTransport::replying(
            r#"{"code":200,"status":"OK","data":{"Data":{}}}"#,
        ));
        let invoker = invoker(transport.clone());
        let _: TitleData = invoker.invoke(PATH, &keys()).unwrap();
        let _: TitleData = invoker.invoke(PATH, &keys()).unwrap();
        assert_eq!(transport.round_trips(), 2);
    }

    #[test]
    fn transport_sees_the_serialized_payload() {
        let transport = Arc::new(RecordingTransport::replying(
            r#"{"code":200,"status":"OK","data":{"Data":{}}}"#,
        ));
        let _: TitleData = invoker(transport.clone()).invoke(PATH, &keys()).unwrap();
        let sent = transport.requests();
        let body: serde_json::Value = serde_json::from_str(&sent[0].body).unwrap();
        assert_eq!(body["Keys"], serde_json::json!(["a"]));
    }

    #[test]
    fn invoke_async_outside_runtime_is_a_worker_error() {
        let transport = Arc::new(RecordingTransport::replying(
            r#"{"code":200,"status":"OK","data":{"Data":{}}}"#,
        ));
        let invoker = invoker(transport.clone());

        // No runtime on this thread, so the future resolves on first poll.
        let fut = std::pin::pin!(invoker.invoke_async::<_, TitleData>(PATH, keys()));
        let mut cx = std::task::Context::from_waker(std::task::Waker::noop());
        let std::task::Poll::Ready(result) = fut.poll(&mut cx) else {
            panic!("expected the call to resolve without a runtime");
        };
        assert!(matches!(result.unwrap_err(), ApiError::Worker(_)));
        assert_eq!(transport.round_trips(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn invoke_async_runs_on_blocking_pool() {
        let transport = Arc::new(RecordingTransport::replying(
            r#"{"code":200,"status":"OK","data":{"Data":{"a":"1"}}}"#,
        ));
        let data: TitleData = invoker(transport.clone()).invoke_async(PATH, keys()).await.unwrap();
        assert_eq!(data.data["a"], "1");
        assert_eq!(transport.round_trips(), 1);
    }

    struct PanickingTransport;

    impl Transport for PanickingTransport {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            panic!("transport blew up");
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn invoke_async_reports_panicked_worker() {
        let settings = Settings::new("TITLE", Some("s3cret".to_string())).with_base_url("http://stub");
        let invoker = Invoker::new(settings, Arc::new(PanickingTransport));
        let err = invoker.invoke_async::<_, TitleData>(PATH, keys()).await.unwrap_err();
        assert!(matches!(err, ApiError::Worker(_)), "got {err:?}");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn invoke_async_reports_panicking_error_handler() {
        let transport = Arc::new(RecordingTransport::replying(
            r#"{"code":400,"status":"BadRequest","error":"InvalidParams","errorCode":1000,"errorMessage":"bad"}"#,
        ));
        let invoker =
            invoker(transport.clone()).with_error_handler(Arc::new(|_: &RemoteError| panic!("handler blew up")));
        let err = invoker.invoke_async::<_, TitleData>(PATH, keys()).await.unwrap_err();
        assert!(matches!(err, ApiError::Worker(_)), "got {err:?}");
        assert_eq!(transport.round_trips(), 1);
    }

    #[tokio::test]
    async fn invoke_async_checks_secret_before_spawning() {
        let transport = Arc::new(RecordingTransport::new());
        let invoker = Invoker::new(Settings::new("TITLE", None), transport.clone());
        let err = invoker.invoke_async::<_, TitleData>(PATH, keys()).await.unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
        assert_eq!(transport.round_trips(), 0);
    }
}
