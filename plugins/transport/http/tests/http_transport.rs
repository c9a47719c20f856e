//! Tests for the HTTP transport against a local one-shot server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use cloudlog::{CloudLog, CloudLogError, Event, Record, Transport, Value};
use cloudlog_transport_http::{DEFAULT_CLIENT_TYPE, HttpConfig, HttpTransport};

// =============================================================================
// Helpers
// =============================================================================

struct CapturedRequest {
    request_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("body should be JSON")
    }
}

/// Accept exactly one request, answer with `status_line`, return what was sent.
fn serve_once(status_line: &'static str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("should bind");
    let addr = listener.local_addr().expect("should have addr");

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("should accept");
        let mut reader = BufReader::new(stream.try_clone().expect("should clone stream"));

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("should read request line");

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("should read header");
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((k, v)) = line.split_once(':') {
                headers.push((k.trim().to_string(), v.trim().to_string()));
            }
        }

        let len = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(0);
        let mut body = vec![0; len];
        reader.read_exact(&mut body).expect("should read body");

        let response = format!("{status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        stream.write_all(response.as_bytes()).expect("should write response");

        CapturedRequest {
            request_line: request_line.trim_end().to_string(),
            headers,
            body,
        }
    });

    (format!("http://{addr}"), handle)
}

fn transport_for(base_url: &str, index: &str) -> HttpTransport {
    HttpTransport::new(HttpConfig::new(index, "secret-token").with_base_url(base_url))
        .expect("should build transport")
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_empty_index_is_rejected() {
    let result = HttpTransport::new(HttpConfig::new("", "token"));
    assert!(matches!(result, Err(CloudLogError::IndexNotDefined)));
}

#[test]
fn test_endpoint_url() {
    let transport = transport_for("http://localhost:8080/", "abc123");
    assert_eq!(transport.url(), "http://localhost:8080/v1/index/abc123/data");
    assert_eq!(transport.client_type(), DEFAULT_CLIENT_TYPE);
}

#[test]
fn test_index_is_percent_encoded() {
    let transport = transport_for("http://localhost", "my index");
    assert_eq!(transport.url(), "http://localhost/v1/index/my%20index/data");
}

#[test]
fn test_config_defaults() {
    let config: HttpConfig =
        serde_json::from_str(r#"{"index": "abc"}"#).expect("should deserialize");
    assert_eq!(config.index, "abc");
    assert_eq!(config.token, "");
    assert_eq!(config.base_url, "https://api0401.bdp.anexia-it.com");
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.client_type, "rust-client-rest");
}

// =============================================================================
// Sending
// =============================================================================

#[test]
fn test_posts_records_to_index_endpoint() {
    let (base_url, server) = serve_once("HTTP/1.1 201 Created");
    let client = CloudLog::new(transport_for(&base_url, "abc123"));

    client
        .push_events(["first", "second"])
        .expect("push should succeed");

    let request = server.join().expect("server should finish");
    assert_eq!(request.request_line, "POST /v1/index/abc123/data HTTP/1.1");
    assert_eq!(request.header("authorization"), Some("secret-token"));
    assert_eq!(request.header("content-type"), Some("application/json"));

    let body = request.json();
    let records = body["records"].as_array().expect("should have records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["message"], "first");
    assert_eq!(records[1]["message"], "second");
    assert_eq!(records[0]["cloudlog_client_type"], "rust-client-rest");
    assert_eq!(records[0]["timestamp"], records[1]["timestamp"]);
}

#[test]
fn test_unexpected_status_fails_push() {
    let (base_url, server) = serve_once("HTTP/1.1 500 Internal Server Error");
    let client = CloudLog::new(transport_for(&base_url, "abc123"));

    let err = client.push_event("boom").expect_err("push should fail");
    server.join().expect("server should finish");

    assert!(matches!(err, CloudLogError::Transport(_)));
    assert_eq!(err.to_string(), "expecting status 201 but received 500");
}

#[test]
fn test_ok_is_not_created() {
    let (base_url, server) = serve_once("HTTP/1.1 200 OK");
    let client = CloudLog::new(transport_for(&base_url, "abc123"));

    let err = client.push_event("x").expect_err("200 should not count as success");
    server.join().expect("server should finish");
    assert!(err.to_string().contains("received 200"));
}

#[test]
fn test_connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("should bind");
    let addr = listener.local_addr().expect("should have addr");
    drop(listener);

    let client = CloudLog::new(transport_for(&format!("http://{addr}"), "abc123"));
    let err = client.push_event("x").expect_err("push should fail");
    assert!(matches!(err, CloudLogError::Transport(_)));
}

#[test]
fn test_marshal_failure_sends_nothing() {
    // Nothing listens here; a request attempt would surface as a transport error.
    let transport = transport_for("http://127.0.0.1:9", "abc123");
    let client = CloudLog::new(transport);

    let event = Record::from([("ratio", Value::Float(f64::NAN))]);
    let err = client.push_event(event).expect_err("NaN should not marshal");
    assert!(matches!(err, CloudLogError::Marshal(_)));
}

#[test]
fn test_empty_push_sends_nothing() {
    let transport = transport_for("http://127.0.0.1:9", "abc123");
    let client = CloudLog::new(transport);
    client
        .push_events(Vec::<Event>::new())
        .expect("empty push should be a no-op");
}
