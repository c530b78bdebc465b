//! Live tests: the real reqwest transport against one-shot HTTP/1.1 servers
//! on the loopback interface.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use exthttp_core::{
    Error, ExecutorConfig, HttpRequestExecutor, RequestBody, ResponseBody, ResponseMode,
};

/// Raw bytes of a received request, split at the header terminator.
struct RawRequest {
    head: String,
    body: Vec<u8>,
}

impl RawRequest {
    fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (k, v) = line.split_once(':')?;
            if k.trim().eq_ignore_ascii_case(name) {
                Some(v.trim().to_string())
            } else {
                None
            }
        })
    }

    fn header_count(&self, name: &str) -> usize {
        self.head
            .lines()
            .skip(1)
            .filter(|line| {
                line.split_once(':')
                    .is_some_and(|(k, _)| k.trim().eq_ignore_ascii_case(name))
            })
            .count()
    }
}

/// Read one full request off the socket: headers, then `Content-Length`
/// bytes of body.
fn read_request(stream: &mut TcpStream) -> RawRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let split = loop {
        let n = stream.read(&mut chunk).expect("read request");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        assert!(n > 0, "connection closed before headers were complete");
    };

    let head = String::from_utf8_lossy(&buf[..split]).into_owned();
    let content_length = head
        .lines()
        .skip(1)
        .find_map(|line| {
            let (k, v) = line.split_once(':')?;
            if k.trim().eq_ignore_ascii_case("content-length") {
                v.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    let mut body = buf[split + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).expect("read request body");
        assert!(n > 0, "connection closed before body was complete");
        body.extend_from_slice(&chunk[..n]);
    }
    RawRequest { head, body }
}

/// Serve exactly one request with a canned response, returning the request
/// the client actually sent.
fn one_shot_server(response: Vec<u8>) -> (String, JoinHandle<RawRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let request = read_request(&mut stream);
        stream.write_all(&response).expect("write response");
        request
    });
    (format!("http://{}/", addr), handle)
}

/// Serve exactly one request, echoing its body back verbatim as 200.
fn echo_server() -> (String, JoinHandle<RawRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let request = read_request(&mut stream);
        let response = [
            format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                request.body.len()
            )
            .into_bytes(),
            request.body.clone(),
        ]
        .concat();
        stream.write_all(&response).expect("write response");
        request
    });
    (format!("http://{}/", addr), handle)
}

fn text_response(status_line: &str, headers: &str, body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        headers,
        body.len(),
        body
    )
    .into_bytes()
}

#[test]
fn test_get_200_text_collects_status_headers_and_body() {
    let (url, server) = one_shot_server(text_response(
        "200 OK",
        "Content-Type: text/plain\r\nX-Tag: one\r\nX-Tag: two\r\n",
        "hello over the wire",
    ));

    let executor = HttpRequestExecutor::new();
    let headers = vec![("Accept".to_string(), "text/plain".to_string())];
    let record = executor.get(&url, &headers, ResponseMode::Text).unwrap();

    assert_eq!(record.status, 200);
    assert_eq!(record.body.text(), Some("hello over the wire"));
    assert_eq!(record.header("Content-Type"), Some("text/plain"));
    // Duplicates arrive in order, both preserved.
    let tags: Vec<&str> = record
        .headers
        .iter()
        .filter(|(k, _)| k.eq_ignore_ascii_case("X-Tag"))
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(tags, vec!["one", "two"]);

    let sent = server.join().unwrap();
    assert!(sent.head.starts_with("GET / HTTP/1.1"));
    assert_eq!(sent.header("Accept").as_deref(), Some("text/plain"));
}

#[test]
fn test_non_200_returns_the_real_status_without_error() {
    let (url, server) = one_shot_server(text_response(
        "404 Not Found",
        "X-Reason: gone\r\n",
        "missing",
    ));

    let executor = HttpRequestExecutor::new();
    let record = executor.get(&url, &[], ResponseMode::Text).unwrap();

    assert_eq!(record.status, 404);
    assert_eq!(record.header("X-Reason"), Some("gone"));
    assert_eq!(record.body.text(), Some("missing"));
    server.join().unwrap();
}

#[test]
fn test_connection_refused_is_request_failed() {
    // Bind and immediately drop to get a port with nothing listening.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let executor = HttpRequestExecutor::new();
    let err = executor
        .get(&format!("http://{}/", addr), &[], ResponseMode::Text)
        .unwrap_err();

    match &err {
        Error::RequestFailed { cause } => assert!(!cause.is_empty()),
        other => panic!("expected RequestFailed, got {:?}", other),
    }
    assert!(err.to_string().starts_with("An error occurred. Cause: ["));
}

#[test]
fn test_form_post_round_trip_through_an_echo_server() {
    let (url, server) = echo_server();

    let executor = HttpRequestExecutor::new();
    let record = executor
        .post(
            &url,
            &[],
            "application/x-www-form-urlencoded",
            RequestBody::Text("key1=value1&key2=value2".to_string()),
        )
        .unwrap();

    assert_eq!(record.status, 200);
    assert_eq!(record.body.text(), Some("key1=value1&key2=value2"));

    let sent = server.join().unwrap();
    assert_eq!(
        sent.header("Content-Type").as_deref(),
        Some("application/x-www-form-urlencoded")
    );
}

#[test]
fn test_post_carries_content_type_and_caller_headers() {
    let (url, server) = echo_server();

    let executor = HttpRequestExecutor::new();
    let headers = vec![("Accept".to_string(), "application/json".to_string())];
    executor
        .post(
            &url,
            &headers,
            "text/plain",
            RequestBody::Text("payload".to_string()),
        )
        .unwrap();

    let sent = server.join().unwrap();
    assert!(sent.head.starts_with("POST / HTTP/1.1"));
    assert_eq!(sent.header("Content-Type").as_deref(), Some("text/plain"));
    assert_eq!(
        sent.header("Accept").as_deref(),
        Some("application/json")
    );
    assert_eq!(sent.header_count("Content-Type"), 1);
}

#[test]
fn test_streaming_get_reproduces_the_entity_bytes() {
    let entity: Vec<u8> = (0u8..=255).cycle().take(16 * 1024).collect();
    let response = [
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            entity.len()
        )
        .into_bytes(),
        entity.clone(),
    ]
    .concat();
    let (url, server) = one_shot_server(response);

    let executor = HttpRequestExecutor::new();
    let record = executor.get(&url, &[], ResponseMode::Stream).unwrap();
    assert_eq!(record.status, 200);

    // Drain the body only after the executor call has returned.
    let mut drained = Vec::new();
    match record.body {
        ResponseBody::Stream(mut reader) => {
            reader.read_to_end(&mut drained).unwrap();
        }
        ResponseBody::Text(_) => panic!("expected a stream body"),
    }
    assert_eq!(drained, entity);
    server.join().unwrap();
}

#[test]
fn test_overall_timeout_aborts_a_stalled_server() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let _ = read_request(&mut stream);
        // Never respond; hold the socket open past the client deadline.
        thread::sleep(Duration::from_millis(1500));
    });

    let executor = HttpRequestExecutor::with_config(ExecutorConfig {
        connect_timeout: Some(Duration::from_millis(500)),
        timeout: Some(Duration::from_millis(300)),
    });
    let err = executor
        .get(&format!("http://{}/", addr), &[], ResponseMode::Text)
        .unwrap_err();
    assert!(matches!(err, Error::RequestFailed { .. }));
    server.join().unwrap();
}
