// ZipDrop - tests/e2e_upload.rs
//
// End-to-end tests for the upload pipeline.
//
// These tests exercise real files in a temp directory, the real walkdir
// candidate collection, the real multipart encoder and ureq transport, and
// a throwaway HTTP server on a loopback socket that behaves like the archive
// server: accepted uploads are answered with a 303 redirect to the listing,
// rejected ones with a 400 and a plain-text reason.

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;

use zipdrop::app::orchestrator::UploadOrchestrator;
use zipdrop::core::model::UploadEvent;
use zipdrop::core::selection::SelectionFilter;
use zipdrop::core::summary::{BatchSummary, FailureRecord};
use zipdrop::platform::config::AppConfig;
use zipdrop::platform::fs::collect_candidates;
use zipdrop::platform::http::HttpTransport;

// =============================================================================
// Fake archive server
// =============================================================================

/// One upload request as the server saw it.
#[derive(Debug, Clone)]
struct ReceivedUpload {
    filename: String,
    payload: Vec<u8>,
}

struct FakeServer {
    base_url: String,
    uploads: Arc<Mutex<Vec<ReceivedUpload>>>,
}

impl FakeServer {
    /// Start a server that rejects any file whose name starts with "bad".
    fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let uploads = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&uploads);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                handle_connection(stream, &seen);
            }
        });
        Self { base_url, uploads }
    }

    fn uploads(&self) -> Vec<ReceivedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    fn transport(&self) -> Arc<HttpTransport> {
        let mut config = AppConfig::default();
        config.set_server_url(&self.base_url).unwrap();
        Arc::new(HttpTransport::new(&config))
    }
}

fn handle_connection(stream: TcpStream, seen: &Mutex<Vec<ReceivedUpload>>) {
    let mut reader = BufReader::new(&stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut content_length = 0usize;
    let mut boundary = String::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
            break;
        }
        let lower = line.to_ascii_lowercase();
        if let Some(v) = lower.strip_prefix("content-length:") {
            content_length = v.trim().parse().unwrap();
        }
        if let Some(idx) = line.find("boundary=") {
            boundary = line[idx + "boundary=".len()..].trim().to_string();
        }
    }
    let response = if request_line.starts_with("POST /upload ") {
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).unwrap();
        let upload = parse_upload(&body, &boundary);
        let rejected = upload.filename.starts_with("bad");
        let name = upload.filename.clone();
        seen.lock().unwrap().push(upload);
        if rejected {
            let text = format!("invalid file type: {name}\n");
            format!(
                "HTTP/1.1 400 Bad Request\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{text}",
                text.len()
            )
        } else {
            "HTTP/1.1 303 See Other\r\nLocation: /\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                .to_string()
        }
    } else {
        // The redirected listing fetch. It has no body, though its headers
        // may still carry the upload's multipart Content-Type.
        let text = "<html>listing</html>";
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{text}",
            text.len()
        )
    };
    (&stream).write_all(response.as_bytes()).unwrap();
}

/// Pull the filename and payload out of a one-part multipart body.
fn parse_upload(body: &[u8], boundary: &str) -> ReceivedUpload {
    let text = String::from_utf8_lossy(body);
    let start = text.find("filename=\"").unwrap() + "filename=\"".len();
    let end = start + text[start..].find('"').unwrap();
    let filename = text[start..end].to_string();

    let header_end = find(body, b"\r\n\r\n").unwrap() + 4;
    let closing = format!("\r\n--{boundary}--\r\n");
    let payload_end = find(body, closing.as_bytes()).unwrap();
    ReceivedUpload {
        filename,
        payload: body[header_end..payload_end].to_vec(),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn write_file(dir: &Path, name: &str, contents: &[u8]) {
    fs::write(dir.join(name), contents).unwrap();
}

fn run_dir(transport: Arc<HttpTransport>, dir: &Path) -> (Vec<UploadEvent>, BatchSummary) {
    let (files, warnings) = collect_candidates(&[dir.to_path_buf()], false);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    let mut orchestrator = UploadOrchestrator::new(transport, SelectionFilter::default());
    let handle = orchestrator.start_batch(files).unwrap();
    let mut events = Vec::new();
    let summary = handle.wait(|e| events.push(e.clone())).unwrap();
    (events, summary)
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn e2e_all_archives_upload() {
    let server = FakeServer::start();
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "one.zip", b"PK\x03\x04first");
    write_file(dir.path(), "two.ZIP", b"PK\x03\x04second");

    let (events, summary) = run_dir(server.transport(), dir.path());

    assert_eq!(
        summary,
        BatchSummary {
            succeeded: 2,
            failed: 0,
            failures: vec![]
        }
    );
    assert_eq!(summary.message(), "Successfully uploaded 2 file(s)");

    let uploads = server.uploads();
    let names: Vec<_> = uploads.iter().map(|u| u.filename.as_str()).collect();
    assert_eq!(names, vec!["one.zip", "two.ZIP"]);
    assert_eq!(uploads[0].payload, b"PK\x03\x04first");
    assert_eq!(uploads[1].payload, b"PK\x03\x04second");

    // Every unit's last progress report is complete.
    for slot in 0..2 {
        let last = events
            .iter()
            .filter_map(|e| match e {
                UploadEvent::UnitProgress { slot: s, fraction } if *s == slot => Some(*fraction),
                _ => None,
            })
            .last()
            .unwrap();
        assert_eq!(last, 1.0);
    }
}

#[test]
fn e2e_file_rewritten_after_selection_is_sent_whole() {
    let server = FakeServer::start();
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.zip", b"0123456789");

    let (files, _) = collect_candidates(&[dir.path().to_path_buf()], false);
    assert_eq!(files[0].size, 10);
    let grown = vec![b'g'; 5000];
    write_file(dir.path(), "a.zip", &grown);

    let mut orchestrator = UploadOrchestrator::new(server.transport(), SelectionFilter::default());
    let summary = orchestrator.start_batch(files).unwrap().wait(|_| {}).unwrap();

    assert_eq!(summary.succeeded, 1);
    let uploads = server.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].payload, grown);
}

#[test]
fn e2e_server_rejection_is_isolated() {
    let server = FakeServer::start();
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.zip", b"aaa");
    write_file(dir.path(), "bad.zip", b"bbb");
    write_file(dir.path(), "c.zip", b"ccc");

    let (_, summary) = run_dir(server.transport(), dir.path());

    assert_eq!(summary.succeeded, 2);
    assert_eq!(
        summary.failures,
        vec![FailureRecord {
            name: "bad.zip".to_string(),
            reason: "invalid file type: bad.zip".to_string(),
        }]
    );
    assert_eq!(
        summary.message(),
        "Uploaded 2 of 3 file(s); 1 failed\nbad.zip: invalid file type: bad.zip"
    );
    // The rejection did not stop the batch.
    assert_eq!(server.uploads().len(), 3);
}

#[test]
fn e2e_non_archives_never_reach_the_server() {
    let server = FakeServer::start();
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "notes.txt", b"text");
    write_file(dir.path(), "photo.png", b"png");
    write_file(dir.path(), "keep.zip", b"zip");

    let (events, summary) = run_dir(server.transport(), dir.path());

    assert_eq!(summary.succeeded, 1);
    match &events[0] {
        UploadEvent::BatchStarted { names, .. } => assert_eq!(names, &vec!["keep.zip".to_string()]),
        other => panic!("expected BatchStarted, got {other:?}"),
    }
    let names: Vec<_> = server.uploads().into_iter().map(|u| u.filename).collect();
    assert_eq!(names, vec!["keep.zip"]);
}

#[test]
fn e2e_selection_without_archives_is_rejected_up_front() {
    let server = FakeServer::start();
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "notes.txt", b"text");

    let (files, _) = collect_candidates(&[dir.path().to_path_buf()], false);
    let mut orchestrator = UploadOrchestrator::new(server.transport(), SelectionFilter::default());
    let err = orchestrator.start_batch(files).err().unwrap();

    assert_eq!(err.to_string(), "No ZIP files found in selection");
    assert!(!orchestrator.is_in_flight());
    assert!(server.uploads().is_empty());
}

#[test]
fn e2e_unreachable_server_fails_every_unit() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = AppConfig::default();
    config.set_server_url(&format!("http://{addr}")).unwrap();
    let transport = Arc::new(HttpTransport::new(&config));

    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.zip", b"a");
    write_file(dir.path(), "b.zip", b"b");

    let (_, summary) = run_dir(transport, dir.path());

    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.failed, 2);
    assert!(summary
        .failures
        .iter()
        .all(|f| f.reason.starts_with("Network error: ")));
    assert!(summary.message().starts_with("Upload failed for all 2 file(s)"));
}

#[test]
fn e2e_recursive_collection_finds_nested_archives() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "top.zip", b"t");
    fs::create_dir(dir.path().join("inner")).unwrap();
    write_file(&dir.path().join("inner"), "deep.zip", b"d");

    let (shallow, _) = collect_candidates(&[dir.path().to_path_buf()], false);
    let (deep, _) = collect_candidates(&[dir.path().to_path_buf()], true);

    assert_eq!(shallow.len(), 1);
    let mut names: Vec<_> = deep.iter().map(|f| f.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["deep.zip", "top.zip"]);
}
