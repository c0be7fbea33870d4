// ZipDrop - platform/http.rs
//
// Blocking HTTP transport: one multipart POST per file.
//
// Every response the server produces is returned as data, whatever its
// status; only failures with no response at all become errors. Redirects
// are followed, so the server's post-upload redirect to its listing page
// ends as the listing's 200.

use crate::core::model::CandidateFile;
use crate::core::transfer::{TransferResponse, Transport};
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::platform::multipart::{content_type_for, FilePartFraming, ProgressReader};
use crate::util::constants;
use crate::util::error::TransferError;
use std::io::{BufReader, Read};

/// `Transport` backed by a `ureq` agent.
pub struct HttpTransport {
    agent: ureq::Agent,
    upload_url: String,
    field_name: String,
    max_response_bytes: usize,
}

impl HttpTransport {
    pub fn new(config: &AppConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout_read(config.io_timeout)
            .timeout_write(config.io_timeout)
            .user_agent(&format!(
                "{}/{}",
                constants::APP_NAME.to_lowercase(),
                constants::APP_VERSION
            ))
            .build();
        Self {
            agent,
            upload_url: config.upload_url(),
            field_name: config.field_name.clone(),
            max_response_bytes: config.max_response_bytes,
        }
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        file: &CandidateFile,
        progress: &mut dyn FnMut(u64, Option<u64>),
    ) -> Result<TransferResponse, TransferError> {
        let payload = fs::open_payload(file).map_err(|source| TransferError::Payload {
            name: file.name.clone(),
            source,
        })?;
        let payload_len = payload.len;
        let payload = BufReader::with_capacity(constants::PAYLOAD_CHUNK_SIZE, payload.reader);

        let framing = FilePartFraming::with_random_boundary(
            &self.field_name,
            &file.name,
            content_type_for(&file.name),
        );
        let content_type = framing.content_type();
        let total = framing.body_len(payload_len);
        progress(0, Some(total));

        let body = ProgressReader::new(framing.into_body(payload, payload_len), |sent| {
            progress(sent, Some(total))
        });

        tracing::trace!(
            file = %file.name,
            url = %self.upload_url,
            bytes = total,
            "POST upload"
        );
        let result = self
            .agent
            .post(&self.upload_url)
            .set("Content-Type", &content_type)
            .set("Content-Length", &total.to_string())
            .send(body);

        match result {
            Ok(response) => Ok(into_transfer_response(response, self.max_response_bytes)),
            Err(ureq::Error::Status(_, response)) => {
                Ok(into_transfer_response(response, self.max_response_bytes))
            }
            Err(ureq::Error::Transport(transport)) => Err(TransferError::Transport {
                message: transport.to_string(),
            }),
        }
    }
}

fn into_transfer_response(response: ureq::Response, max_bytes: usize) -> TransferResponse {
    let status = response.status();
    let body = match read_response_text(response, max_bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(status, error = %e, "Could not read response body");
            String::new()
        }
    };
    TransferResponse { status, body }
}

/// Read at most `max_bytes` of a response body as trimmed text. Longer
/// bodies are cut at the limit rather than rejected, backing off to the
/// last whole character.
fn read_response_text(response: ureq::Response, max_bytes: usize) -> std::io::Result<String> {
    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(max_bytes as u64)
        .read_to_end(&mut bytes)?;
    Ok(decode_cut_text(bytes).trim().to_string())
}

fn decode_cut_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            let utf8 = e.utf8_error();
            let mut bytes = e.into_bytes();
            // Incomplete sequence at the end: the cut split a character.
            if utf8.error_len().is_none() {
                bytes.truncate(utf8.valid_up_to());
            }
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    /// Read one full HTTP request (head plus Content-Length body).
    fn read_request(stream: &TcpStream) -> Vec<u8> {
        let mut reader = BufReader::new(stream);
        let mut request = Vec::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 {
                break;
            }
            request.extend_from_slice(line.as_bytes());
            let lower = line.to_ascii_lowercase();
            if let Some(value) = lower.strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap();
            }
            if line == "\r\n" {
                break;
            }
        }
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).unwrap();
        request.extend_from_slice(&body);
        request
    }

    fn serve_once(status: &str, body: &str) -> (String, JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&stream);
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (format!("http://{addr}"), handle)
    }

    fn transport_for(url: &str) -> HttpTransport {
        let mut config = AppConfig::default();
        config.server_url = url.to_string();
        HttpTransport::new(&config)
    }

    #[test]
    fn posts_multipart_and_reports_progress() {
        let (url, server) = serve_once("200 OK", "");
        let transport = transport_for(&url);
        let file = CandidateFile::from_bytes("archive.zip", b"PK\x03\x04data".to_vec());

        let mut calls = Vec::new();
        let response = transport
            .send(&file, &mut |sent, total| calls.push((sent, total)))
            .unwrap();
        assert_eq!(response.status, 200);

        let request = String::from_utf8_lossy(&server.join().unwrap()).into_owned();
        assert!(request.starts_with("POST /upload HTTP/1.1\r\n"));
        assert!(request.contains("multipart/form-data; boundary="));
        assert!(request.contains("name=\"files\"; filename=\"archive.zip\""));
        assert!(request.contains("Content-Type: application/zip"));

        let (last_sent, last_total) = *calls.last().unwrap();
        assert_eq!(Some(last_sent), last_total);
        assert_eq!(calls[0], (0, last_total));
    }

    #[test]
    fn rejection_is_a_response_not_an_error() {
        let (url, server) = serve_once("400 Bad Request", "invalid file type: a.zip\n");
        let transport = transport_for(&url);
        let file = CandidateFile::from_bytes("a.zip", b"x".to_vec());

        let response = transport.send(&file, &mut |_, _| {}).unwrap();
        server.join().unwrap();
        assert_eq!(response.status, 400);
        assert_eq!(response.body, "invalid file type: a.zip");
    }

    #[test]
    fn long_bodies_are_cut() {
        let body = "e".repeat(100);
        let (url, server) = serve_once("500 Internal Server Error", &body);
        let mut transport = transport_for(&url);
        transport.max_response_bytes = 8;
        let file = CandidateFile::from_bytes("a.zip", b"x".to_vec());

        let response = transport.send(&file, &mut |_, _| {}).unwrap();
        server.join().unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(response.body, "eeeeeeee");
    }

    #[test]
    fn cut_never_splits_a_character() {
        let body = "é".repeat(10);
        let (url, server) = serve_once("400 Bad Request", &body);
        let mut transport = transport_for(&url);
        transport.max_response_bytes = 5;
        let file = CandidateFile::from_bytes("a.zip", b"x".to_vec());

        let response = transport.send(&file, &mut |_, _| {}).unwrap();
        server.join().unwrap();
        assert_eq!(response.body, "éé");
    }

    #[test]
    fn invalid_bytes_inside_the_body_are_replaced() {
        assert_eq!(decode_cut_text(b"a\xffb".to_vec()), "a\u{fffd}b");
    }

    #[test]
    fn refused_connection_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = transport_for(&format!("http://{addr}"));
        let file = CandidateFile::from_bytes("a.zip", b"x".to_vec());
        let err = transport.send(&file, &mut |_, _| {}).unwrap_err();
        assert!(matches!(err, TransferError::Transport { .. }));
        assert!(err.to_string().starts_with("Network error: "));
    }

    #[test]
    fn unreadable_payload_is_payload_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = CandidateFile::from_path("gone.zip", 10, dir.path().join("gone.zip"));
        let transport = transport_for("http://127.0.0.1:9");

        let err = transport.send(&file, &mut |_, _| {}).unwrap_err();
        assert!(matches!(err, TransferError::Payload { .. }));
        assert!(err.to_string().starts_with("Cannot read 'gone.zip'"));
    }
}
