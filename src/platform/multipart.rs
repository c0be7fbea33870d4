// ZipDrop - platform/multipart.rs
//
// Streaming multipart/form-data framing for a single file part.
//
// The request body is `head ++ payload ++ tail`, chained readers with an
// exact length so the request can carry a Content-Length instead of being
// chunked. The payload is never buffered in memory.

use std::io::{self, Cursor, Read};

/// Boundary, head and tail of a one-file multipart body.
#[derive(Debug, Clone)]
pub struct FilePartFraming {
    boundary: String,
    head: Vec<u8>,
    tail: Vec<u8>,
}

impl FilePartFraming {
    /// Framing for one file part with the given boundary.
    pub fn new(boundary: &str, field_name: &str, file_name: &str, content_type: &str) -> Self {
        let head = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
             Content-Type: {content_type}\r\n\
             \r\n",
            escape_quoted(field_name),
            escape_quoted(file_name),
        )
        .into_bytes();
        let tail = format!("\r\n--{boundary}--\r\n").into_bytes();
        Self {
            boundary: boundary.to_string(),
            head,
            tail,
        }
    }

    /// Framing with a fresh random boundary.
    pub fn with_random_boundary(field_name: &str, file_name: &str, content_type: &str) -> Self {
        let boundary = format!("----ZipDropBoundary{}", uuid::Uuid::new_v4().simple());
        Self::new(&boundary, field_name, file_name, content_type)
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's Content-Type header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Exact body length for a payload of `payload_len` bytes.
    pub fn body_len(&self, payload_len: u64) -> u64 {
        self.head.len() as u64 + payload_len + self.tail.len() as u64
    }

    /// The full body as one reader. The payload must yield exactly
    /// `payload_len` bytes: a short payload is an `UnexpectedEof` error and
    /// a longer one an `InvalidData` error, never a silently cut upload.
    pub fn into_body<R: Read>(self, payload: R, payload_len: u64) -> impl Read {
        Cursor::new(self.head)
            .chain(ExactReader {
                inner: payload,
                remaining: payload_len,
                end_checked: false,
            })
            .chain(Cursor::new(self.tail))
    }
}

/// Percent-escape the characters that would break a quoted header value,
/// the same way browsers encode form-data file names.
pub fn escape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("%22"),
            '\r' => out.push_str("%0D"),
            '\n' => out.push_str("%0A"),
            other => out.push(other),
        }
    }
    out
}

/// Content type for a file part, by name.
pub fn content_type_for(file_name: &str) -> &'static str {
    if file_name.to_lowercase().ends_with(".zip") {
        "application/zip"
    } else {
        "application/octet-stream"
    }
}

/// Reader that yields exactly `remaining` bytes of its inner reader and
/// fails if the inner reader ends early or has more to give.
struct ExactReader<R> {
    inner: R,
    remaining: u64,
    end_checked: bool,
}

impl<R: Read> Read for ExactReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.remaining == 0 {
            if !self.end_checked {
                self.end_checked = true;
                let mut extra = [0u8; 1];
                if self.inner.read(&mut extra)? > 0 {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "file changed while it was being sent",
                    ));
                }
            }
            return Ok(0);
        }
        let max = usize::try_from(self.remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let n = self.inner.read(&mut buf[..max])?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("payload ended {} bytes early", self.remaining),
            ));
        }
        self.remaining -= n as u64;
        Ok(n)
    }
}

/// Reader that reports the running byte count after every read.
pub struct ProgressReader<R, F> {
    inner: R,
    sent: u64,
    on_progress: F,
}

impl<R: Read, F: FnMut(u64)> ProgressReader<R, F> {
    pub fn new(inner: R, on_progress: F) -> Self {
        Self {
            inner,
            sent: 0,
            on_progress,
        }
    }
}

impl<R: Read, F: FnMut(u64)> Read for ProgressReader<R, F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.sent += n as u64;
            (self.on_progress)(self.sent);
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_string(framing: FilePartFraming, payload: &[u8]) -> String {
        let mut out = Vec::new();
        framing
            .into_body(payload, payload.len() as u64)
            .read_to_end(&mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn frames_a_single_file_part() {
        let framing = FilePartFraming::new("XYZ", "files", "a.zip", "application/zip");
        assert_eq!(framing.content_type(), "multipart/form-data; boundary=XYZ");
        assert_eq!(framing.body_len(5), body_string(framing.clone(), b"hello").len() as u64);

        let body = body_string(framing, b"hello");
        assert_eq!(
            body,
            "--XYZ\r\n\
             Content-Disposition: form-data; name=\"files\"; filename=\"a.zip\"\r\n\
             Content-Type: application/zip\r\n\
             \r\n\
             hello\r\n\
             --XYZ--\r\n"
        );
    }

    #[test]
    fn escapes_quotes_and_newlines_in_names() {
        assert_eq!(escape_quoted("a\"b\r\nc.zip"), "a%22b%0D%0Ac.zip");
        let framing = FilePartFraming::new("B", "files", "we\"ird.zip", "application/zip");
        assert!(body_string(framing, b"").contains("filename=\"we%22ird.zip\""));
    }

    #[test]
    fn short_payload_is_an_error() {
        let framing = FilePartFraming::new("B", "files", "a.zip", "application/zip");
        let mut body = framing.into_body(&b"abc"[..], 10);
        let mut out = Vec::new();
        let err = body.read_to_end(&mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn longer_payload_is_an_error() {
        let framing = FilePartFraming::new("B", "files", "a.zip", "application/zip");
        let mut body = framing.into_body(&b"abcdef"[..], 3);
        let mut out = Vec::new();
        let err = body.read_to_end(&mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(!out.ends_with(b"--B--\r\n"), "tail must not follow a longer payload");
    }

    #[test]
    fn random_boundaries_differ() {
        let a = FilePartFraming::with_random_boundary("files", "a.zip", "application/zip");
        let b = FilePartFraming::with_random_boundary("files", "a.zip", "application/zip");
        assert_ne!(a.boundary(), b.boundary());
    }

    #[test]
    fn progress_reader_reports_running_total() {
        let mut seen = Vec::new();
        let mut reader = ProgressReader::new(&b"0123456789"[..], |n| seen.push(n));
        let mut buf = [0u8; 4];
        while reader.read(&mut buf).unwrap() > 0 {}
        drop(reader);
        assert_eq!(seen, vec![4, 8, 10]);
    }

    #[test]
    fn content_type_by_suffix() {
        assert_eq!(content_type_for("A.ZIP"), "application/zip");
        assert_eq!(content_type_for("a.cbz"), "application/octet-stream");
    }
}
