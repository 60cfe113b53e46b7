//! `multipart/form-data` body decoding.
//!
//! The body is split on `--<boundary>`. Every segment that is neither empty nor
//! the closing `--` marker becomes one [`Upload`]: its leading lines up to the
//! first blank line are part headers, the rest is the content.

use bytes::Bytes;

use crate::protocol::{ParseError, Upload};

const BOUNDARY_PARAM: &str = "boundary=";
const FILENAME_PARAM: &str = "filename=";
const CONTENT_DISPOSITION: &[u8] = b"content-disposition:";
const CONTENT_TYPE: &[u8] = b"content-type:";

/// Returns true if the content type announces a multipart form body.
pub fn is_multipart(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains(mime::MULTIPART_FORM_DATA.essence_str())
}

/// Extracts the boundary token following `boundary=` in the content type.
pub fn boundary(content_type: &str) -> Result<&str, ParseError> {
    let boundary = content_type
        .find(BOUNDARY_PARAM)
        .map(|idx| &content_type[idx + BOUNDARY_PARAM.len()..])
        .and_then(|rest| rest.split(';').next())
        .map(|token| token.trim().trim_matches('"'))
        .unwrap_or_default();

    if boundary.is_empty() {
        return Err(ParseError::missing_boundary(content_type));
    }
    Ok(boundary)
}

/// Splits `body` into uploads, one per non-empty part.
pub fn decode(body: &[u8], boundary: &str) -> Vec<Upload> {
    let delimiter = [b"--".as_slice(), boundary.as_bytes()].concat();

    split_on(body, &delimiter)
        .into_iter()
        .map(trim_line_breaks)
        .filter(|segment| !segment.is_empty() && *segment != b"--")
        .map(decode_part)
        .collect()
}

fn decode_part(segment: &[u8]) -> Upload {
    let lines = segment.split(|b| *b == b'\n').collect::<Vec<_>>();

    let mut filename = String::new();
    let mut content_type = String::new();
    let mut content_start = 0;

    for (i, line) in lines.iter().enumerate() {
        let line = line.trim_ascii();
        if line.is_empty() {
            content_start = i + 1;
            break;
        }
        if let Some(value) = strip_prefix_ignore_case(line, CONTENT_DISPOSITION) {
            if let Some(name) = disposition_filename(&String::from_utf8_lossy(value)) {
                filename = name;
            }
        } else if let Some(value) = strip_prefix_ignore_case(line, CONTENT_TYPE) {
            content_type = String::from_utf8_lossy(value).trim().to_owned();
        }
    }

    if content_type.is_empty() {
        content_type = mime::APPLICATION_OCTET_STREAM.to_string();
    }

    let content = lines[content_start..].join(b"\n".as_slice());
    Upload::new(filename, content_type, Bytes::from(content))
}

fn disposition_filename(disposition: &str) -> Option<String> {
    let idx = disposition.find(FILENAME_PARAM)?;
    let rest = &disposition[idx + FILENAME_PARAM.len()..];
    let value = match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next(),
        None => rest.split(';').next(),
    };
    value.map(|name| name.trim().to_owned())
}

fn strip_prefix_ignore_case<'a>(line: &'a [u8], prefix: &[u8]) -> Option<&'a [u8]> {
    match line.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&line[prefix.len()..]),
        _ => None,
    }
}

fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut segments = Vec::new();
    let mut rest = haystack;
    while let Some(pos) = rest.windows(needle.len()).position(|window| window == needle) {
        segments.push(&rest[..pos]);
        rest = &rest[pos + needle.len()..];
    }
    segments.push(rest);
    segments
}

fn trim_line_breaks(mut segment: &[u8]) -> &[u8] {
    while let [b'\r' | b'\n', rest @ ..] = segment {
        segment = rest;
    }
    while let [rest @ .., b'\r' | b'\n'] = segment {
        segment = rest;
    }
    segment
}
