//! Content-type inference.
//!
//! The content type of an artifact is never stored. It is derived from the
//! name and the first [`SNIFF_LEN`] bytes of content every time it is needed,
//! so it always reflects the current value.
//!
//! [`MagicSniffer`] follows the WHATWG MIME sniffing algorithm: a fixed table
//! of leading-byte signatures checked in order, then a text/binary heuristic,
//! then `application/octet-stream`.

/// Maximum number of content bytes handed to a sniffer.
pub const SNIFF_LEN: usize = 512;

/// Extensions that are always reported as `text/plain`.
///
/// Logs and plain/rich text routinely open with bytes that sniff as something
/// else (or as binary), so the name wins over the content for these.
const PLAIN_TEXT_EXTENSIONS: [&str; 3] = ["log", "txt", "rtf"];

const PLAIN_TEXT: &str = "text/plain";
const OCTET_STREAM: &str = "application/octet-stream";

/// Maps a content prefix to a MIME type string.
///
/// Must be total: unrecognized content gets a generic type, never an error.
/// The returned string may carry parameters (`; charset=...`).
pub trait ContentSniffer {
    fn detect(&self, data: &[u8]) -> String;
}

impl<S: ContentSniffer + ?Sized> ContentSniffer for &S {
    fn detect(&self, data: &[u8]) -> String {
        (**self).detect(data)
    }
}

/// Infer the content type for an artifact `name` with `content`.
///
/// Names ending in `.log`, `.txt` or `.rtf` (any case) are `text/plain`
/// regardless of content. Everything else is sniffed from at most the first
/// [`SNIFF_LEN`] bytes, with any parameter suffix stripped.
///
/// # Examples
///
/// ```
/// use bin_core::sniff::{infer_content_type, MagicSniffer};
///
/// assert_eq!(infer_content_type("notes.txt", b"hello", &MagicSniffer), "text/plain");
/// assert_eq!(infer_content_type("page", b"<html></html>", &MagicSniffer), "text/html");
/// ```
pub fn infer_content_type<S: ContentSniffer + ?Sized>(
    name: &str,
    content: &[u8],
    sniffer: &S,
) -> String {
    if let Some(ext) = extension(name) {
        if PLAIN_TEXT_EXTENSIONS
            .iter()
            .any(|plain| plain.eq_ignore_ascii_case(ext))
        {
            return PLAIN_TEXT.to_string();
        }
    }

    let prefix = &content[..content.len().min(SNIFF_LEN)];
    let detected = sniffer.detect(prefix);
    strip_parameters(&detected).to_string()
}

/// Substring after the last `.` of the final `/`-separated path component.
/// A backslash is an ordinary file name character.
fn extension(name: &str) -> Option<&str> {
    let file_name = name.rsplit('/').next().unwrap_or(name);
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}

fn strip_parameters(mime: &str) -> &str {
    mime.split(';').next().unwrap_or(mime).trim_end()
}

/// Signature-table sniffer.
#[derive(Debug, Default, Clone, Copy)]
pub struct MagicSniffer;

impl ContentSniffer for MagicSniffer {
    fn detect(&self, data: &[u8]) -> String {
        let data = &data[..data.len().min(SNIFF_LEN)];
        SIGNATURES
            .iter()
            .find_map(|sig| sig.matches(data))
            .unwrap_or(OCTET_STREAM)
            .to_string()
    }
}

enum Signature {
    /// HTML tag, case-insensitive, after leading whitespace, followed by a
    /// space or `>`.
    Html(&'static [u8]),
    Exact {
        sig: &'static [u8],
        mime: &'static str,
    },
    Masked {
        mask: &'static [u8],
        pattern: &'static [u8],
        skip_ws: bool,
        mime: &'static str,
    },
    /// ISO base media file with an `mp4` brand in its `ftyp` box.
    Mp4,
    /// No binary control bytes after leading whitespace.
    Text,
}

const HTML_UTF8: &str = "text/html; charset=utf-8";

static SIGNATURES: &[Signature] = &[
    Signature::Html(b"<!DOCTYPE HTML"),
    Signature::Html(b"<HTML"),
    Signature::Html(b"<HEAD"),
    Signature::Html(b"<SCRIPT"),
    Signature::Html(b"<IFRAME"),
    Signature::Html(b"<H1"),
    Signature::Html(b"<DIV"),
    Signature::Html(b"<FONT"),
    Signature::Html(b"<TABLE"),
    Signature::Html(b"<A"),
    Signature::Html(b"<STYLE"),
    Signature::Html(b"<TITLE"),
    Signature::Html(b"<B"),
    Signature::Html(b"<BODY"),
    Signature::Html(b"<BR"),
    Signature::Html(b"<P"),
    Signature::Html(b"<!--"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\xFF",
        pattern: b"<?xml",
        skip_ws: true,
        mime: "text/xml; charset=utf-8",
    },
    Signature::Exact {
        sig: b"%PDF-",
        mime: "application/pdf",
    },
    Signature::Exact {
        sig: b"%!PS-Adobe-",
        mime: "application/postscript",
    },
    // Byte order marks
    Signature::Masked {
        mask: b"\xFF\xFF\x00\x00",
        pattern: b"\xFE\xFF\x00\x00",
        skip_ws: false,
        mime: "text/plain; charset=utf-16be",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\x00\x00",
        pattern: b"\xFF\xFE\x00\x00",
        skip_ws: false,
        mime: "text/plain; charset=utf-16le",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\x00",
        pattern: b"\xEF\xBB\xBF\x00",
        skip_ws: false,
        mime: "text/plain; charset=utf-8",
    },
    // Images
    Signature::Exact {
        sig: b"\x00\x00\x01\x00",
        mime: "image/x-icon",
    },
    Signature::Exact {
        sig: b"\x00\x00\x02\x00",
        mime: "image/x-icon",
    },
    Signature::Exact {
        sig: b"BM",
        mime: "image/bmp",
    },
    Signature::Exact {
        sig: b"GIF87a",
        mime: "image/gif",
    },
    Signature::Exact {
        sig: b"GIF89a",
        mime: "image/gif",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00WEBPVP",
        skip_ws: false,
        mime: "image/webp",
    },
    Signature::Exact {
        sig: b"\x89PNG\x0D\x0A\x1A\x0A",
        mime: "image/png",
    },
    Signature::Exact {
        sig: b"\xFF\xD8\xFF",
        mime: "image/jpeg",
    },
    // Audio and video
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"FORM\x00\x00\x00\x00AIFF",
        skip_ws: false,
        mime: "audio/aiff",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF",
        pattern: b"ID3",
        skip_ws: false,
        mime: "audio/mpeg",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\xFF",
        pattern: b"OggS\x00",
        skip_ws: false,
        mime: "application/ogg",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF",
        pattern: b"MThd\x00\x00\x00\x06",
        skip_ws: false,
        mime: "audio/midi",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00AVI ",
        skip_ws: false,
        mime: "video/avi",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00WAVE",
        skip_ws: false,
        mime: "audio/wave",
    },
    Signature::Exact {
        sig: b".snd",
        mime: "audio/basic",
    },
    Signature::Mp4,
    Signature::Exact {
        sig: b"\x1A\x45\xDF\xA3",
        mime: "video/webm",
    },
    // Fonts
    Signature::Masked {
        // 34 don't-care bytes, then "LP"
        mask: b"\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\xFF\xFF",
        pattern: b"\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00LP",
        skip_ws: false,
        mime: "application/vnd.ms-fontobject",
    },
    Signature::Exact {
        sig: b"\x00\x01\x00\x00",
        mime: "font/ttf",
    },
    Signature::Exact {
        sig: b"OTTO",
        mime: "font/otf",
    },
    Signature::Exact {
        sig: b"ttcf",
        mime: "font/collection",
    },
    Signature::Exact {
        sig: b"wOFF",
        mime: "font/woff",
    },
    Signature::Exact {
        sig: b"wOF2",
        mime: "font/woff2",
    },
    // Archives
    Signature::Exact {
        sig: b"\x1F\x8B\x08",
        mime: "application/x-gzip",
    },
    Signature::Exact {
        sig: b"PK\x03\x04",
        mime: "application/zip",
    },
    Signature::Exact {
        sig: b"Rar!\x1A\x07\x00",
        mime: "application/x-rar-compressed",
    },
    Signature::Exact {
        sig: b"Rar!\x1A\x07\x01\x00",
        mime: "application/x-rar-compressed",
    },
    Signature::Exact {
        sig: b"\x00\x61\x73\x6D",
        mime: "application/wasm",
    },
    Signature::Text,
];

impl Signature {
    fn matches(&self, data: &[u8]) -> Option<&'static str> {
        match self {
            Signature::Html(tag) => html_matches(tag, data).then_some(HTML_UTF8),
            Signature::Exact { sig, mime } => data.starts_with(sig).then_some(*mime),
            Signature::Masked {
                mask,
                pattern,
                skip_ws,
                mime,
            } => {
                let data = if *skip_ws { skip_whitespace(data) } else { data };
                masked_matches(mask, pattern, data).then_some(*mime)
            }
            Signature::Mp4 => mp4_matches(data).then_some("video/mp4"),
            Signature::Text => skip_whitespace(data)
                .iter()
                .all(|&b| !is_binary_byte(b))
                .then_some("text/plain; charset=utf-8"),
        }
    }
}

fn html_matches(tag: &[u8], data: &[u8]) -> bool {
    let data = skip_whitespace(data);
    if data.len() < tag.len() + 1 {
        return false;
    }
    let letters_match = tag.iter().zip(data).all(|(&t, &d)| {
        if t.is_ascii_uppercase() {
            d & 0xDF == t
        } else {
            d == t
        }
    });
    letters_match && is_tag_terminator(data[tag.len()])
}

fn masked_matches(mask: &[u8], pattern: &[u8], data: &[u8]) -> bool {
    if data.len() < pattern.len() {
        return false;
    }
    mask.iter()
        .zip(pattern)
        .zip(data)
        .all(|((&m, &p), &d)| d & m == p)
}

fn mp4_matches(data: &[u8]) -> bool {
    if data.len() < 12 {
        return false;
    }
    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if data.len() < box_size || box_size % 4 != 0 || &data[4..8] != b"ftyp" {
        return false;
    }
    // Offset 12 holds the minor version, not a brand.
    (8..box_size)
        .step_by(4)
        .filter(|&offset| offset != 12)
        .any(|offset| &data[offset..offset + 3] == b"mp4")
}

fn skip_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|&b| !matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

fn is_tag_terminator(b: u8) -> bool {
    b == b' ' || b == b'>'
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}
