//! Magic-number sniffing for files whose extension says nothing useful.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Number of leading bytes inspected.
pub const SNIFF_LEN: usize = 8;

const SIGNATURES: &[(&[u8], &str)] = &[
    (b"\x89PNG\r\n\x1a\n", "public.png"),
    (b"\xff\xd8\xff", "public.jpeg"),
    (b"GIF87a", "com.compuserve.gif"),
    (b"GIF89a", "com.compuserve.gif"),
    (b"%PDF-", "com.adobe.pdf"),
    (b"PK\x03\x04", "com.pkware.zip-archive"),
    (b"PK\x05\x06", "com.pkware.zip-archive"),
    (b"\x1f\x8b", "org.gnu.gnu-zip-archive"),
];

/// Identifier whose signature prefixes `header`.
pub fn sniff(header: &[u8]) -> Option<&'static str> {
    SIGNATURES
        .iter()
        .find(|(magic, _)| header.starts_with(magic))
        .map(|(_, identifier)| *identifier)
}

/// Reads the first [`SNIFF_LEN`] bytes of `path` and sniffs them.
pub fn sniff_file(path: &Path) -> io::Result<Option<&'static str>> {
    let mut header = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut header)?;
    Ok(sniff(&header))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_signatures() {
        assert_eq!(sniff(b"\x89PNG\r\n\x1a\n...."), Some("public.png"));
        assert_eq!(sniff(b"PK\x03\x04rest"), Some("com.pkware.zip-archive"));
        assert_eq!(sniff(b"%PDF-1.7"), Some("com.adobe.pdf"));
    }

    #[test]
    fn short_or_unknown_headers() {
        assert_eq!(sniff(b""), None);
        assert_eq!(sniff(b"PK"), None);
        assert_eq!(sniff(b"hello world"), None);
    }
}
