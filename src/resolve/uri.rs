use log::debug;
use memchr::{memchr, memchr_iter};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Characters whose escapes [`decode_uri`] leaves alone.
const RESERVED: &[u8] = b";/?:@&=+$,#";

/// Percent-decodes a link href, the way a browser's `decodeURI` does.
///
/// Escapes of the URI-reserved characters `; / ? : @ & = + $ , #` stay escaped, so that decoding never changes how the
/// href splits into its parts: an encoded `%23` is part of the title, not the start of an anchor. Everything else is
/// decoded as UTF-8.
///
/// If the href isn't well-formed (a `%` not followed by two hex digits, or escapes that don't decode to UTF-8), it's
/// returned as-is.
///
/// ```
/// use wikipage::resolve::decode_uri;
///
/// assert_eq!(decode_uri("Caf%C3%A9%20Menu"), "Café Menu");
/// assert_eq!(decode_uri("Q%26A#top"), "Q%26A#top");
/// assert_eq!(decode_uri("100%"), "100%");
/// ```
pub fn decode_uri(href: &str) -> Cow<'_, str> {
    if memchr(b'%', href.as_bytes()).is_none() {
        return Cow::Borrowed(href);
    }
    match try_decode_uri(href) {
        Some(decoded) => Cow::Owned(decoded),
        None => {
            debug!("keeping malformed href {href:?} as-is");
            Cow::Borrowed(href)
        }
    }
}

fn try_decode_uri(href: &str) -> Option<String> {
    let bytes = href.as_bytes();
    let mut decoded = String::with_capacity(href.len());
    // Start of the run we haven't copied to `decoded` yet. Runs are split at reserved escapes.
    let mut run_start = 0;
    for pct in memchr_iter(b'%', bytes) {
        let byte = match bytes.get(pct + 1..pct + 3) {
            Some(&[hi, lo]) => hex_value(hi)? << 4 | hex_value(lo)?,
            _ => return None,
        };
        if RESERVED.contains(&byte) {
            decoded.push_str(&percent_decode_str(&href[run_start..pct]).decode_utf8().ok()?);
            decoded.push_str(&href[pct..pct + 3]);
            run_start = pct + 3;
        }
    }
    decoded.push_str(&percent_decode_str(&href[run_start..]).decode_utf8().ok()?);
    Some(decoded)
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// Turns an article title into the path segment that addresses it.
///
/// The first `?` becomes `%3f`, so the title isn't cut off at what would look like a query string. Later `?`s and all
/// other characters pass through, which keeps the paths identical to the ones the wiki already serves.
///
/// ```
/// use wikipage::resolve::title_to_path;
///
/// assert_eq!(title_to_path("Why? Why not?"), "Why%3f Why not?");
/// assert_eq!(title_to_path("Plain"), "Plain");
/// ```
pub fn title_to_path(title: &str) -> Cow<'_, str> {
    if memchr(b'?', title.as_bytes()).is_none() {
        Cow::Borrowed(title)
    } else {
        Cow::Owned(title.replacen('?', "%3f", 1))
    }
}

/// Splits an href at its first `#` into the path and the anchor (without the `#`).
pub fn split_anchor(href: &str) -> (&str, Option<&str>) {
    match memchr(b'#', href.as_bytes()) {
        Some(idx) => (&href[..idx], Some(&href[idx + 1..])),
        None => (href, None),
    }
}
