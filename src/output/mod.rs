//! Writing processed pages, as HTML or JSON.
mod fmt_html;

pub use fmt_html::*;

use crate::doc::Page;
use std::io;

/// Writes the page as a single line of JSON, in the same format that pages are read in.
pub fn write_json<W: io::Write>(page: &Page, mut out: W) -> io::Result<()> {
    serde_json::to_writer(&mut out, page)?;
    out.write_all(b"\n")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::*;

    #[test]
    fn json_is_readable_back() {
        let mut page = page(vec![heading(2, Some("a"), "A"), mark(1)]);
        page.aside.footnotes = None;
        let mut bytes = Vec::new();
        write_json(&page, &mut bytes).unwrap();

        let json = String::from_utf8(bytes).unwrap();
        assert!(json.ends_with("}\n"));
        assert_eq!(serde_json::from_str::<Page>(&json).unwrap(), page);
    }

    #[test]
    fn json_shape() {
        let page = page(vec![text("hi")]);
        let mut bytes = Vec::new();
        write_json(&page, &mut bytes).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"article":{"id":1,"body":[{"kind":"text","value":"hi"}]},"included":[],"aside":{"footnotes":[]}}"#.to_string()
                + "\n"
        );
    }
}
