//! HTML output helpers.
//!
//! Every value written into a page goes through [`escape`]. There is no
//! "trusted" path around it.

/// Escape `&`, `<`, `>`, `"` and `'` for use in HTML text and attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap a body fragment in a complete HTML document.
pub fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         \x20   <meta charset=\"UTF-8\">\n\
         \x20   <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         \x20   <title>{}</title>\n\
         </head>\n\
         <body>\n\
         {}\
         </body>\n\
         </html>\n",
        escape(title),
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(
            escape(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#039;y&#039;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escape_leaves_plain_text() {
        assert_eq!(escape("photo.png (12 bytes)"), "photo.png (12 bytes)");
        assert_eq!(escape("żółw"), "żółw");
    }

    #[test]
    fn test_document_wraps_body() {
        let page = document("A <b>", "<p>hi</p>\n");
        assert!(page.starts_with("<!DOCTYPE html>\n"));
        assert!(page.contains("<title>A &lt;b&gt;</title>"));
        assert!(page.contains("<body>\n<p>hi</p>\n</body>"));
    }
}
