//! Input sanitation.
//!
//! Raw submitted values have markup removed and surrounding whitespace
//! trimmed before they are stored. The transform is idempotent: a `<` that
//! survives is always followed by whitespace or ends the text, so a second
//! pass finds no tags.

/// Strip markup from `raw` and trim the result.
pub fn sanitize(raw: &str) -> String {
    strip_tags(raw).trim().to_string()
}

/// Remove tags and comments from `input`.
///
/// A `<` followed by a non-whitespace character opens a tag, which closes at
/// the next `>` outside a quoted attribute value. `<!--` opens a comment
/// closed by `-->`. An unterminated tag or comment swallows the rest of the
/// input.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        match after.chars().next() {
            Some(c) if !c.is_whitespace() => {}
            _ => {
                out.push('<');
                rest = after;
                continue;
            }
        }

        if let Some(comment) = after.strip_prefix("!--") {
            match comment.find("-->") {
                Some(end) => rest = &comment[end + 3..],
                None => return out,
            }
            continue;
        }

        match tag_end(after) {
            Some(end) => rest = &after[end + 1..],
            None => return out,
        }
    }

    out.push_str(rest);
    out
}

/// Byte offset of the `>` closing a tag body, skipping quoted values.
fn tag_end(body: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in body.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => return Some(i),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_strips() {
        assert_eq!(sanitize("  <b>Al</b>  "), "Al");
        assert_eq!(sanitize("\t plain \n"), "plain");
    }

    #[test]
    fn test_strips_attributes_with_quoted_gt() {
        assert_eq!(strip_tags(r#"<a href="x>y" title='>'>link</a>"#), "link");
    }

    #[test]
    fn test_strips_comments() {
        assert_eq!(strip_tags("a<!-- <b>hidden</b> -->b"), "ab");
    }

    #[test]
    fn test_unterminated_tag_drops_rest() {
        assert_eq!(strip_tags("keep<script src=x"), "keep");
        assert_eq!(strip_tags("keep<!-- open"), "keep");
    }

    #[test]
    fn test_literal_angle_brackets() {
        assert_eq!(sanitize("1 < 2"), "1 < 2");
        assert_eq!(sanitize("2 > 1"), "2 > 1");
        assert_eq!(sanitize("x <"), "x <");
    }

    #[test]
    fn test_idempotent_on_tricky_inputs() {
        for raw in ["<<b>b>", " < <i>x</i> ", "a<\t>b", "<p>  <</p>", "é<br/>ü"] {
            let once = sanitize(raw);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", raw);
        }
    }
}
