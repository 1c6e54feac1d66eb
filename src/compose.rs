use crate::template::TemplateContent;

/// Builds the bytes of the final `.gitignore`.
///
/// - `existing` is kept as a prefix, followed by a newline unless it already ends with one.
/// - `append` follows the content after exactly one newline and is written verbatim.
///   An empty `append` is the same as `None`.
///
/// The content is expected to have passed [`TemplateContent::is_valid`] already.
#[must_use]
pub fn compose(
    content: &TemplateContent,
    existing: Option<&[u8]>,
    append: Option<&str>,
) -> Vec<u8> {
    let body = content.as_str().as_bytes();
    let append = append.filter(|text| !text.is_empty());

    let mut output = Vec::with_capacity(
        existing.map_or(0, <[u8]>::len) + body.len() + append.map_or(0, str::len) + 2,
    );

    if let Some(existing) = existing
        && !existing.is_empty()
    {
        output.extend_from_slice(existing);
        if !existing.ends_with(b"\n") {
            output.push(b'\n');
        }
    }

    output.extend_from_slice(body);

    if let Some(text) = append {
        if !output.is_empty() && !output.ends_with(b"\n") {
            output.push(b'\n');
        }
        output.extend_from_slice(text.as_bytes());
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(s: &str) -> TemplateContent {
        TemplateContent::from(s)
    }

    #[test]
    fn test_compose_content_only() {
        let c = content("# Python\n*.pyc\n");
        assert_eq!(compose(&c, None, None), b"# Python\n*.pyc\n");
    }

    #[test]
    fn test_compose_existing_without_newline() {
        let out = compose(&content("*.pyc\n"), Some(b"foo"), None);
        assert_eq!(out, b"foo\n*.pyc\n");
    }

    #[test]
    fn test_compose_existing_with_newline() {
        let out = compose(&content("*.pyc\n"), Some(b"foo\n"), None);
        assert_eq!(out, b"foo\n*.pyc\n");
    }

    #[test]
    fn test_compose_empty_existing_adds_nothing() {
        let out = compose(&content("*.pyc\n"), Some(b""), None);
        assert_eq!(out, b"*.pyc\n");
    }

    #[test]
    fn test_compose_append_verbatim() {
        let out = compose(&content("A"), None, Some("tag1 tag2"));
        assert_eq!(out, b"A\ntag1 tag2");

        let out = compose(&content("A\n"), None, Some("build/\n*.tmp"));
        assert_eq!(out, b"A\nbuild/\n*.tmp");
    }

    #[test]
    fn test_compose_empty_append_is_omitted() {
        let c = content("A\n");
        assert_eq!(compose(&c, None, Some("")), compose(&c, None, None));
    }

    #[test]
    fn test_compose_existing_and_append() {
        let out = compose(&content("*.log"), Some(b"# mine"), Some("local/"));
        assert_eq!(out, b"# mine\n*.log\nlocal/");
    }

    #[test]
    fn test_compose_non_utf8_existing_preserved() {
        let existing = [0xff, 0xfe, b'x'];
        let out = compose(&content("y\n"), Some(&existing), None);
        assert_eq!(out, [0xff, 0xfe, b'x', b'\n', b'y', b'\n']);
    }
}
