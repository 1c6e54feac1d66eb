use crate::error::{GitignoreError, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Marker the service embeds in a 200 body when a requested template is unknown
pub const ERROR_MARKER: &str = "#!! ERROR:";

/// Returns `false` if and only if `content` carries the service's error marker.
///
/// The service answers unknown templates with a successful status and a body like
/// `#!! ERROR: nope is undefined. Use list command to see defined gitignore types !!#`,
/// so this check has to run on every response regardless of its status code.
#[must_use]
pub fn is_valid_response(content: &str) -> bool {
    !content.contains(ERROR_MARKER)
}

/// Characters that separate names or end the path segment of a request URL
pub const RESERVED_CHARS: [char; 6] = [',', '/', '\\', '?', '#', '%'];

/// Identifier of a single template, e.g. `python` or `visualstudiocode`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TemplateName(String);

impl TemplateName {
    /// Creates a template name from user or service input
    ///
    /// # Errors
    ///
    /// Returns `GitignoreError::InvalidName` if the name is blank, contains whitespace,
    /// or contains one of [`RESERVED_CHARS`], all of which would change the request path.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty()
            || trimmed.contains(RESERVED_CHARS)
            || trimmed.contains(char::is_whitespace)
        {
            return Err(GitignoreError::InvalidName {
                name: name.as_ref().to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match against a search query
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.0.to_lowercase().contains(&query.to_lowercase())
    }

    fn same_as(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TemplateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Non-empty, duplicate-free list of templates requested together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateQuery {
    names: Vec<TemplateName>,
}

impl TemplateQuery {
    /// Builds a query, keeping the first occurrence of names that differ only by case
    ///
    /// # Errors
    ///
    /// Returns `GitignoreError::EmptyQuery` if `names` yields nothing.
    pub fn new(names: impl IntoIterator<Item = TemplateName>) -> Result<Self> {
        let mut unique: Vec<TemplateName> = Vec::new();
        for name in names {
            if !unique.iter().any(|existing| existing.same_as(&name)) {
                unique.push(name);
            }
        }
        if unique.is_empty() {
            return Err(GitignoreError::EmptyQuery);
        }
        Ok(Self { names: unique })
    }

    /// Parses raw strings into a query
    ///
    /// # Errors
    ///
    /// - `GitignoreError::InvalidName` if any entry is not a valid name.
    /// - `GitignoreError::EmptyQuery` if there are no entries.
    pub fn parse<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(TemplateName::new)
            .collect::<Result<Vec<_>>>()?;
        Self::new(names)
    }

    #[must_use]
    pub fn names(&self) -> &[TemplateName] {
        &self.names
    }

    /// Names in request order, comma-joined, as used in the request path
    #[must_use]
    pub fn joined(&self) -> String {
        self.names
            .iter()
            .map(TemplateName::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Order-independent identity: lowercase names, sorted, comma-joined
    #[must_use]
    pub fn cache_key(&self) -> String {
        let mut keys: Vec<String> = self.names.iter().map(|n| n.0.to_lowercase()).collect();
        keys.sort();
        keys.join(",")
    }
}

impl fmt::Display for TemplateQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Raw body returned by the service for a query; never modified after fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContent(String);

impl TemplateContent {
    #[must_use]
    pub const fn new(text: String) -> Self {
        Self(text)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_response(&self.0)
    }
}

impl From<&str> for TemplateContent {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl fmt::Display for TemplateContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every template name the service knows, sorted and without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateCatalog {
    names: Vec<TemplateName>,
}

impl TemplateCatalog {
    /// Parses the `/list` body: comma separated, possibly wrapped over several lines
    #[must_use]
    pub fn parse(body: &str) -> Self {
        let names: BTreeSet<TemplateName> = body
            .split([',', '\n'])
            .filter_map(|entry| TemplateName::new(entry).ok())
            .collect();
        Self {
            names: names.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn names(&self) -> &[TemplateName] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names containing `query` case-insensitively, in catalog order
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<TemplateName> {
        self.names
            .iter()
            .filter(|name| name.matches(query))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> TemplateName {
        TemplateName::new(s).unwrap()
    }

    #[test]
    fn test_is_valid_response() {
        assert!(is_valid_response("# Created by gitignore\n*.pyc\n"));
        assert!(is_valid_response(""));
        assert!(is_valid_response("# ERROR: this is only a comment"));
        assert!(!is_valid_response("#!! ERROR: nope is undefined !!#"));
        assert!(!is_valid_response(
            "*.class\n\n#!! ERROR: xyz is undefined. Use list command !!#\n*.log"
        ));
    }

    #[test]
    fn test_template_name_validation() {
        assert_eq!(name("  python ").as_str(), "python");
        assert!(matches!(
            TemplateName::new(""),
            Err(GitignoreError::InvalidName { .. })
        ));
        assert!(matches!(
            TemplateName::new("   "),
            Err(GitignoreError::InvalidName { .. })
        ));
        assert!(TemplateName::new("java,linux").is_err());
        assert!(TemplateName::new("../list").is_err());
        assert!(TemplateName::new("c++").is_ok());
        assert!(TemplateName::new("jetbrains+all").is_ok());
    }

    #[test]
    fn test_template_name_rejects_url_syntax() {
        for raw in ["python#nope", "python?nope", "python%23", "py\\thon", "py thon"] {
            assert!(
                matches!(TemplateName::new(raw), Err(GitignoreError::InvalidName { .. })),
                "{raw} should be rejected"
            );
        }
        assert!(TemplateQuery::parse(["python", "python#nope"]).is_err());
    }

    #[test]
    fn test_template_name_matches_case_insensitive() {
        let n = name("JavaScript");
        assert!(n.matches("java"));
        assert!(n.matches("SCRIPT"));
        assert!(n.matches(""));
        assert!(!n.matches("python"));
    }

    #[test]
    fn test_query_rejects_empty() {
        assert!(matches!(
            TemplateQuery::new(Vec::new()),
            Err(GitignoreError::EmptyQuery)
        ));
        let empty: [&str; 0] = [];
        assert!(matches!(
            TemplateQuery::parse(empty),
            Err(GitignoreError::EmptyQuery)
        ));
    }

    #[test]
    fn test_query_dedupes_keeping_order() {
        let query = TemplateQuery::parse(["linux", "java", "Linux", "java"]).unwrap();
        assert_eq!(query.joined(), "linux,java");
        assert_eq!(query.names().len(), 2);
    }

    #[test]
    fn test_cache_key_is_order_independent() {
        let a = TemplateQuery::parse(["linux", "java"]).unwrap();
        let b = TemplateQuery::parse(["java", "linux"]).unwrap();
        let c = TemplateQuery::parse(["Java", "LINUX"]).unwrap();
        assert_ne!(a.joined(), b.joined());
        assert_eq!(a.cache_key(), "java,linux");
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), c.cache_key());
    }

    #[test]
    fn test_catalog_parse_sorts_and_dedupes() {
        let catalog = TemplateCatalog::parse("python,java, linux,\njava,c++, ,go\n");
        let names: Vec<&str> = catalog.names().iter().map(TemplateName::as_str).collect();
        assert_eq!(names, ["c++", "go", "java", "linux", "python"]);
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn test_catalog_parse_case_sensitive_order() {
        let catalog = TemplateCatalog::parse("b,a,B,A");
        let names: Vec<&str> = catalog.names().iter().map(TemplateName::as_str).collect();
        assert_eq!(names, ["A", "B", "a", "b"]);
    }

    #[test]
    fn test_catalog_parse_empty() {
        assert!(TemplateCatalog::parse("").is_empty());
        assert!(TemplateCatalog::parse(" , \n").is_empty());
    }

    #[test]
    fn test_catalog_search() {
        let catalog = TemplateCatalog::parse("java,javascript,kotlin,Java-Web,python");
        let found: Vec<String> = catalog
            .search("JAVA")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(found, ["Java-Web", "java", "javascript"]);
        assert_eq!(catalog.search("").len(), catalog.len());
        assert!(catalog.search("zig").is_empty());
    }

    #[test]
    fn test_content_validity() {
        assert!(TemplateContent::from("*.o\n").is_valid());
        assert!(!TemplateContent::from("#!! ERROR: x is undefined !!#").is_valid());
    }
}
