//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors raised while splitting a metadata block from a post body
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unterminated JSON front-matter")]
    UnterminatedJson,
}

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub author: String,
    pub category: String,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    #[serde(rename = "coverImage", skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Posts are published unless the front-matter says otherwise
    #[serde(default = "default_published")]
    pub published: bool,

    /// Keys this crate does not interpret, kept so rewrites do not drop them
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

fn default_published() -> bool {
    true
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: String::new(),
            excerpt: String::new(),
            date: None,
            author: String::new(),
            category: String::new(),
            tags: Vec::new(),
            cover_image: None,
            published: true,
            extra: IndexMap::new(),
        }
    }
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start();

        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }

        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let rest = &content[3..];
        let rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);

        // Closing fence directly after the opening one: an empty block
        let (yaml_content, remaining) = if let Some(after) = rest.strip_prefix("---") {
            ("", after)
        } else {
            let Some(end_pos) = rest.find("\n---") else {
                // No closing fence: a leading thematic break, not metadata
                return Ok((FrontMatter::default(), content));
            };
            (&rest[..end_pos], &rest[end_pos + 4..])
        };
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        // `---` is also a markdown thematic break; only treat the block as
        // metadata when at least one line looks like `key: value`.
        if !yaml_content.lines().any(looks_like_yaml_key) {
            return Ok((FrontMatter::default(), content));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)?;
        Ok((fm, remaining))
    }

    fn parse_json(content: &str) -> Result<(Self, &str), FrontMatterError> {
        // `;;;`-fenced JSON block
        if let Some(rest) = content.strip_prefix(";;;") {
            let end_pos = rest.find(";;;").ok_or(FrontMatterError::UnterminatedJson)?;
            let json_content = rest[..end_pos].trim();
            let json_content = if json_content.starts_with('{') {
                json_content.to_string()
            } else {
                format!("{{{}}}", json_content)
            };
            let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);
            let fm: FrontMatter = serde_json::from_str(&json_content)?;
            return Ok((fm, remaining));
        }

        // Bare JSON object at the start of the file
        let mut depth = 0;
        let mut in_string = false;
        let mut escaped = false;
        for (i, c) in content.char_indices() {
            if in_string {
                match c {
                    '\\' if !escaped => escaped = true,
                    '"' if !escaped => in_string = false,
                    _ => escaped = false,
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let json_content = &content[..=i];
                        let remaining = content[i + 1..].trim_start_matches(['\n', '\r']);
                        let fm: FrontMatter = serde_json::from_str(json_content)?;
                        return Ok((fm, remaining));
                    }
                }
                _ => {}
            }
        }

        Err(FrontMatterError::UnterminatedJson)
    }

    /// Render this front-matter and a body back into a post file
    pub fn to_document(&self, body: &str) -> Result<String, FrontMatterError> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("---\n{}---\n\n{}", yaml, body))
    }
}

/// Whether a line reads as a simple `key: value` YAML mapping entry
fn looks_like_yaml_key(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }
    let Some(colon_pos) = trimmed.find(':') else {
        return false;
    };
    let key = &trimmed[..colon_pos];
    let is_valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(key, "http" | "https" | "ftp");
    let after_colon = &trimmed[colon_pos + 1..];
    is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
}

/// Parse a date string in the accepted formats.
///
/// Dates without an offset are read as wall-clock time; RFC 3339 dates are
/// converted to UTC. No host time zone is involved.
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
excerpt: A first post
date: 2024-01-15
author: lakeminder
category: 技术
tags:
  - rust
  - blog
coverImage: /images/hello.png
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, "Hello World");
        assert_eq!(fm.excerpt, "A first post");
        assert_eq!(fm.date.as_deref(), Some("2024-01-15"));
        assert_eq!(fm.category, "技术");
        assert_eq!(fm.tags, vec!["rust", "blog"]);
        assert_eq!(fm.cover_image.as_deref(), Some("/images/hello.png"));
        assert!(fm.published);
        assert!(remaining.starts_with("This is the content."));
    }

    #[test]
    fn test_published_false() {
        let content = "---\ntitle: Draft\npublished: false\n---\nbody\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert!(!fm.published);
        assert!(fm.tags.is_empty());
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#"{"title": "Test {Post}", "tags": ["a", "b"], "published": false}

This is content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, "Test {Post}");
        assert_eq!(fm.tags, vec!["a", "b"]);
        assert!(!fm.published);
        assert!(remaining.contains("This is content."));
    }

    #[test]
    fn test_parse_fenced_json_frontmatter() {
        let content = ";;;\n\"title\": \"Fenced\",\n\"category\": \"生活\"\n;;;\nBody\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, "Fenced");
        assert_eq!(fm.category, "生活");
        assert_eq!(remaining, "Body\n");
    }

    #[test]
    fn test_parse_single_string_tags() {
        let content = "---\ntitle: Single Tag Post\ntags: Notes\n---\n\nContent here.\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let content = "---\ntitle: [unclosed\ntags: x\n---\nbody\n";
        assert!(matches!(
            FrontMatter::parse(content),
            Err(FrontMatterError::Yaml(_))
        ));
    }

    #[test]
    fn test_unterminated_json_is_error() {
        assert!(FrontMatter::parse("{\"title\": \"x\"\nbody").is_err());
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        let content = r#"
---

Some random text with markdown lists:
- Item 1
- Item 2

---
More content here.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, "");
        assert!(remaining.contains("Some random text"));
    }

    #[test]
    fn test_content_with_url_not_yaml() {
        let content = "---\n\nCheck out https://example.com/path\n\n---\nMore content.\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, "");
        assert!(remaining.contains("https://example.com"));
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, remaining) = FrontMatter::parse("# Just markdown\n").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(remaining, "# Just markdown\n");
    }

    #[test]
    fn test_parse_date_formats() {
        for s in ["2024-01-15", "2024/01/15", "2024-01-15 10:30:00", "2024-01-15T10:30:00"] {
            let dt = parse_date_string(s).unwrap();
            assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-01-15", "{}", s);
        }
        assert_eq!(
            parse_date_string("2024-01-15T10:30:00+08:00").unwrap(),
            parse_date_string("2024-01-15 02:30:00").unwrap()
        );
        assert!(parse_date_string("yesterday").is_none());
    }

    #[test]
    fn test_parse_date_ignores_host_time_zone() {
        // Falls in a DST gap in several zones; must still parse
        for s in ["2024-03-10 02:30:00", "2024-03-31 02:30:00"] {
            assert!(parse_date_string(s).is_some(), "{}", s);
        }
    }

    #[test]
    fn test_unknown_keys_survive_rewrite() {
        let content = "---\ntitle: Series\nseries: rust-101\nweight: 3\n---\nbody\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.extra.len(), 2);
        assert_eq!(fm.extra["series"], serde_yaml::Value::from("rust-101"));

        let doc = fm.to_document(body).unwrap();
        assert!(doc.contains("series: rust-101"));
        let (reparsed, _) = FrontMatter::parse(&doc).unwrap();
        assert_eq!(reparsed, fm);
    }

    #[test]
    fn test_parse_empty_yaml_block() {
        let (fm, body) = FrontMatter::parse("---\n---\nHello body\n").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "Hello body\n");

        let (_, body) = FrontMatter::parse("---\r\n---\r\nHello body\n").unwrap();
        assert_eq!(body, "Hello body\n");
    }

    #[test]
    fn test_to_document_reparses() {
        let fm = FrontMatter {
            title: "Round".to_string(),
            date: Some("2024-02-01".to_string()),
            category: "技术".to_string(),
            tags: vec!["rust".to_string()],
            ..Default::default()
        };
        let doc = fm.to_document("Body text").unwrap();
        assert!(doc.starts_with("---\n"));
        assert!(!doc.contains("coverImage"));
        let (parsed, body) = FrontMatter::parse(&doc).unwrap();
        assert_eq!(parsed, fm);
        assert_eq!(body.trim(), "Body text");
    }
}
