//! Tag module.
//!
//! Weapon tags, unit flags and ability references all share one structured
//! representation: a case-insensitive [`TagName`] plus an optional integer
//! parameter. Raw strings such as `"deadly(3)"` are turned into a [`Tag`]
//! once, when data enters the crate; the engine never parses strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::str::FromStr;
use std::sync::Arc;

/// Interned, case-insensitive tag name.
///
/// Names are trimmed and lowercased on construction, so `"oneUse"` and
/// `"oneuse"` compare equal.
///
/// # Examples
///
/// ```rust
/// use pointcost::TagName;
///
/// let a = TagName::new("noRegen");
/// let b: TagName = "NOREGEN".into();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "noregen");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TagName(Arc<str>);

impl TagName {
    /// Create a new `TagName`, normalizing case and surrounding whitespace.
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s.trim().to_lowercase()))
    }

    /// Get the normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this name matches `other` ignoring case.
    pub fn is(&self, other: &str) -> bool {
        self.as_str() == TagName::new(other).as_str()
    }
}

impl From<&str> for TagName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TagName {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl FromStr for TagName {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl std::fmt::Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TagName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TagName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(TagName::from(s))
    }
}

/// A named rule with an optional integer parameter, e.g. `deadly(3)`.
///
/// # Examples
///
/// ```rust
/// use pointcost::Tag;
///
/// let tag = Tag::parse("Deadly(3)");
/// assert_eq!(tag.name.as_str(), "deadly");
/// assert_eq!(tag.param, Some(3));
/// assert_eq!(tag.to_string(), "deadly(3)");
///
/// // A parameter that is not an integer is dropped, never an error
/// let odd = Tag::parse("blast(x)");
/// assert_eq!(odd.name.as_str(), "blast");
/// assert_eq!(odd.param, None);
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tag {
    /// Normalized tag name.
    pub name: TagName,
    /// Optional rating, e.g. the `3` in `deadly(3)`.
    pub param: Option<i64>,
}

impl Tag {
    /// Create a tag without a parameter.
    pub fn new(name: impl Into<TagName>) -> Self {
        Self {
            name: name.into(),
            param: None,
        }
    }

    /// Create a tag with a parameter.
    pub fn rated(name: impl Into<TagName>, param: i64) -> Self {
        Self {
            name: name.into(),
            param: Some(param),
        }
    }

    /// Parse the `name` or `name(value)` form.
    ///
    /// Parsing is total: anything that does not look like a parametrized
    /// tag becomes a plain tag, and a non-integer parameter is discarded.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(inner) = raw.strip_suffix(')') {
            if let Some((name, param)) = inner.split_once('(') {
                return Self {
                    name: TagName::new(name),
                    param: param.trim().parse().ok(),
                };
            }
        }
        Self::new(raw)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.param {
            Some(param) => write!(f, "{}({})", self.name, param),
            None => write!(f, "{}", self.name),
        }
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Tag::parse(&s))
    }
}

/// An ordered collection of tags attached to a unit or weapon.
///
/// # Examples
///
/// ```rust
/// use pointcost::TagList;
///
/// let tags = TagList::parse_all(["Blast(3)", "indirect"]);
/// assert!(tags.contains("blast"));
/// assert_eq!(tags.param("blast"), Some(3));
/// assert!(!tags.contains("deadly"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagList(Vec<Tag>);

impl TagList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every raw string into a tag.
    pub fn parse_all<'a>(raw: impl IntoIterator<Item = &'a str>) -> Self {
        Self(raw.into_iter().map(Tag::parse).collect())
    }

    /// Append a tag.
    pub fn push(&mut self, tag: Tag) {
        self.0.push(tag);
    }

    /// First tag with the given name, if any.
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.0.iter().find(|tag| tag.name.is(name))
    }

    /// Check whether a tag with the given name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Parameter of the first tag with the given name.
    pub fn param(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|tag| tag.param)
    }

    /// Iterate over the tags in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Tag>> for TagList {
    fn from(tags: Vec<Tag>) -> Self {
        Self(tags)
    }
}

impl FromIterator<Tag> for TagList {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_name_case_insensitive() {
        assert_eq!(TagName::new("OneUse"), TagName::new("oneuse"));
        assert_eq!(TagName::new("  fast "), TagName::new("fast"));
        assert!(TagName::new("precise").is("PRECISE"));
    }

    #[test]
    fn test_tag_name_non_ascii_match() {
        let name = TagName::new("Übermacht");
        assert!(name.is("ÜBERMACHT"));
        assert!(TagList::parse_all(["ÜBERMACHT"]).contains("übermacht"));
    }

    #[test]
    fn test_tag_parse_plain() {
        let tag = Tag::parse("reliable");
        assert_eq!(tag.name.as_str(), "reliable");
        assert_eq!(tag.param, None);
    }

    #[test]
    fn test_tag_parse_rated() {
        let tag = Tag::parse(" blast( 6 ) ");
        assert_eq!(tag.name.as_str(), "blast");
        assert_eq!(tag.param, Some(6));
    }

    #[test]
    fn test_tag_parse_negative_param() {
        assert_eq!(Tag::parse("slowed(-1)").param, Some(-1));
    }

    #[test]
    fn test_tag_parse_unbalanced() {
        let tag = Tag::parse("deadly(3");
        assert_eq!(tag.name.as_str(), "deadly(3");
        assert_eq!(tag.param, None);
    }

    #[test]
    fn test_tag_serde_uses_string_form() {
        let tags = TagList::from(vec![Tag::rated("deadly", 3), Tag::new("precise")]);
        let json = serde_json::to_string(&tags).unwrap();
        assert_eq!(json, r#"["deadly(3)","precise"]"#);

        let back: TagList = serde_json::from_str(r#"["Deadly(3)","PRECISE"]"#).unwrap();
        assert_eq!(back, tags);
    }

    #[test]
    fn test_tag_list_lookup() {
        let tags = TagList::parse_all(["tough(3)", "Regeneration"]);
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("regeneration"));
        assert_eq!(tags.param("tough"), Some(3));
        assert_eq!(tags.param("regeneration"), None);
        assert_eq!(tags.param("missing"), None);
    }
}
