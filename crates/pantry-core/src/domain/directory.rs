//! User directory types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Display name reported for identities that never set one.
pub const NO_DISPLAY_NAME: &str = "NO_DISPLAY_NAME";

/// A registered identity as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub display_name: Option<String>,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, display_name: Option<&str>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.map(str::to_string),
        }
    }

    /// Display name, or `fallback` when the identity has none (or an empty one).
    pub fn display_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => fallback,
        }
    }
}

/// A content item (post) from the content store, reduced to what the
/// directory needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: String,
    /// Author user ID. Items without an author field are never counted.
    pub author_id: Option<String>,
}

impl ContentItem {
    pub fn new(id: impl Into<String>, author_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            author_id: author_id.map(str::to_string),
        }
    }
}

/// Per-user summary returned by `fetch_all_users`.
///
/// Field names on the wire match what the mobile client decodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "username")]
    pub display_name: String,
    #[serde(rename = "postsCreated")]
    pub post_count: u64,
    #[serde(rename = "userHasPremium")]
    pub has_premium: bool,
}

/// Count content items per author in a single pass.
///
/// The result answers "how many items have `author == id`" for every author
/// that appears at least once; callers treat a missing key as zero.
pub fn count_by_author(items: &[ContentItem]) -> HashMap<&str, u64> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for author in items.iter().filter_map(|item| item.author_id.as_deref()) {
        *counts.entry(author).or_default() += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_by_author_matches_naive_filter() {
        let items = vec![
            ContentItem::new("p1", Some("alice")),
            ContentItem::new("p2", Some("bob")),
            ContentItem::new("p3", Some("alice")),
            ContentItem::new("p4", None),
            ContentItem::new("p5", Some("alice")),
        ];
        let counts = count_by_author(&items);

        for author in ["alice", "bob", "carol"] {
            let naive = items
                .iter()
                .filter(|i| i.author_id.as_deref() == Some(author))
                .count() as u64;
            assert_eq!(counts.get(author).copied().unwrap_or(0), naive);
        }
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(Identity::new("u1", Some("Ann")).display_name_or("u1"), "Ann");
        assert_eq!(Identity::new("u1", None).display_name_or("u1"), "u1");
        assert_eq!(Identity::new("u1", Some("")).display_name_or("u1"), "u1");
    }

    #[test]
    fn test_directory_entry_wire_names() {
        let entry = DirectoryEntry {
            user_id: "u1".to_string(),
            display_name: "Ann".to_string(),
            post_count: 3,
            has_premium: true,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["userID"], "u1");
        assert_eq!(json["username"], "Ann");
        assert_eq!(json["postsCreated"], 3);
        assert_eq!(json["userHasPremium"], true);
    }
}
