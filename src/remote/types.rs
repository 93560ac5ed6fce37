//! Remote Response Shapes
//!
//! Just enough structure to pull ids, titles, and page totals out of the
//! service's JSON envelopes; everything else rides along as raw values.

use serde::Deserialize;

/// One entry of the exercise catalog listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
}

/// One page of the exercise catalog search.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    pub data: Vec<ExerciseSummary>,
    pub total: u64,
}

/// One entry of the tag catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct TagEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// One page of the tag catalog listing.
#[derive(Debug, Deserialize)]
pub struct TagPage {
    pub data: Vec<TagEntry>,
    pub total: u64,
}

/// The tag listing wraps its page in a `data` envelope.
#[derive(Debug, Deserialize)]
pub struct TagPageEnvelope {
    pub data: TagPage,
}

/// Tag creation returns the new tag under a `data` envelope.
#[derive(Debug, Deserialize)]
pub struct CreatedTag {
    #[serde(rename = "_id")]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatedTagEnvelope {
    pub data: CreatedTag,
}

/// Exercise detail responses wrap the full record in a `data` envelope.
#[derive(Debug, Deserialize)]
pub struct DetailEnvelope {
    pub data: serde_json::Value,
}

/// Login response; a missing or empty token is an authentication failure.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_page_deserializes_platform_ids() {
        let json = r#"{"data": [{"_id": "abc", "title": "Push Up", "extra": 1}], "total": 412}"#;
        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 412);
        assert_eq!(page.data[0].id, "abc");
        assert_eq!(page.data[0].title, "Push Up");
    }

    #[test]
    fn test_tag_envelope_two_levels_deep() {
        let json = r#"{"data": {"data": [{"_id": "t1", "name": "Core"}], "total": 1}}"#;
        let envelope: TagPageEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.total, 1);
        assert_eq!(envelope.data.data[0].name, "Core");
    }

    #[test]
    fn test_login_token_optional() {
        let with: LoginResponse = serde_json::from_str(r#"{"token": "tok"}"#).unwrap();
        assert_eq!(with.token.as_deref(), Some("tok"));

        let without: LoginResponse = serde_json::from_str(r#"{"user": "x"}"#).unwrap();
        assert!(without.token.is_none());
    }
}
