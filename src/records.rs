//! Records returned by the tokenizer-analysis service.
//!
//! Only the fields the views render are modelled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// One token of a tokenized text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub id: u32,
    pub token_str: String,
    pub token_bytes_hex: String,
    pub byte_length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u32>,
}

impl TokenInfo {
    /// Token text with spaces shown as `·` and newlines as `↵`.
    pub fn display_str(&self) -> String {
        self.token_str.replace(' ', "\u{00B7}").replace('\n', "\u{21B5}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizeResponse {
    pub tokens: Vec<TokenInfo>,
    pub token_count: u32,
    pub char_count: u32,
}

impl TokenizeResponse {
    pub fn tokens_per_char(&self) -> f64 {
        f64::from(self.token_count) / f64::from(self.char_count.max(1))
    }
}

/// Letter casing of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Casing {
    Lower,
    Upper,
    Title,
    Mixed,
    #[serde(other)]
    Other,
}

impl Casing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Casing::Lower => "lower",
            Casing::Upper => "upper",
            Casing::Title => "title",
            Casing::Mixed => "mixed",
            Casing::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantInfo {
    pub token_id: u32,
    pub token_str: String,
    pub has_space_prefix: bool,
    pub casing: Casing,
    pub has_punctuation: bool,
}

/// Tokens sharing a base form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplicityGroup {
    pub base_form: String,
    pub variants: Vec<VariantInfo>,
    pub count: u32,
}

/// One page of multiplicity groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplicityResponse {
    pub groups: Vec<MultiplicityGroup>,
    pub total_groups: u32,
    pub page: u32,
    pub page_size: u32,
}

/// Either a full page of groups or a single group.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum GroupsDocument {
    Page(MultiplicityResponse),
    Single(MultiplicityGroup),
}

/// Parses multiplicity groups from a page response or a bare group.
pub fn parse_groups(json: &str) -> Result<Vec<MultiplicityGroup>, serde_json::Error> {
    Ok(match serde_json::from_str(json)? {
        GroupsDocument::Page(page) => page.groups,
        GroupsDocument::Single(group) => vec![group],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_str_marks_whitespace() {
        let token = TokenInfo {
            id: 1,
            token_str: " hi\n".to_string(),
            token_bytes_hex: "206869 0a".to_string(),
            byte_length: 4,
            start: None,
            end: None,
        };
        assert_eq!(token.display_str(), "·hi↵");
    }

    #[test]
    fn tokenize_response_parses_optional_offsets() {
        let json = r#"{
            "tokens": [
                {"id": 15496, "token_str": "Hello", "token_bytes_hex": "48656c6c6f", "byte_length": 5, "start": 0, "end": 5},
                {"id": 995, "token_str": " world", "token_bytes_hex": "20776f726c64", "byte_length": 6}
            ],
            "token_count": 2,
            "char_count": 11
        }"#;
        let response: TokenizeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.tokens.len(), 2);
        assert_eq!(response.tokens[0].end, Some(5));
        assert_eq!(response.tokens[1].start, None);
        assert!((response.tokens_per_char() - 2.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn parse_groups_accepts_page_or_single_group() {
        let group = r#"{
            "base_form": "the",
            "count": 2,
            "variants": [
                {"token_id": 1169, "token_str": "the", "has_space_prefix": false, "casing": "lower", "has_punctuation": false},
                {"token_id": 383, "token_str": " The", "has_space_prefix": true, "casing": "title", "has_punctuation": false}
            ]
        }"#;
        let single = parse_groups(group).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].variants[1].casing, Casing::Title);

        let page = format!(
            r#"{{"groups": [{group}, {group}], "total_groups": 40, "page": 1, "page_size": 20}}"#
        );
        assert_eq!(parse_groups(&page).unwrap().len(), 2);
    }

    #[test]
    fn unknown_casing_is_other() {
        let casing: Casing = serde_json::from_str(r#""camel""#).unwrap();
        assert_eq!(casing, Casing::Other);
    }
}
