use serde::{Deserialize, Serialize};

/// Server-assigned idea identifier
pub type IdeaId = u64;

/// A persisted idea as the server returns it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: IdeaId,
    pub title: String,
    pub content: String,
    /// Long-form AI text, present once an expansion has been stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_content: Option<String>,
}

/// Body of create and update requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaFields {
    pub title: String,
    pub content: String,
}

/// Reply of the expand and chat endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expansion {
    pub id: IdeaId,
    pub expanded: String,
}

/// Body of a chat request. Only the latest user message is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn idea_reads_camel_case_expanded_content() {
        let idea: Idea = serde_json::from_str(
            r#"{"id":7,"title":"Kite","content":"Solar kite","expandedContent":"Longer text"}"#,
        )
        .unwrap();
        assert_eq!(
            idea,
            Idea {
                id: 7,
                title: "Kite".into(),
                content: "Solar kite".into(),
                expanded_content: Some("Longer text".into()),
            }
        );
    }

    #[test]
    fn idea_without_expansion_omits_field() {
        let idea: Idea = serde_json::from_str(r#"{"id":1,"title":"a","content":"b"}"#).unwrap();
        assert!(idea.expanded_content.is_none());
        let json = serde_json::to_string(&idea).unwrap();
        assert!(!json.contains("expandedContent"));
    }

    #[test]
    fn null_expanded_content_is_absent() {
        let idea: Idea =
            serde_json::from_str(r#"{"id":1,"title":"a","content":"b","expandedContent":null}"#)
                .unwrap();
        assert!(idea.expanded_content.is_none());
    }
}
