use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateParameter {
    pub name: String,
    pub value: String,
}

/// One outbound templated message, in the wire shape the messaging API
/// expects. Built once per campaign record and owned by its dispatch task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub number: String,
    pub template_name: String,
    pub language: String,
    pub parameters: Vec<TemplateParameter>,
}

impl MessageRequest {
    /// Builds a request carrying the single `message` template parameter.
    pub fn templated(
        number: impl Into<String>,
        template_name: impl Into<String>,
        language: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            template_name: template_name.into(),
            language: language.into(),
            parameters: vec![TemplateParameter {
                name: "message".to_string(),
                value: message.into(),
            }],
        }
    }
}
