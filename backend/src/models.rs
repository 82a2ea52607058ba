use serde::{Deserialize, Serialize};

/// Form submitted by the index page.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalyzeForm {
    pub text: String,
}

/// One PII span reported by the analysis service.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PiiFinding {
    pub text: String,
    pub label: String,
}

/// Body returned by the analysis service.
#[derive(Debug, Deserialize, Default)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub analysis: Vec<AnalysisEntry>,
}

// `result` is only interpreted for PII entries, other analysis types
// (prompt injection, etc.) carry their own shapes.
#[derive(Debug, Deserialize)]
pub struct AnalysisEntry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AnalysisReport {
    pub text: String,
    pub findings: Vec<PiiFinding>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: &str) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_tolerates_missing_lists() {
        let resp: AnalysisResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.analysis.is_empty());

        let resp: AnalysisResponse = serde_json::from_str(r#"{"analysis":[{"type":"PII"}]}"#).unwrap();
        assert_eq!(resp.analysis[0].kind, "PII");
        assert!(resp.analysis[0].result.is_null());
    }

    #[test]
    fn finding_ignores_extra_fields() {
        let finding: PiiFinding =
            serde_json::from_str(r#"{"text":"Jane","label":"PERSON","score":0.98,"start":0}"#).unwrap();
        assert_eq!(
            finding,
            PiiFinding {
                text: "Jane".into(),
                label: "PERSON".into()
            }
        );
    }

    #[test]
    fn api_response_envelope() {
        let ok = serde_json::to_value(ApiResponse::success("ok")).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["data"], "ok");
        assert!(ok["error"].is_null());

        let err = serde_json::to_value(ApiResponse::<String>::error("nope")).unwrap();
        assert_eq!(err["success"], false);
        assert_eq!(err["error"], "nope");
    }
}
