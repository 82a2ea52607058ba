use log::debug;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

use crate::config::AnalysisConfig;
use crate::models::{AnalysisReport, AnalysisResponse, PiiFinding};

pub const PII_TYPE: &str = "PII";
pub const SCAN_TYPE_INPUT: &str = "input";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("request to analysis service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("analysis service answered with status {0}")]
    Status(u16),
    #[error("undecodable analysis response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Thin client for the SonnyLabs analysis API.
pub struct AnalysisClient {
    http: reqwest::Client,
    config: AnalysisConfig,
}

impl AnalysisClient {
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1/analysis/{}",
            self.config.base_url, self.config.analysis_id
        )
    }

    fn next_tag(&self) -> String {
        format!(
            "{}_{}",
            self.config.tag_prefix,
            chrono::Utc::now().timestamp_millis()
        )
    }

    /// Sends `text` for an input scan and returns the raw service response.
    pub async fn analyze_text(&self, text: &str) -> Result<AnalysisResponse, AnalysisError> {
        let tag = self.next_tag();
        debug!("Analysis request tag={} chars={}", tag, text.chars().count());

        let resp = self
            .http
            .post(self.endpoint())
            .query(&[("tag", tag.as_str()), ("scan_type", SCAN_TYPE_INPUT)])
            .bearer_auth(&self.config.api_token)
            .header(CONTENT_TYPE, "text/plain")
            .body(text.to_string())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AnalysisError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn detect_pii(&self, text: &str) -> Result<AnalysisReport, AnalysisError> {
        let response = self.analyze_text(text).await?;
        Ok(AnalysisReport {
            text: text.to_string(),
            findings: extract_pii(response)?,
        })
    }
}

/// Collects the findings of every PII entry, in service order.
pub fn extract_pii(response: AnalysisResponse) -> Result<Vec<PiiFinding>, AnalysisError> {
    let mut findings = Vec::new();
    for entry in response.analysis {
        if entry.kind != PII_TYPE || entry.result.is_null() {
            continue;
        }
        let batch: Vec<PiiFinding> = serde_json::from_value(entry.result)?;
        findings.extend(batch);
    }
    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> AnalysisResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn keeps_only_pii_entries() {
        let resp = response(json!({
            "analysis": [
                {"type": "score", "name": "prompt_injection", "result": 0.02},
                {"type": "PII", "result": [
                    {"text": "Jane Doe", "label": "PERSON"},
                    {"text": "jane@example.com", "label": "EMAIL"}
                ]},
                {"type": "PII", "result": [{"text": "555-0100", "label": "PHONE"}]}
            ]
        }));

        let findings = extract_pii(resp).unwrap();
        let labels: Vec<&str> = findings.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["PERSON", "EMAIL", "PHONE"]);
        assert_eq!(findings[0].text, "Jane Doe");
    }

    #[test]
    fn type_match_is_exact() {
        let resp = response(json!({
            "analysis": [{"type": "pii", "result": [{"text": "x", "label": "y"}]}]
        }));
        assert!(extract_pii(resp).unwrap().is_empty());
    }

    #[test]
    fn empty_and_missing_results() {
        assert!(extract_pii(response(json!({}))).unwrap().is_empty());
        assert!(extract_pii(response(json!({"analysis": [{"type": "PII"}]})))
            .unwrap()
            .is_empty());
        assert!(extract_pii(response(json!({"analysis": [{"type": "PII", "result": []}]})))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn malformed_pii_result_is_decode_error() {
        let resp = response(json!({"analysis": [{"type": "PII", "result": "oops"}]}));
        assert!(matches!(extract_pii(resp), Err(AnalysisError::Decode(_))));
    }
}
