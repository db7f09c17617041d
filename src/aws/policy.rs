use anyhow::{Context, Result};
use serde::Serialize;

const POLICY_VERSION: &str = "2012-10-17";

/// Service principal allowed to assume the execution role
const EXECUTION_PRINCIPAL: &str = "lambda.amazonaws.com";

/// IAM policy document, serialized with the wire field names
#[derive(Debug, Clone, Serialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: &'static str,
    #[serde(rename = "Statement")]
    pub statement: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    #[serde(rename = "Sid", skip_serializing_if = "Option::is_none")]
    pub sid: Option<&'static str>,
    #[serde(rename = "Effect")]
    pub effect: &'static str,
    #[serde(rename = "Principal", skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    #[serde(rename = "Action")]
    pub action: Vec<String>,
    #[serde(rename = "Resource", skip_serializing_if = "Option::is_none")]
    pub resource: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    #[serde(rename = "Service")]
    pub service: &'static str,
}

impl PolicyDocument {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize policy document")
    }
}

fn allow(sid: &'static str, action: Vec<String>) -> Statement {
    Statement {
        sid: Some(sid),
        effect: "Allow",
        principal: None,
        action,
        resource: Some(vec!["*".to_string()]),
    }
}

/// Trust policy allowing the Synthetics Lambda runtime to assume the role
pub fn trust_policy() -> PolicyDocument {
    PolicyDocument {
        version: POLICY_VERSION,
        statement: vec![Statement {
            sid: None,
            effect: "Allow",
            principal: Some(Principal {
                service: EXECUTION_PRINCIPAL,
            }),
            action: vec!["sts:AssumeRole".to_string()],
            resource: None,
        }],
    }
}

/// Baseline execution permissions plus the playbook's custom actions.
/// Built fresh on every call so one deployment's actions never leak into another.
pub fn execution_policy(custom_actions: &[String]) -> PolicyDocument {
    PolicyDocument {
        version: POLICY_VERSION,
        statement: vec![
            allow(
                "S3ReadOnly",
                vec!["s3:Get*".to_string(), "s3:List*".to_string()],
            ),
            allow(
                "CloudWatchPutMetrics",
                vec!["cloudwatch:PutMetricData".to_string()],
            ),
            allow(
                "LogsWrite",
                vec![
                    "logs:CreateLogGroup".to_string(),
                    "logs:CreateLogStream".to_string(),
                    "logs:PutLogEvents".to_string(),
                ],
            ),
            allow("CustomAdd", custom_actions.to_vec()),
        ],
    }
}
