//! DynamoStore -- concrete [`InteractionStore`] implementation for the
//! DynamoDB data-plane API.
//!
//! Every operation is one SigV4-signed POST to the regional endpoint with
//! the action named in `X-Amz-Target`. There is no retry or backoff;
//! callers decide what a failure means (the chat engine downgrades a
//! failed `put` to a warning, the provisioning command aborts).

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use haven_core::audit::store::InteractionStore;
use haven_types::error::StoreError;
use haven_types::record::{InteractionRecord, TableStatus};

use crate::aws::sigv4::{sign_headers, SigningParams};
use crate::aws::AwsCredentials;

use super::types::{
    item_to_record, record_to_item, AttributeDefinition, AttributeValue, CreateTableInput,
    CreateTableOutput, DescribeTableInput, DescribeTableOutput, KeySchemaElement, PutItemInput,
    PutItemOutput, QueryInput, QueryOutput, ScanInput, ScanOutput, ServiceErrorBody,
};

/// DynamoDB-backed interaction log.
pub struct DynamoStore {
    client: reqwest::Client,
    credentials: AwsCredentials,
    region: String,
    table_name: String,
}

// DynamoStore intentionally does NOT derive Debug to prevent accidental
// exposure of internal state.

impl DynamoStore {
    /// SigV4 service name.
    const SERVICE: &'static str = "dynamodb";

    /// Target prefix for the data-plane API version.
    const TARGET_PREFIX: &'static str = "DynamoDB_20120810";

    pub fn new(credentials: AwsCredentials, region: String, table_name: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            credentials,
            region,
            table_name,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn host(&self) -> String {
        format!("dynamodb.{}.amazonaws.com", self.region)
    }

    /// Issue one signed data-plane call.
    async fn call<I: Serialize, O: DeserializeOwned>(
        &self,
        action: &str,
        input: &I,
    ) -> Result<O, StoreError> {
        let body = serde_json::to_vec(input)
            .map_err(|e| StoreError::Transport(format!("failed to encode request: {e}")))?;

        let host = self.host();
        let target = format!("{}.{action}", Self::TARGET_PREFIX);
        let extra_headers = [
            ("content-type", "application/x-amz-json-1.0"),
            ("x-amz-target", target.as_str()),
        ];
        let params = SigningParams {
            credentials: &self.credentials,
            region: &self.region,
            service: Self::SERVICE,
            now: Utc::now(),
        };
        let signed = sign_headers(&params, "POST", &host, "/", &extra_headers, &body);

        let mut request = self.client.post(format!("https://{host}/"));
        for (name, value) in extra_headers {
            request = request.header(name, value);
        }
        for (name, value) in &signed {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            tracing::debug!(status = %status, action = %action, body = %text, "DynamoDB error response");
            return Err(parse_service_error(status.as_u16(), &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| StoreError::Deserialization(format!("failed to parse response: {e}")))
    }
}

/// Extract the AWS exception name from an error body; the name after `#`
/// is the part callers can match on (e.g. `ResourceInUseException`).
fn parse_service_error(status: u16, body: &str) -> StoreError {
    match serde_json::from_str::<ServiceErrorBody>(body) {
        Ok(parsed) => {
            let exception = parsed
                .error_type
                .as_deref()
                .map(|t| t.rsplit('#').next().unwrap_or(t).to_string())
                .unwrap_or_else(|| format!("HTTP{status}"));
            StoreError::Service {
                exception,
                message: parsed.message.unwrap_or_default(),
            }
        }
        Err(_) => StoreError::Service {
            exception: format!("HTTP{status}"),
            message: body.to_string(),
        },
    }
}

impl InteractionStore for DynamoStore {
    async fn put(&self, record: &InteractionRecord) -> Result<(), StoreError> {
        let input = PutItemInput {
            table_name: &self.table_name,
            item: record_to_item(record),
        };
        let _: PutItemOutput = self.call("PutItem", &input).await?;
        Ok(())
    }

    async fn recent_for_session(
        &self,
        session_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<InteractionRecord>, StoreError> {
        let mut values = HashMap::new();
        values.insert(
            ":sid".to_string(),
            AttributeValue::S(session_id.to_string()),
        );

        let input = QueryInput {
            table_name: &self.table_name,
            key_condition_expression: "session_id = :sid",
            expression_attribute_values: values,
            scan_index_forward: false,
            limit,
        };
        let output: QueryOutput = self.call("Query", &input).await?;

        output.items.iter().map(item_to_record).collect()
    }

    async fn scan(&self, limit: Option<u32>) -> Result<Vec<InteractionRecord>, StoreError> {
        let mut records = Vec::new();
        let mut start_key = None;

        loop {
            let input = ScanInput {
                table_name: &self.table_name,
                limit,
                exclusive_start_key: start_key,
            };
            let output: ScanOutput = self.call("Scan", &input).await?;

            for item in &output.items {
                records.push(item_to_record(item)?);
            }

            // A bounded scan reads one page; a full scan follows the
            // pagination key until the table is exhausted.
            if limit.is_some() {
                break;
            }
            match output.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }

        Ok(records)
    }

    async fn create_log_table(&self) -> Result<(), StoreError> {
        let input = CreateTableInput {
            table_name: &self.table_name,
            key_schema: vec![
                KeySchemaElement {
                    attribute_name: "session_id",
                    key_type: "HASH",
                },
                KeySchemaElement {
                    attribute_name: "timestamp",
                    key_type: "RANGE",
                },
            ],
            attribute_definitions: vec![
                AttributeDefinition {
                    attribute_name: "session_id",
                    attribute_type: "S",
                },
                AttributeDefinition {
                    attribute_name: "timestamp",
                    attribute_type: "S",
                },
            ],
            billing_mode: "PAY_PER_REQUEST",
        };
        let _: CreateTableOutput = self.call("CreateTable", &input).await?;
        Ok(())
    }

    async fn table_status(&self) -> Result<TableStatus, StoreError> {
        let input = DescribeTableInput {
            table_name: &self.table_name,
        };
        let output: DescribeTableOutput = self.call("DescribeTable", &input).await?;
        Ok(TableStatus::parse(&output.table.table_status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn make_store() -> DynamoStore {
        DynamoStore::new(
            AwsCredentials::new("AKIDEXAMPLE", SecretString::from("not-a-real-secret")),
            "us-east-1".to_string(),
            "haven-support-logs".to_string(),
        )
    }

    #[test]
    fn test_host_includes_region() {
        let store = DynamoStore::new(
            AwsCredentials::new("AKIDEXAMPLE", SecretString::from("not-a-real-secret")),
            "ap-southeast-2".to_string(),
            "haven-support-logs".to_string(),
        );
        assert_eq!(store.host(), "dynamodb.ap-southeast-2.amazonaws.com");
    }

    #[test]
    fn test_table_name_accessor() {
        assert_eq!(make_store().table_name(), "haven-support-logs");
    }

    #[test]
    fn test_parse_service_error_extracts_exception_name() {
        let err = parse_service_error(
            400,
            r#"{"__type":"com.amazonaws.dynamodb.v20120810#ResourceInUseException","message":"Table already exists"}"#,
        );
        match err {
            StoreError::Service { exception, message } => {
                assert_eq!(exception, "ResourceInUseException");
                assert_eq!(message, "Table already exists");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_service_error_unparseable_body() {
        let err = parse_service_error(503, "<html>Service Unavailable</html>");
        match err {
            StoreError::Service { exception, message } => {
                assert_eq!(exception, "HTTP503");
                assert!(message.contains("Unavailable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
