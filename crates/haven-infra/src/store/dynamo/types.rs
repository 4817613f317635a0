//! DynamoDB JSON 1.0 wire types and item conversions.
//!
//! The data-plane API takes PascalCase-keyed JSON bodies dispatched by an
//! `X-Amz-Target` header. Attribute values are externally tagged by type
//! (`{"S": "..."}`), which maps directly onto a serde enum. Only the
//! variants an interaction record needs are modeled.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use haven_types::error::StoreError;
use haven_types::record::InteractionRecord;

/// A typed DynamoDB attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    S(String),
    N(String),
    #[serde(rename = "BOOL")]
    Bool(bool),
}

/// One stored item: attribute name -> typed value.
pub type Item = HashMap<String, AttributeValue>;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemInput<'a> {
    pub table_name: &'a str,
    pub item: Item,
}

#[derive(Debug, Deserialize)]
pub struct PutItemOutput {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryInput<'a> {
    pub table_name: &'a str,
    pub key_condition_expression: &'a str,
    pub expression_attribute_values: HashMap<String, AttributeValue>,
    pub scan_index_forward: bool,
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryOutput {
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanInput<'a> {
    pub table_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_key: Option<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanOutput {
    #[serde(default)]
    pub items: Vec<Item>,
    pub last_evaluated_key: Option<Item>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement<'a> {
    pub attribute_name: &'a str,
    pub key_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition<'a> {
    pub attribute_name: &'a str,
    pub attribute_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTableInput<'a> {
    pub table_name: &'a str,
    pub key_schema: Vec<KeySchemaElement<'a>>,
    pub attribute_definitions: Vec<AttributeDefinition<'a>>,
    pub billing_mode: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CreateTableOutput {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableInput<'a> {
    pub table_name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableOutput {
    pub table: TableDescription,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableDescription {
    pub table_status: String,
}

/// Error body returned with non-2xx responses:
/// `{"__type": "com.amazonaws.dynamodb.v20120810#ResourceInUseException", ...}`.
#[derive(Debug, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(rename = "__type")]
    pub error_type: Option<String>,
    #[serde(alias = "Message")]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Item conversions
// ---------------------------------------------------------------------------

/// Map a record onto its stored item.
pub fn record_to_item(record: &InteractionRecord) -> Item {
    let mut item = Item::new();
    item.insert(
        "session_id".to_string(),
        AttributeValue::S(record.session_id.to_string()),
    );
    item.insert(
        "timestamp".to_string(),
        AttributeValue::S(record.timestamp.clone()),
    );
    item.insert(
        "interaction_id".to_string(),
        AttributeValue::S(record.interaction_id.to_string()),
    );
    item.insert(
        "bot_name".to_string(),
        AttributeValue::S(record.bot_name.clone()),
    );
    item.insert(
        "prompt".to_string(),
        AttributeValue::S(record.prompt.clone()),
    );
    item.insert(
        "response".to_string(),
        AttributeValue::S(record.response.clone()),
    );
    item.insert("model".to_string(), AttributeValue::S(record.model.clone()));
    item.insert(
        "web_search_enabled".to_string(),
        AttributeValue::Bool(record.web_search_enabled),
    );
    item
}

/// Rebuild a record from a stored item.
pub fn item_to_record(item: &Item) -> Result<InteractionRecord, StoreError> {
    let session_id = Uuid::parse_str(get_s(item, "session_id")?)
        .map_err(|e| StoreError::MalformedItem(format!("invalid session_id: {e}")))?;
    let interaction_id = Uuid::parse_str(get_s(item, "interaction_id")?)
        .map_err(|e| StoreError::MalformedItem(format!("invalid interaction_id: {e}")))?;

    Ok(InteractionRecord {
        session_id,
        timestamp: get_s(item, "timestamp")?.to_string(),
        interaction_id,
        bot_name: get_s(item, "bot_name")?.to_string(),
        prompt: get_s(item, "prompt")?.to_string(),
        response: get_s(item, "response")?.to_string(),
        model: get_s(item, "model")?.to_string(),
        web_search_enabled: get_bool(item, "web_search_enabled")?,
    })
}

fn get_s<'a>(item: &'a Item, name: &str) -> Result<&'a str, StoreError> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(value),
        Some(_) => Err(StoreError::MalformedItem(format!(
            "attribute '{name}' is not a string"
        ))),
        None => Err(StoreError::MalformedItem(format!(
            "missing attribute '{name}'"
        ))),
    }
}

fn get_bool(item: &Item, name: &str) -> Result<bool, StoreError> {
    match item.get(name) {
        Some(AttributeValue::Bool(value)) => Ok(*value),
        Some(_) => Err(StoreError::MalformedItem(format!(
            "attribute '{name}' is not a boolean"
        ))),
        None => Err(StoreError::MalformedItem(format!(
            "missing attribute '{name}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_value_wire_format() {
        assert_eq!(
            serde_json::to_string(&AttributeValue::S("x".to_string())).unwrap(),
            r#"{"S":"x"}"#
        );
        assert_eq!(
            serde_json::to_string(&AttributeValue::Bool(true)).unwrap(),
            r#"{"BOOL":true}"#
        );

        let parsed: AttributeValue = serde_json::from_str(r#"{"N":"42"}"#).unwrap();
        assert_eq!(parsed, AttributeValue::N("42".to_string()));
    }

    #[test]
    fn test_record_item_mapping() {
        let record = InteractionRecord::new(
            Uuid::now_v7(),
            "Trauma Support Counselor",
            "I feel anxious",
            "That sounds hard.",
            "anthropic.claude-3-5-sonnet-20241022-v2:0",
            true,
        );

        let item = record_to_item(&record);
        assert_eq!(
            item["bot_name"],
            AttributeValue::S("Trauma Support Counselor".to_string())
        );
        assert_eq!(item["web_search_enabled"], AttributeValue::Bool(true));

        let restored = item_to_record(&item).unwrap();
        assert_eq!(restored.session_id, record.session_id);
        assert_eq!(restored.timestamp, record.timestamp);
        assert_eq!(restored.prompt, "I feel anxious");
        assert!(restored.web_search_enabled);
    }

    #[test]
    fn test_item_missing_attribute_is_malformed() {
        let record = InteractionRecord::new(Uuid::now_v7(), "b", "p", "r", "m", false);
        let mut item = record_to_item(&record);
        item.remove("prompt");

        let err = item_to_record(&item).unwrap_err();
        assert!(err.to_string().contains("prompt"));
    }

    #[test]
    fn test_query_input_wire_shape() {
        let mut values = HashMap::new();
        values.insert(
            ":sid".to_string(),
            AttributeValue::S("abc".to_string()),
        );
        let input = QueryInput {
            table_name: "haven-support-logs",
            key_condition_expression: "session_id = :sid",
            expression_attribute_values: values,
            scan_index_forward: false,
            limit: 50,
        };

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["TableName"], "haven-support-logs");
        assert_eq!(json["KeyConditionExpression"], "session_id = :sid");
        assert_eq!(json["ExpressionAttributeValues"][":sid"]["S"], "abc");
        assert_eq!(json["ScanIndexForward"], false);
        assert_eq!(json["Limit"], 50);
    }

    #[test]
    fn test_create_table_wire_shape() {
        let input = CreateTableInput {
            table_name: "haven-support-logs",
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

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["KeySchema"][0]["AttributeName"], "session_id");
        assert_eq!(json["KeySchema"][0]["KeyType"], "HASH");
        assert_eq!(json["KeySchema"][1]["KeyType"], "RANGE");
        assert_eq!(json["AttributeDefinitions"][1]["AttributeType"], "S");
        assert_eq!(json["BillingMode"], "PAY_PER_REQUEST");
    }

    #[test]
    fn test_scan_input_omits_absent_fields() {
        let input = ScanInput {
            table_name: "t",
            limit: None,
            exclusive_start_key: None,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("Limit").is_none());
        assert!(json.get("ExclusiveStartKey").is_none());
    }

    #[test]
    fn test_service_error_body_parse() {
        let body = r#"{"__type":"com.amazonaws.dynamodb.v20120810#ResourceInUseException","message":"Table already exists: haven-support-logs"}"#;
        let parsed: ServiceErrorBody = serde_json::from_str(body).unwrap();
        assert!(parsed.error_type.unwrap().ends_with("ResourceInUseException"));
        assert!(parsed.message.unwrap().contains("already exists"));
    }
}
