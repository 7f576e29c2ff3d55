// JSON codec for the wire representation of blocks and chains
use crate::error::{BlockchainError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub fn to_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string(data)
        .map_err(|e| BlockchainError::Serialization(format!("Serialization failed: {e}")))
}

pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json)
        .map_err(|e| BlockchainError::Serialization(format!("Deserialization failed: {e}")))
}

pub fn from_json_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| BlockchainError::Serialization(format!("Deserialization failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        id: u64,
        name: String,
        values: Vec<i32>,
    }

    #[test]
    fn test_serialize_deserialize() {
        let original = TestData {
            id: 42,
            name: "test".to_string(),
            values: vec![1, 2, 3, 4, 5],
        };

        let serialized = to_json(&original).expect("Serialization should work");
        let deserialized: TestData = from_json(&serialized).expect("Deserialization should work");

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_deserialize_invalid_data() {
        let result: Result<TestData> = from_json("{\"id\": \"nope\"}");
        assert!(matches!(result, Err(BlockchainError::Serialization(_))));
    }
}
