use serde::{Deserialize, Deserializer, Serialize};

/// One protocol entry from the DefiLlama feed. The feed occasionally ships
/// `null` or non-numeric `tvl` values; those deserialize to `None` and the
/// record is excluded from filtering and comparison instead of failing the
/// whole body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProtocolRecord {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub tvl: Option<f64>,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// A qualifying growth record, derived per run and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpikeRecord {
    pub name: String,
    pub change_percent: f64,
    pub tvl_billions: String,
    pub chain: Option<String>,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::ProtocolRecord;

    #[test]
    fn parses_plain_record() {
        let record: ProtocolRecord = serde_json::from_str(
            r#"{"name":"Aave","tvl":12500000000.5,"chain":"Ethereum"}"#,
        )
        .unwrap();

        assert_eq!(record.name, "Aave");
        assert_eq!(record.tvl, Some(12_500_000_000.5));
        assert_eq!(record.chain.as_deref(), Some("Ethereum"));
        assert_eq!(record.url, None);
    }

    #[test]
    fn non_numeric_tvl_becomes_none() {
        let record: ProtocolRecord =
            serde_json::from_str(r#"{"name":"Foo","tvl":"n/a"}"#).unwrap();
        assert_eq!(record.tvl, None);

        let record: ProtocolRecord =
            serde_json::from_str(r#"{"name":"Foo","tvl":null}"#).unwrap();
        assert_eq!(record.tvl, None);
    }

    #[test]
    fn missing_tvl_becomes_none() {
        let record: ProtocolRecord =
            serde_json::from_str(r#"{"name":"Foo"}"#).unwrap();
        assert_eq!(record.tvl, None);
    }
}
