// Mist cloud API wire types
//
// These mirror the JSON shapes returned by the Mist v1 API. Fields are
// deliberately optional: the API omits keys it has no data for, and
// some values arrive as either strings or numbers depending on firmware.

use serde::{Deserialize, Deserializer, Serialize};

/// Paged search envelope: `{ "results": [...], "limit": N, "total": N }`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    pub limit: Option<u32>,
    pub total: Option<u64>,
}

/// A wireless client as returned by `orgs/{org}/clients/search`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WirelessClient {
    pub mac: String,
    pub hostname: Option<String>,
    pub ip: Option<String>,
    pub ap_mac: Option<String>,
    pub ssid: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub band: Option<String>,
    pub channel: Option<u32>,
    pub rssi: Option<f64>,
    pub snr: Option<f64>,
    pub tx_retries: Option<f64>,
    pub rx_retries: Option<f64>,
    pub latency_ms: Option<f64>,
    pub site_id: Option<String>,
}

/// One entry from `orgs/{org}/clients/{mac}/events`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientEvent {
    /// Epoch seconds (fractional).
    pub timestamp: Option<f64>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub reason: Option<String>,
    pub text: Option<String>,
    pub ap: Option<String>,
    pub ssid: Option<String>,
}

/// Device statistics from `orgs/{org}/devices/{mac}/stats`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceStats {
    pub mac: Option<String>,
    pub name: Option<String>,
    pub model: Option<String>,
    pub status: Option<String>,
    /// Seconds since last boot.
    pub uptime: Option<f64>,
}

/// An organization visible to the token, from `GET /orgs`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Org {
    pub id: String,
    pub name: String,
    pub num_sites: Option<u32>,
}

/// The authenticated user, from `GET /self`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelfInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Accept `"5"`, `5`, or `null` for fields the API types inconsistently.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn band_accepts_number_or_string() {
        let numeric: WirelessClient =
            serde_json::from_value(json!({ "mac": "aabbccddeeff", "band": 5 })).unwrap();
        let text: WirelessClient =
            serde_json::from_value(json!({ "mac": "aabbccddeeff", "band": "24" })).unwrap();
        assert_eq!(numeric.band.as_deref(), Some("5"));
        assert_eq!(text.band.as_deref(), Some("24"));
    }

    #[test]
    fn missing_fields_default_to_none() {
        let event: ClientEvent = serde_json::from_value(json!({})).unwrap();
        assert!(event.event_type.is_none());
        assert!(event.reason.is_none());
        assert!(event.timestamp.is_none());
    }

    #[test]
    fn search_page_without_results_is_empty() {
        let page: SearchPage<WirelessClient> = serde_json::from_value(json!({ "total": 0 })).unwrap();
        assert!(page.results.is_empty());
    }
}
