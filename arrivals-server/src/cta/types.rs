//! Arrivals feed response DTOs.
//!
//! These types map directly to the `ttarrivals` JSON response. Every field
//! is a string or absent; flags are `"0"`/`"1"`. Records are kept as raw
//! JSON values at this level so that one odd record cannot fail the whole
//! response.

use serde::{Deserialize, Deserializer};

/// Top-level response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct ArrivalsResponse {
    /// The feed nests everything under `ctatt`.
    pub ctatt: Option<ArrivalsBody>,
}

/// Body of an arrivals response.
#[derive(Debug, Clone, Deserialize)]
pub struct ArrivalsBody {
    /// When the response was generated (local time).
    pub tmst: Option<String>,

    /// Error code; `"0"` means success.
    #[serde(rename = "errCd")]
    pub err_cd: Option<String>,

    /// Error message when `errCd` is not `"0"`.
    #[serde(rename = "errNm")]
    pub err_nm: Option<String>,

    /// Arrival predictions. Absent or null when there are none.
    pub eta: Option<Vec<serde_json::Value>>,
}

/// One arrival prediction.
///
/// Fields that are not JSON strings read as absent, so a stray number in a
/// flag does not cost the whole record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EtaRecord {
    /// Run number.
    #[serde(deserialize_with = "lenient_string")]
    pub rn: Option<String>,

    /// Route code ("Red", "P", "Brn", ...).
    #[serde(deserialize_with = "lenient_string")]
    pub rt: Option<String>,

    /// Destination name as shown on the train.
    #[serde(rename = "destNm", deserialize_with = "lenient_string")]
    pub dest_nm: Option<String>,

    /// Predicted arrival time.
    #[serde(rename = "arrT", deserialize_with = "lenient_string")]
    pub arr_t: Option<String>,

    /// When the prediction was made.
    #[serde(deserialize_with = "lenient_string")]
    pub prdt: Option<String>,

    /// `"1"` if the prediction is schedule-based.
    #[serde(rename = "isSch", deserialize_with = "lenient_string")]
    pub is_sch: Option<String>,

    /// `"1"` if the run is flagged as the last trip.
    #[serde(rename = "isFlt", deserialize_with = "lenient_string")]
    pub is_flt: Option<String>,

    /// `"1"` if the run is a special (holiday) train.
    #[serde(rename = "isSpcl", deserialize_with = "lenient_string")]
    pub is_spcl: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_response() {
        let json = r#"{
            "ctatt": {
                "tmst": "2024-03-15T14:00:00",
                "errCd": "0",
                "errNm": null,
                "eta": [{
                    "staId": "40540",
                    "rn": "812",
                    "rt": "Red",
                    "destNm": "Howard",
                    "prdt": "2024-03-15T13:59:30",
                    "arrT": "2024-03-15T14:03:00",
                    "isApp": "0",
                    "isSch": "0",
                    "isDly": "0",
                    "isFlt": "0"
                }]
            }
        }"#;

        let response: ArrivalsResponse = serde_json::from_str(json).unwrap();
        let body = response.ctatt.unwrap();
        assert_eq!(body.err_cd.as_deref(), Some("0"));
        assert!(body.err_nm.is_none());

        let eta = body.eta.unwrap();
        assert_eq!(eta.len(), 1);

        let record: EtaRecord = serde_json::from_value(eta[0].clone()).unwrap();
        assert_eq!(record.rt.as_deref(), Some("Red"));
        assert_eq!(record.dest_nm.as_deref(), Some("Howard"));
        assert_eq!(record.arr_t.as_deref(), Some("2024-03-15T14:03:00"));
        assert!(record.is_spcl.is_none());
    }

    #[test]
    fn non_string_values_read_as_absent() {
        let record: EtaRecord = serde_json::from_value(serde_json::json!({
            "rt": "Red",
            "destNm": "Howard",
            "arrT": "2024-03-15T14:03:00",
            "isSch": 0,
            "isFlt": null,
            "isSpcl": ["1"],
            "rn": 812
        }))
        .unwrap();

        assert_eq!(record.rt.as_deref(), Some("Red"));
        assert!(record.is_sch.is_none());
        assert!(record.is_flt.is_none());
        assert!(record.is_spcl.is_none());
        assert!(record.rn.is_none());
    }

    #[test]
    fn missing_eta_is_none() {
        let json = r#"{"ctatt": {"tmst": "2024-03-15T14:00:00", "errCd": "0"}}"#;
        let response: ArrivalsResponse = serde_json::from_str(json).unwrap();
        assert!(response.ctatt.unwrap().eta.is_none());
    }

    #[test]
    fn non_list_eta_fails() {
        let json = r#"{"ctatt": {"errCd": "0", "eta": "none"}}"#;
        assert!(serde_json::from_str::<ArrivalsResponse>(json).is_err());
    }
}
