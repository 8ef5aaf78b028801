use domain::request::{RawReportRequest, RequestError, YearInput};
use serde_json::{json, Map, Value};

/// 解码队列消息 `{"db_path": .., "country": .., "year": ..}`
///
/// Only an unparsable payload or a non-object is an error here. Missing or
/// mistyped fields are carried through so that validation reports them.
pub fn decode_request(payload: &[u8]) -> Result<RawReportRequest, RequestError> {
    let value: Value =
        serde_json::from_slice(payload).map_err(|e| RequestError::Undecodable(e.to_string()))?;
    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(RequestError::Undecodable(format!(
                "expected a JSON object, got {}",
                other
            )))
        }
    };

    Ok(RawReportRequest {
        db_path: string_field(&fields, "db_path"),
        country: string_field(&fields, "country"),
        year: year_field(fields.get("year")),
    })
}

/// Payload a publisher sends for one report.
pub fn encode_request(db_path: &str, country: &str, year: i64) -> Vec<u8> {
    json!({
        "country": country,
        "year": year,
        "db_path": db_path,
    })
    .to_string()
    .into_bytes()
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

fn year_field(value: Option<&Value>) -> YearInput {
    match value {
        None | Some(Value::Null) => YearInput::Missing,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(year) => YearInput::Integer(year),
            None => YearInput::NotInteger(n.to_string()),
        },
        Some(other) => YearInput::NotInteger(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_request() {
        let raw = decode_request(&encode_request("/db/chinook.db", "Brazil", 2009)).unwrap();
        assert_eq!(raw.db_path.as_deref(), Some("/db/chinook.db"));
        assert_eq!(raw.country.as_deref(), Some("Brazil"));
        assert_eq!(raw.year, YearInput::Integer(2009));
    }

    #[test]
    fn test_decode_mistyped_fields() {
        let raw =
            decode_request(br#"{"db_path": 12, "country": "Brazil", "year": "2009"}"#).unwrap();
        assert_eq!(raw.db_path, None);
        assert_eq!(raw.year, YearInput::NotInteger("\"2009\"".to_string()));

        let raw = decode_request(br#"{"country": "Brazil", "year": 2009.5}"#).unwrap();
        assert_eq!(raw.year, YearInput::NotInteger("2009.5".to_string()));

        let raw = decode_request(br#"{"country": "Brazil", "year": null}"#).unwrap();
        assert_eq!(raw.year, YearInput::Missing);
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_request(b"not json"),
            Err(RequestError::Undecodable(_))
        ));
        assert!(matches!(
            decode_request(b"[1, 2, 3]"),
            Err(RequestError::Undecodable(_))
        ));
    }
}
