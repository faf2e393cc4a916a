use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Category of a logged event. Also names the partition subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Translate,
    Explain,
}

impl HistoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::Translate => "translate",
            HistoryKind::Explain => "explain",
        }
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "translate" => Ok(HistoryKind::Translate),
            "explain" => Ok(HistoryKind::Explain),
            other => Err(anyhow::anyhow!(
                "unknown history kind '{}', expected 'translate' or 'explain'",
                other
            )),
        }
    }
}

/// One logged translation or explanation event.
///
/// Field order here is the on-disk order. Fields that do not apply to the
/// record's kind are written as empty strings. When loading, any field but
/// `type` may be missing: strings come back empty and the timestamp comes
/// back as `0001-01-01T00:00:00Z`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    #[serde(default)]
    pub source_text: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub from_lang: String,
    #[serde(default)]
    pub to_lang: String,
    #[serde(default)]
    pub template_id: String,
    #[serde(default = "zero_timestamp")]
    pub timestamp: DateTime<Local>,
}

fn zero_timestamp() -> DateTime<Local> {
    let midnight = NaiveDate::from_ymd_opt(1, 1, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN);
    Utc.from_utc_datetime(&midnight).with_timezone(&Local)
}

impl HistoryRecord {
    pub fn translation(
        source_text: impl Into<String>,
        result: impl Into<String>,
        from_lang: impl Into<String>,
        to_lang: impl Into<String>,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: HistoryKind::Translate,
            source_text: source_text.into(),
            result: result.into(),
            from_lang: from_lang.into(),
            to_lang: to_lang.into(),
            template_id: String::new(),
            timestamp,
        }
    }

    /// Both the source term and the full explanation text are kept.
    pub fn explanation(
        source_text: impl Into<String>,
        result: impl Into<String>,
        template_id: impl Into<String>,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: HistoryKind::Explain,
            source_text: source_text.into(),
            result: result.into(),
            from_lang: String::new(),
            to_lang: String::new(),
            template_id: template_id.into(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_translation_leaves_template_empty() {
        let record = HistoryRecord::translation("Hello", "你好", "en", "zh", noon());

        assert_eq!(record.kind, HistoryKind::Translate);
        assert_eq!(record.from_lang, "en");
        assert_eq!(record.to_lang, "zh");
        assert!(record.template_id.is_empty());
        assert!(Uuid::parse_str(&record.id).is_ok());
    }

    #[test]
    fn test_explanation_keeps_result_and_clears_langs() {
        let record =
            HistoryRecord::explanation("machine learning", "a branch of AI", "template1", noon());

        assert_eq!(record.kind, HistoryKind::Explain);
        assert_eq!(record.result, "a branch of AI");
        assert_eq!(record.template_id, "template1");
        assert!(record.from_lang.is_empty());
        assert!(record.to_lang.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = HistoryRecord::translation("a", "b", "en", "zh", noon());
        let b = HistoryRecord::translation("a", "b", "en", "zh", noon());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_wire_field_names_and_order() {
        let record = HistoryRecord::explanation("term", "meaning", "t1", noon());
        let json = serde_json::to_string(&record).unwrap();

        let keys = [
            "\"id\"",
            "\"type\"",
            "\"source_text\"",
            "\"result\"",
            "\"from_lang\"",
            "\"to_lang\"",
            "\"template_id\"",
            "\"timestamp\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "explain");
        assert_eq!(value["from_lang"], "");
        let stamp = value["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn test_sparse_record_loads_with_empty_fields() {
        let json = r#"{"type": "translate", "source_text": "Hello"}"#;
        let record: HistoryRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.kind, HistoryKind::Translate);
        assert_eq!(record.source_text, "Hello");
        assert!(record.id.is_empty());
        assert!(record.result.is_empty());
        assert_eq!(
            record.timestamp.with_timezone(&Utc).to_rfc3339(),
            "0001-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_record_with_unknown_type_is_rejected() {
        let json = r#"{"type": "summarize", "source_text": "Hello"}"#;
        assert!(serde_json::from_str::<HistoryRecord>(json).is_err());
    }

    #[test]
    fn test_fractional_seconds_with_offset() {
        let json = r#"{"id": "x", "type": "explain", "source_text": "a", "result": "b",
            "from_lang": "", "to_lang": "", "template_id": "t",
            "timestamp": "2024-03-09T12:00:00.1234567+08:00"}"#;
        let record: HistoryRecord = serde_json::from_str(json).unwrap();

        assert_eq!(
            record.timestamp.with_timezone(&Utc).to_rfc3339(),
            "2024-03-09T04:00:00.123456700+00:00"
        );
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("translate".parse::<HistoryKind>().unwrap(), HistoryKind::Translate);
        assert_eq!("explain".parse::<HistoryKind>().unwrap(), HistoryKind::Explain);
        assert!("summarize".parse::<HistoryKind>().is_err());
    }
}
