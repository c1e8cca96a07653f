use serde::{Deserialize, Serialize};

use crate::ident::{lenient_string, RecordId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub players: Vec<String>,
    #[serde(default)]
    pub round_count: usize,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub game_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub total_records: usize,
    #[serde(default)]
    pub unique_players: Vec<String>,
    #[serde(default)]
    pub winner_breakdown: Vec<WinnerCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsPage {
    #[serde(default)]
    pub summary: Summary,
    #[serde(default)]
    pub records: Vec<RecordSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_page_decodes_backend_listing() {
        let body = json!({
            "summary": {
                "total_records": 2,
                "unique_players": ["Alice", "Bob", "Carol"],
                "winner_breakdown": [{"name": "Alice", "count": 2}]
            },
            "records": [
                {
                    "id": "r1",
                    "name": "game_1.json",
                    "source": "game_records",
                    "game_id": 1717171717,
                    "players": ["Alice", "Bob"],
                    "winner": "Alice",
                    "round_count": 4,
                    "updated_at": "2024-05-31T18:08:37"
                },
                {"id": "r2", "winner": null}
            ]
        });

        let page: RecordsPage = serde_json::from_value(body).unwrap();
        assert_eq!(page.summary.total_records, 2);
        assert_eq!(page.summary.winner_breakdown[0].count, 2);
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].game_id.as_deref(), Some("1717171717"));
        assert_eq!(page.records[1].winner, None);
        assert_eq!(page.records[1].round_count, 0);
        assert_eq!(page.records[1].id, RecordId::new("r2"));
    }

    #[test]
    fn test_empty_object_is_an_empty_page() {
        let page: RecordsPage = serde_json::from_value(json!({})).unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.summary, Summary::default());
    }
}
