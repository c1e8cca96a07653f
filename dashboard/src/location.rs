use types::RecordId;
use url::Url;

pub const RECORD_PARAM: &str = "record";

/// The address the dashboard is shown at. Only the `record` query parameter
/// is ever rewritten; everything else is carried along untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(input)?,
        })
    }

    pub fn record(&self) -> Option<RecordId> {
        self.url
            .query_pairs()
            .find(|(key, value)| key == RECORD_PARAM && !value.is_empty())
            .map(|(_, value)| RecordId::new(value.into_owned()))
    }

    pub fn set_record(&mut self, record: Option<&RecordId>) {
        let others: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(key, _)| key != RECORD_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        if others.is_empty() && record.is_none() {
            self.url.set_query(None);
            return;
        }

        let mut query = self.url.query_pairs_mut();
        query.clear().extend_pairs(others.iter());
        if let Some(id) = record {
            query.append_pair(RECORD_PARAM, id.as_str());
        }
    }

    pub fn with_record(&self, record: Option<&RecordId>) -> Self {
        let mut next = self.clone();
        next.set_record(record);
        next
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}
