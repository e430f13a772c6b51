// Response envelope shapes.
//
// Success bodies are `{ data, message }` for single records and
// `{ data, count | total | totalPages }` for lists. Error bodies carry
// `message` (or occasionally a string `error`).

use serde::Deserialize;

/// One page of a list query.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total_count: u64,
    /// Always at least 1.
    pub total_pages: u32,
}

/// A record echoed back by a create/update-style call, plus the
/// server's confirmation message.
#[derive(Debug, Clone, PartialEq)]
pub struct Saved<T> {
    pub record: T,
    pub message: Option<String>,
}

/// Result of a delete call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deleted {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> From<DataEnvelope<T>> for Saved<T> {
    fn from(env: DataEnvelope<T>) -> Self {
        Self {
            record: env.data,
            message: env.message,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

impl<T> ListEnvelope<T> {
    /// `totalCount` is `count`, else `total`, else the page length.
    /// `totalPages` is the server's value, else derived from `limit`.
    pub fn into_page(self, limit: Option<u32>) -> Page<T> {
        let total_count = self
            .count
            .or(self.total)
            .unwrap_or_else(|| u64::try_from(self.data.len()).unwrap_or(u64::MAX));

        let total_pages = self
            .total_pages
            .or_else(|| {
                limit.filter(|l| *l > 0).map(|l| {
                    u32::try_from(total_count.div_ceil(u64::from(l))).unwrap_or(u32::MAX)
                })
            })
            .unwrap_or(1)
            .max(1);

        Page {
            records: self.data,
            total_count,
            total_pages,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MessageEnvelope {
    #[serde(default)]
    pub message: Option<String>,
}

impl From<MessageEnvelope> for Deleted {
    fn from(env: MessageEnvelope) -> Self {
        Self {
            message: env.message,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    pub fn into_message(self) -> Option<String> {
        self.message
            .filter(|m| !m.trim().is_empty())
            .or_else(|| match self.error {
                Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
    }
}
