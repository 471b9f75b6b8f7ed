//! Riddle records as read from and written to the store.

use serde::Deserialize;

/// Public columns of a riddle row. Submitter details and the `published` flag stay server-side.
#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Riddle {
    pub id: i32,
    pub riddle: String,
    pub solution: String,
    pub synonyms: Option<String>,
}

/// Body of a create request. Unknown keys (including `published`) are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewRiddle {
    #[serde(default)]
    pub riddle: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub synonyms: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

impl NewRiddle {
    pub fn into_record(self, id: i32) -> Riddle {
        Riddle {
            id,
            riddle: self.riddle,
            solution: self.solution,
            synonyms: self.synonyms,
        }
    }
}
