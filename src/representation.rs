//! Response bodies: riddle fields plus hypermedia links to the next actions.

use crate::extractors::RequestOrigin;
use crate::model::Riddle;
use serde::Serialize;

/// Collection path all riddle routes live under.
pub const RESOURCE_PATH: &str = "/resources";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Link {
    pub rel: &'static str,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RiddleRepresentation {
    pub id: i32,
    pub riddle: String,
    pub solution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<String>,
    pub links: Vec<Link>,
}

/// Outcome of an operation that returns no record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActionResponse {
    pub message: &'static str,
    pub links: Vec<Link>,
}

/// Which operation produced a representation. Fixes the link relations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Create,
    Fetch,
    List,
}

impl Operation {
    fn relations(self) -> &'static [&'static str] {
        match self {
            Operation::Create => &["view", "patch", "delete"],
            Operation::Fetch => &["update", "delete"],
            Operation::List => &["self"],
        }
    }
}

/// Absolute URL assembly. Uses the configured base URL, else `http://<Host>`.
#[derive(Clone, Debug)]
pub struct LinkBuilder {
    base: String,
}

impl LinkBuilder {
    pub fn new(base_url: Option<&str>, origin: &RequestOrigin) -> Self {
        let base = match base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("http://{}", origin.0.as_deref().unwrap_or_default()),
        };
        LinkBuilder { base }
    }

    pub fn collection(&self) -> String {
        format!("{}{}", self.base, RESOURCE_PATH)
    }

    pub fn item(&self, id: i32) -> String {
        format!("{}{}/{}", self.base, RESOURCE_PATH, id)
    }

    pub fn riddle(&self, riddle: Riddle, op: Operation) -> RiddleRepresentation {
        let href = self.item(riddle.id);
        let links = op
            .relations()
            .iter()
            .map(|&rel| Link {
                rel,
                href: href.clone(),
            })
            .collect();
        RiddleRepresentation {
            id: riddle.id,
            riddle: riddle.riddle,
            solution: riddle.solution,
            synonyms: riddle.synonyms,
            links,
        }
    }

    pub fn patched(&self, id: i32) -> ActionResponse {
        ActionResponse {
            message: "riddle updated successfully",
            links: vec![
                Link {
                    rel: "view",
                    href: self.item(id),
                },
                Link {
                    rel: "all-riddles",
                    href: self.collection(),
                },
            ],
        }
    }

    pub fn deleted(&self) -> ActionResponse {
        ActionResponse {
            message: "riddle deleted successfully",
            links: vec![Link {
                rel: "all-riddles",
                href: self.collection(),
            }],
        }
    }
}
