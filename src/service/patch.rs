//! Partial update of a riddle: whitelist check on the raw document, then a typed projection.

use crate::error::AppError;
use crate::sql::{QueryBuf, UpdateBuilder};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Keys a client may send in a patch document.
pub const ALLOWED_FIELDS: &[&str] = &["riddle", "solution", "synonyms", "username", "user_email"];

/// Stage one: an untyped JSON object whose keys all passed the whitelist.
#[derive(Debug)]
pub struct PatchDocument(Map<String, Value>);

impl PatchDocument {
    /// Decode raw bytes into an object and reject it whole if any key is not allowed.
    pub fn parse(bytes: &[u8]) -> Result<Self, AppError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| AppError::BadRequest(format!("invalid request body: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, AppError> {
        let Value::Object(map) = value else {
            return Err(AppError::BadRequest("body must be a JSON object".into()));
        };
        if let Some(field) = map.keys().find(|k| !ALLOWED_FIELDS.contains(&k.as_str())) {
            tracing::warn!(invalid_field = %field, "invalid field in patch document");
            return Err(AppError::BadRequest(format!("invalid field: {field}")));
        }
        Ok(PatchDocument(map))
    }

    /// Stage two: project into the typed patch.
    pub fn into_patch(self) -> Result<RiddlePatch, AppError> {
        let raw: RawPatch = serde_json::from_value(Value::Object(self.0))
            .map_err(|e| AppError::BadRequest(format!("invalid request body: {e}")))?;
        Ok(RiddlePatch {
            riddle: non_empty(raw.riddle),
            solution: non_empty(raw.solution),
            synonyms: raw.synonyms,
            username: non_empty(raw.username),
            user_email: non_empty(raw.user_email),
        })
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPatch {
    #[serde(default)]
    riddle: Option<String>,
    #[serde(default)]
    solution: Option<String>,
    #[serde(default, deserialize_with = "explicit")]
    synonyms: Option<Option<String>>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    user_email: Option<String>,
}

/// A key that is present maps to `Some`, even when its value is null.
fn explicit<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

/// Fields to change on one riddle. `None` means untouched.
/// `synonyms: Some(None)` clears the column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RiddlePatch {
    pub riddle: Option<String>,
    pub solution: Option<String>,
    pub synonyms: Option<Option<String>>,
    pub username: Option<String>,
    pub user_email: Option<String>,
}

impl RiddlePatch {
    /// Whitelist-check and decode a request body.
    pub fn from_body(bytes: &[u8]) -> Result<Self, AppError> {
        PatchDocument::parse(bytes)?.into_patch()
    }

    pub fn is_empty(&self) -> bool {
        self.riddle.is_none()
            && self.solution.is_none()
            && self.synonyms.is_none()
            && self.username.is_none()
            && self.user_email.is_none()
    }

    fn builder(&self) -> UpdateBuilder {
        let mut b = UpdateBuilder::new();
        if let Some(v) = &self.riddle {
            b.set("riddle", v.clone());
        }
        if let Some(v) = &self.solution {
            b.set("solution", v.clone());
        }
        if let Some(v) = &self.synonyms {
            b.set("synonyms", v.clone());
        }
        if let Some(v) = &self.username {
            b.set("username", v.clone());
        }
        if let Some(v) = &self.user_email {
            b.set("user_email", v.clone());
        }
        b
    }

    /// Column names this patch writes, in SET order.
    pub fn columns(&self) -> Vec<&'static str> {
        self.builder().columns().collect()
    }

    /// Parameterized UPDATE for `id`. Fails when no field is present.
    pub fn to_update(&self, id: i32) -> Result<QueryBuf, AppError> {
        self.builder()
            .build(id)
            .ok_or_else(|| AppError::BadRequest("no fields to update".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::PgBindValue;
    use rstest::rstest;
    use serde_json::json;

    fn patch(v: Value) -> Result<RiddlePatch, AppError> {
        PatchDocument::from_value(v)?.into_patch()
    }

    #[rstest]
    #[case(json!({"riddle": "r"}), vec!["riddle"])]
    #[case(json!({"solution": "s", "riddle": "r"}), vec!["riddle", "solution"])]
    #[case(json!({"user_email": "a@b.c", "username": "ann"}), vec!["username", "user_email"])]
    #[case(
        json!({"riddle": "r", "solution": "s", "synonyms": "t", "username": "u", "user_email": "e"}),
        vec!["riddle", "solution", "synonyms", "username", "user_email"]
    )]
    fn update_touches_exactly_the_supplied_keys(#[case] doc: Value, #[case] expected: Vec<&str>) {
        let p = patch(doc).expect("valid patch");
        assert_eq!(p.columns(), expected);
        let q = p.to_update(4).expect("non-empty");
        assert_eq!(q.params.len(), expected.len() + 1);
        assert_eq!(q.params.last(), Some(&PgBindValue::Int(4)));
    }

    #[rstest]
    #[case(json!({"published": true}))]
    #[case(json!({"riddle": "r", "id": 9}))]
    #[case(json!({"riddle": "r", "solution": "s", "synonyms": "t", "username": "u", "user_email": "e", "extra": 1}))]
    fn any_disallowed_key_rejects_the_document(#[case] doc: Value) {
        let err = patch(doc).expect_err("must reject");
        assert!(matches!(err, AppError::BadRequest(m) if m.starts_with("invalid field")));
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({"riddle": ""}))]
    #[case(json!({"riddle": null, "solution": "", "username": null}))]
    fn patch_without_present_fields_is_rejected(#[case] doc: Value) {
        let p = patch(doc).expect("whitelisted");
        assert!(p.is_empty());
        let err = p.to_update(1).expect_err("empty patch");
        assert!(matches!(err, AppError::BadRequest(m) if m == "no fields to update"));
    }

    #[test]
    fn explicit_null_synonyms_clears_the_column() {
        let p = patch(json!({"synonyms": null})).expect("valid");
        assert_eq!(p.synonyms, Some(None));
        let q = p.to_update(2).expect("synonyms is present");
        assert_eq!(q.params, vec![PgBindValue::Null, PgBindValue::Int(2)]);
    }

    #[test]
    fn empty_synonyms_string_is_still_written() {
        let p = patch(json!({"synonyms": ""})).expect("valid");
        assert_eq!(p.synonyms, Some(Some(String::new())));
        assert_eq!(p.columns(), vec!["synonyms"]);
    }

    #[rstest]
    #[case(b"not json".as_slice())]
    #[case(b"[1, 2]".as_slice())]
    #[case(br#"{"riddle": 5}"#.as_slice())]
    fn malformed_bodies_are_bad_requests(#[case] body: &[u8]) {
        assert!(matches!(RiddlePatch::from_body(body), Err(AppError::BadRequest(_))));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// Any ordered subset of the whitelist, each key with a non-empty value.
        fn arb_fields() -> impl Strategy<Value = Vec<(&'static str, String)>> {
            prop::sample::subsequence(ALLOWED_FIELDS.to_vec(), 0..=ALLOWED_FIELDS.len())
                .prop_flat_map(|keys| {
                    let n = keys.len();
                    (Just(keys), prop::collection::vec("[a-zA-Z0-9 ?]{1,16}", n))
                })
                .prop_map(|(keys, values)| keys.into_iter().zip(values).collect())
        }

        fn arb_foreign_key() -> impl Strategy<Value = String> {
            "[a-z_]{1,12}".prop_filter("must be outside the whitelist", |k| {
                !ALLOWED_FIELDS.contains(&k.as_str())
            })
        }

        fn document(fields: &[(&'static str, String)]) -> Value {
            Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
                    .collect(),
            )
        }

        proptest! {
            #[test]
            fn whitelisted_keys_map_to_exactly_their_columns(fields in arb_fields(), id in 0..i32::MAX) {
                let expected: Vec<&str> = fields.iter().map(|(k, _)| *k).collect();
                let p = patch(document(&fields)).expect("whitelisted document");
                prop_assert_eq!(p.columns(), expected.clone());
                match p.to_update(id) {
                    Ok(q) => {
                        prop_assert!(!expected.is_empty());
                        prop_assert_eq!(q.params.len(), expected.len() + 1);
                        prop_assert_eq!(q.params.last(), Some(&PgBindValue::Int(id)));
                        for (k, v) in &fields {
                            prop_assert!(q.params.contains(&PgBindValue::Text(v.clone())));
                            let needle = format!("\"{k}\" = $");
                            prop_assert!(q.sql.contains(&needle));
                        }
                    }
                    Err(err) => {
                        prop_assert!(expected.is_empty());
                        prop_assert!(matches!(err, AppError::BadRequest(m) if m == "no fields to update"));
                    }
                }
            }

            #[test]
            fn one_foreign_key_rejects_the_whole_document(
                fields in arb_fields(),
                foreign in arb_foreign_key(),
                value in "[a-z]{0,8}",
            ) {
                let mut doc = document(&fields);
                doc[foreign.as_str()] = Value::String(value);
                let err = patch(doc).expect_err("foreign key must reject");
                prop_assert!(
                    matches!(&err, AppError::BadRequest(m) if *m == format!("invalid field: {foreign}")),
                    "unexpected error: {err:?}"
                );
            }
        }
    }
}
