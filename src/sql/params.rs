//! Values that can be bound as positional parameters.

use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A value bound to a PostgreSQL statement. Never rendered into SQL text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PgBindValue {
    Null,
    Int(i32),
    Text(String),
}

impl From<i32> for PgBindValue {
    fn from(n: i32) -> Self {
        PgBindValue::Int(n)
    }
}

impl From<String> for PgBindValue {
    fn from(s: String) -> Self {
        PgBindValue::Text(s)
    }
}

impl From<Option<String>> for PgBindValue {
    fn from(s: Option<String>) -> Self {
        s.map_or(PgBindValue::Null, PgBindValue::Text)
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            PgBindValue::Null => Ok(IsNull::Yes),
            PgBindValue::Int(n) => <i32 as Encode<Postgres>>::encode_by_ref(n, buf),
            PgBindValue::Text(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)
            }
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Int(_) => PgTypeInfo::with_name("INT4"),
            PgBindValue::Null | PgBindValue::Text(_) => PgTypeInfo::with_name("TEXT"),
        })
    }
}

impl sqlx::Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}
