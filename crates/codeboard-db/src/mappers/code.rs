//! Code entity <-> model mapper

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use codeboard_core::entities::Code;
use codeboard_core::value_objects::{CalendarDay, CodeId, UserToken};

use crate::models::CodeModel;

/// Convert CodeModel to Code entity
impl From<CodeModel> for Code {
    fn from(model: CodeModel) -> Self {
        Code {
            id: CodeId::from_uuid(model.id),
            content: model.content,
            core_code: model.core_code,
            owner: UserToken::from_stored(model.owner_token),
            // CHECK (remaining_uses >= 0) holds in the schema
            remaining_uses: u32::try_from(model.remaining_uses).unwrap_or(0),
            created_at: model.created_at,
            posted_on: CalendarDay::new(model.posted_on),
        }
    }
}

/// Column values for inserting a Code
pub struct CodeInsert<'a> {
    pub id: Uuid,
    pub content: &'a str,
    pub core_code: &'a str,
    pub owner_token: &'a str,
    pub remaining_uses: i32,
    pub created_at: DateTime<Utc>,
    pub posted_on: NaiveDate,
}

impl<'a> CodeInsert<'a> {
    pub fn new(code: &'a Code) -> Self {
        Self {
            id: code.id.into_inner(),
            content: &code.content,
            core_code: &code.core_code,
            owner_token: code.owner.as_str(),
            remaining_uses: i32::try_from(code.remaining_uses).unwrap_or(i32::MAX),
            created_at: code.created_at,
            posted_on: code.posted_on.date(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeboard_core::entities::NewCode;

    #[test]
    fn test_model_to_entity_and_back() {
        let code = Code::create(
            NewCode::new(
                "gift AB1234 x:/YZ".to_string(),
                "AB1234 x:/YZ".to_string(),
                UserToken::parse("alice").unwrap(),
            ),
            10,
            Utc::now(),
            CalendarDay::from_ymd(2024, 3, 1).unwrap(),
        );

        let insert = CodeInsert::new(&code);
        let model = CodeModel {
            id: insert.id,
            content: insert.content.to_string(),
            core_code: insert.core_code.to_string(),
            owner_token: insert.owner_token.to_string(),
            remaining_uses: insert.remaining_uses,
            created_at: insert.created_at,
            posted_on: insert.posted_on,
        };

        assert_eq!(Code::from(model), code);
    }

    #[test]
    fn test_negative_uses_clamp_to_zero() {
        let model = CodeModel {
            id: Uuid::new_v4(),
            content: "AB1234 x:/YZ".to_string(),
            core_code: "AB1234 x:/YZ".to_string(),
            owner_token: "alice".to_string(),
            remaining_uses: -1,
            created_at: Utc::now(),
            posted_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert!(Code::from(model).is_exhausted());
    }
}
