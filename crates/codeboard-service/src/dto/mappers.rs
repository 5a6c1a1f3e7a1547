//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use codeboard_core::entities::Code;
use codeboard_core::value_objects::UserToken;

use super::responses::CodeResponse;

/// A code together with who is looking at it
#[derive(Debug, Clone, Copy)]
pub struct CodeView<'a> {
    pub code: &'a Code,
    pub viewer: &'a UserToken,
    pub already_used: bool,
}

impl<'a> CodeView<'a> {
    pub fn new(code: &'a Code, viewer: &'a UserToken, already_used: bool) -> Self {
        Self {
            code,
            viewer,
            already_used,
        }
    }
}

impl From<CodeView<'_>> for CodeResponse {
    fn from(view: CodeView<'_>) -> Self {
        Self {
            id: view.code.id.to_string(),
            content: view.code.content.clone(),
            remaining_uses: view.code.remaining_uses,
            created_at: view.code.created_at_millis(),
            is_own_code: view.code.is_owned_by(view.viewer),
            already_used: view.already_used,
        }
    }
}
