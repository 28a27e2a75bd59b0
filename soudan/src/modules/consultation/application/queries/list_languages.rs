use async_trait::async_trait;
use serde::Serialize;

use super::super::{ApplicationError, QueryHandler, SharedSession};
use crate::modules::consultation::domain::{LanguageCatalog, SupportedLanguage};

/// 列出可选语言查询
#[derive(Debug, Clone, Default)]
pub struct ListLanguagesQuery;

/// 语言选择器中的一项
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageOption {
    #[serde(flatten)]
    pub language: SupportedLanguage,
    pub active: bool,
}

pub struct ListLanguagesHandler {
    session: SharedSession,
}

impl ListLanguagesHandler {
    pub fn new(session: SharedSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl QueryHandler<ListLanguagesQuery, Vec<LanguageOption>> for ListLanguagesHandler {
    async fn handle(&self, _query: ListLanguagesQuery) -> Result<Vec<LanguageOption>, ApplicationError> {
        let session = self.session.read().await;
        let active = session.active_language().code();

        Ok(LanguageCatalog::all()
            .iter()
            .map(|language| LanguageOption {
                language: *language,
                active: language.code == active,
            })
            .collect())
    }
}
