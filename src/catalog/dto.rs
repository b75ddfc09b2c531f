use serde::Serialize;

use crate::catalog::repo_types::{CatalogEntry, CatalogInput};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct EntryListResponse {
    pub success: bool,
    pub entries: Vec<CatalogEntry>,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub success: bool,
    pub entry: CatalogEntry,
}

impl CatalogInput {
    pub fn validated(mut self) -> Result<Self, AppError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(AppError::BadRequest("Name is required".into()));
        }
        self.name_en = self
            .name_en
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self.description = self
            .description
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(self)
    }
}
