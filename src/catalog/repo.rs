use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::repo_types::{CatalogEntry, CatalogInput, CatalogKind, CatalogRow};
use crate::db::PgStore;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_entries(&self, kind: CatalogKind) -> anyhow::Result<Vec<CatalogEntry>>;
    async fn create_entry(
        &self,
        kind: CatalogKind,
        input: &CatalogInput,
    ) -> anyhow::Result<CatalogEntry>;
    async fn update_entry(
        &self,
        kind: CatalogKind,
        id: Uuid,
        input: &CatalogInput,
    ) -> anyhow::Result<Option<CatalogEntry>>;
    async fn delete_entry(&self, kind: CatalogKind, id: Uuid) -> anyhow::Result<bool>;
}

// Table names come from `CatalogKind::table`, never from user input.
#[async_trait]
impl CatalogStore for PgStore {
    async fn list_entries(&self, kind: CatalogKind) -> anyhow::Result<Vec<CatalogEntry>> {
        let rows = sqlx::query_as::<_, CatalogRow>(&format!(
            "SELECT id, name, name_en, description, created_at FROM {} ORDER BY name ASC",
            kind.table()
        ))
        .fetch_all(&self.db)
        .await
        .with_context(|| format!("list {}", kind.table()))?;
        Ok(rows.into_iter().map(|r| r.into_entry(kind)).collect())
    }

    async fn create_entry(
        &self,
        kind: CatalogKind,
        input: &CatalogInput,
    ) -> anyhow::Result<CatalogEntry> {
        let row = sqlx::query_as::<_, CatalogRow>(&format!(
            r#"
            INSERT INTO {} (id, name, name_en, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, name_en, description, created_at
            "#,
            kind.table()
        ))
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.name_en)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await
        .with_context(|| format!("insert into {}", kind.table()))?;
        Ok(row.into_entry(kind))
    }

    async fn update_entry(
        &self,
        kind: CatalogKind,
        id: Uuid,
        input: &CatalogInput,
    ) -> anyhow::Result<Option<CatalogEntry>> {
        let row = sqlx::query_as::<_, CatalogRow>(&format!(
            r#"
            UPDATE {}
               SET name = $2, name_en = $3, description = $4
             WHERE id = $1
            RETURNING id, name, name_en, description, created_at
            "#,
            kind.table()
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.name_en)
        .bind(&input.description)
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("update {}", kind.table()))?;
        Ok(row.map(|r| r.into_entry(kind)))
    }

    async fn delete_entry(&self, kind: CatalogKind, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", kind.table()))
            .bind(id)
            .execute(&self.db)
            .await
            .with_context(|| format!("delete from {}", kind.table()))?;
        Ok(res.rows_affected() > 0)
    }
}
