use chrono::Utc;
use sqlx::{error::Error, types::Json};

use crate::model::{Snapshot, SnapshotRow, Table};

impl Table<SnapshotRow> {
    pub async fn get(&self, id: &str) -> Result<Option<SnapshotRow>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "tvl_snapshot"
        WHERE "id" = $1
        "#;

        sqlx::query_as(SQL).bind(id).fetch_optional(&self.pool).await
    }

    pub async fn upsert(
        &self,
        id: &str,
        data: &Snapshot,
    ) -> Result<(), Error> {
        const SQL: &str = r#"
        INSERT INTO "tvl_snapshot" (
            "id",
            "data",
            "updated_at"
        )
        VALUES ($1, $2, $3)
        ON CONFLICT ("id") DO UPDATE SET
            "data" = EXCLUDED."data",
            "updated_at" = EXCLUDED."updated_at"
        "#;

        sqlx::query(SQL)
            .bind(id)
            .bind(Json(data))
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map(drop)
    }
}
