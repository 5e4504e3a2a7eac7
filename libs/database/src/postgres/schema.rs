use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Schema};
use tracing::info;

use crate::common::DatabaseResult;

/// Create the table backing `entity` unless it already exists.
///
/// The DDL is derived from the entity definition, so the table always matches
/// the model the repositories query with. Existing tables are left untouched.
pub async fn create_table_if_missing<E>(db: &DatabaseConnection, entity: E) -> DatabaseResult<()>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(entity);
    stmt.if_not_exists();

    db.execute_raw(backend.build(&stmt)).await?;

    info!(table = entity.table_name(), "Table ready");
    Ok(())
}
