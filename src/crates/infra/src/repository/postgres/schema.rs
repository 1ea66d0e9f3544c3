use super::db_data::artist::Entity;
use sea_orm::*;

/// 按实体定义建表（CREATE TABLE IF NOT EXISTS），可重复执行
pub async fn create_artist_table(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(Entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}
