//! Schema bootstrap from entity definitions.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};

use super::entity::{calendar, calendar_image, event, image, user};

async fn create_table<E, C>(conn: &C, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let backend = conn.get_database_backend();
    let stmt = schema
        .create_table_from_entity(entity)
        .if_not_exists()
        .to_owned();
    conn.execute(backend.build(&stmt)).await?;
    Ok(())
}

/// Create all tables if they do not exist, parents before children.
///
/// # Errors
/// Returns the database error of the first failing statement.
pub async fn create_tables<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    let schema = Schema::new(conn.get_database_backend());
    create_table(conn, &schema, user::Entity).await?;
    create_table(conn, &schema, image::Entity).await?;
    create_table(conn, &schema, calendar::Entity).await?;
    create_table(conn, &schema, event::Entity).await?;
    create_table(conn, &schema, calendar_image::Entity).await?;
    tracing::info!("schema ready");
    Ok(())
}
