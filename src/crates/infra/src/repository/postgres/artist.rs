use super::db_data::artist::{ActiveModel, Column, Entity, Model};
use async_trait::async_trait;
use domain::artist::{Artist, ArtistError, ArtistRepository};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::*;

#[derive(Clone)]
pub struct ArtistRepositoryImpl {
    db: DatabaseConnection,
}

impl ArtistRepositoryImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[inline]
fn map_db_error(e: DbErr) -> ArtistError {
    ArtistError::DbErr(e.to_string())
}

impl From<Model> for Artist {
    fn from(model: Model) -> Self {
        Artist::new(
            model.username,
            model.artist_name,
            model.artist_genre,
            model.album_recorded,
        )
    }
}

impl From<&Artist> for ActiveModel {
    fn from(artist: &Artist) -> Self {
        ActiveModel {
            username: Set(artist.username.clone()),
            artist_name: Set(artist.artist_name.clone()),
            artist_genre: Set(artist.artist_genre.clone()),
            album_recorded: Set(artist.album_recorded),
        }
    }
}

#[async_trait]
impl ArtistRepository for ArtistRepositoryImpl {
    async fn list_all(&self) -> Result<Vec<Artist>, ArtistError> {
        let rows = Entity::find()
            .order_by_asc(Column::Username)
            .all(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(Artist::from).collect())
    }

    async fn list_window(&self, limit: u64, offset: u64) -> Result<Vec<Artist>, ArtistError> {
        let rows = Entity::find()
            .order_by_asc(Column::Username)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(Artist::from).collect())
    }

    async fn count(&self) -> Result<u64, ArtistError> {
        Entity::find().count(&self.db).await.map_err(map_db_error)
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<Artist>, ArtistError> {
        let rows = Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(Column::Username)))
                    .eq(Func::lower(Expr::val(username))),
            )
            .order_by_asc(Column::Username)
            .all(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(Artist::from).collect())
    }

    async fn insert(&self, artist: &Artist) -> Result<(), ArtistError> {
        let active_model: ActiveModel = artist.into();
        Entity::insert(active_model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    ArtistError::DuplicateUsername(artist.username.clone())
                }
                _ => map_db_error(e),
            })?;
        Ok(())
    }

    async fn update(&self, artist: &Artist) -> Result<u64, ArtistError> {
        // 主键不参与 SET
        let active_model = ActiveModel {
            username: NotSet,
            ..ActiveModel::from(artist)
        };
        let result = Entity::update_many()
            .set(active_model)
            .filter(Column::Username.eq(artist.username.as_str()))
            .exec(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected)
    }

    async fn delete(&self, username: &str) -> Result<u64, ArtistError> {
        let result = Entity::delete_many()
            .filter(Column::Username.eq(username))
            .exec(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected)
    }
}
