use crate::error::AppError;
use crate::validation::{self, CREATE_ARTIST, LIST_PAGING, UPDATE_ARTIST};
use domain::artist::{Artist, ArtistError, ArtistRepository};
use garde::Validate;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// 分页查询命令（page 从 1 开始）
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ListPagingCmd {
    #[garde(range(min = 0))]
    pub page: i64,
    #[garde(range(min = 1))]
    pub limit: i64,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateArtistCmd {
    #[garde(length(chars, min = 1, max = 255))]
    pub username: String,
    #[garde(length(chars, min = 1, max = 255))]
    pub artist_name: Option<String>,
    #[garde(length(chars, min = 1, max = 255))]
    pub artist_genre: Option<String>,
    #[garde(range(min = 1))]
    pub album_recorded: Option<i64>,
}

/// 更新命令：三个可变字段必须同时给出，不支持部分更新
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateArtistCmd {
    #[garde(length(chars, min = 1, max = 255))]
    pub username: String,
    #[garde(length(chars, min = 1, max = 255))]
    pub artist_name: String,
    #[garde(length(chars, min = 1, max = 255))]
    pub artist_genre: String,
    #[garde(range(min = 1))]
    pub album_recorded: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paging {
    pub page: i64,
    pub total_item: u64,
    pub total_page: u64,
    pub item_per_page: i64,
}

#[derive(Debug, Clone)]
pub struct PagingResult {
    pub data: Vec<Artist>,
    pub paging: Paging,
}

/// page=0 与 page=1 一样从第一行开始
fn offset_of(page: i64, limit: i64) -> u64 {
    page.saturating_sub(1).saturating_mul(limit).max(0) as u64
}

/// 查找是大小写不敏感的；有完全匹配的行时优先返回它
fn pick_row(mut rows: Vec<Artist>, username: &str) -> Option<Artist> {
    match rows.iter().position(|a| a.username == username) {
        Some(idx) => Some(rows.swap_remove(idx)),
        None => rows.into_iter().next(),
    }
}

fn duplicate_username(username: &str) -> AppError {
    AppError::Conflict(format!("Username {} already exists", username))
}

#[derive(Clone)]
pub struct ArtistService {
    artist_repository: Arc<dyn ArtistRepository>,
}

impl ArtistService {
    pub fn new(artist_repository: Arc<dyn ArtistRepository>) -> Self {
        Self { artist_repository }
    }

    pub async fn list(&self) -> Result<Vec<Artist>, AppError> {
        let artists = self.artist_repository.list_all().await?;
        debug!("listed {} artists", artists.len());
        Ok(artists)
    }

    pub async fn list_paging(&self, request: &Value) -> Result<PagingResult, AppError> {
        let cmd: ListPagingCmd = LIST_PAGING.validate_into(request)?;

        // limit 已校验为正数
        let limit = cmd.limit as u64;
        let offset = offset_of(cmd.page, cmd.limit);

        let data = self.artist_repository.list_window(limit, offset).await?;
        let total_item = self.artist_repository.count().await?;
        debug!(
            "listed page {} ({} rows, offset {}, total {})",
            cmd.page,
            data.len(),
            offset,
            total_item
        );

        Ok(PagingResult {
            data,
            paging: Paging {
                page: cmd.page,
                total_item,
                total_page: total_item.div_ceil(limit),
                item_per_page: cmd.limit,
            },
        })
    }

    pub async fn create(&self, request: &Value) -> Result<Artist, AppError> {
        let cmd: CreateArtistCmd = CREATE_ARTIST.validate_into(request)?;
        let artist = Artist::new(
            cmd.username,
            cmd.artist_name,
            cmd.artist_genre,
            cmd.album_recorded,
        );

        // 查找不区分大小写，唯一性也按同样的规则判断
        if !self
            .artist_repository
            .find_by_username(&artist.username)
            .await?
            .is_empty()
        {
            return Err(duplicate_username(&artist.username));
        }

        self.artist_repository
            .insert(&artist)
            .await
            .map_err(|e| match e {
                ArtistError::DuplicateUsername(username) => duplicate_username(&username),
                other => AppError::from(other),
            })?;
        info!("artist created: {}", artist.username);

        self.reload(&artist.username).await
    }

    pub async fn get(&self, username: &str) -> Result<Artist, AppError> {
        let username = validation::validate_username(username)?;
        let rows = self.artist_repository.find_by_username(&username).await?;
        pick_row(rows, &username)
            .ok_or_else(|| AppError::NotFound("Artist not found".to_string()))
    }

    pub async fn update(&self, request: &Value) -> Result<Artist, AppError> {
        let cmd: UpdateArtistCmd = UPDATE_ARTIST.validate_into(request)?;

        let mut artist = self
            .find_single(&cmd.username, "Username not found")
            .await?;
        artist.replace_details(cmd.artist_name, cmd.artist_genre, cmd.album_recorded);

        if self.artist_repository.update(&artist).await? == 0 {
            warn!("artist {} vanished before update", artist.username);
        }
        info!("artist updated: {}", artist.username);

        self.reload(&artist.username).await
    }

    pub async fn remove(&self, username: &str) -> Result<(), AppError> {
        let username = validation::validate_username(username)?;

        let artist = self.find_single(&username, "Artist not found").await?;
        if self.artist_repository.delete(&artist.username).await? == 0 {
            warn!("artist {} vanished before delete", artist.username);
        }
        info!("artist removed: {}", artist.username);
        Ok(())
    }

    /// 变更前的存在性检查：优先完全匹配的行，否则要求大小写不敏感匹配恰好一行
    async fn find_single(&self, username: &str, not_found: &str) -> Result<Artist, AppError> {
        let rows = self.artist_repository.find_by_username(username).await?;
        if rows.len() > 1 && !rows.iter().any(|a| a.username == username) {
            return Err(AppError::NotFound(not_found.to_string()));
        }
        pick_row(rows, username).ok_or_else(|| AppError::NotFound(not_found.to_string()))
    }

    async fn reload(&self, username: &str) -> Result<Artist, AppError> {
        let rows = self.artist_repository.find_by_username(username).await?;
        pick_row(rows, username)
            .ok_or_else(|| AppError::NotFound("Artist not found".to_string()))
    }
}
