use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtistError {
    #[error("duplicate username: {0}")]
    DuplicateUsername(String),
    #[error("{0}")]
    DbErr(String),
}

/// 艺术家
///
/// `username` 是唯一标识，创建后不可修改；其余字段由更新操作整体替换。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub username: String,
    pub artist_name: Option<String>,
    pub artist_genre: Option<String>,
    pub album_recorded: Option<i64>,
}

impl Artist {
    pub fn new(
        username: String,
        artist_name: Option<String>,
        artist_genre: Option<String>,
        album_recorded: Option<i64>,
    ) -> Self {
        Self {
            username,
            artist_name,
            artist_genre,
            album_recorded,
        }
    }

    /// 整体替换可变字段，username 保持不变
    pub fn replace_details(
        &mut self,
        artist_name: String,
        artist_genre: String,
        album_recorded: i64,
    ) -> &mut Self {
        self.artist_name = Some(artist_name);
        self.artist_genre = Some(artist_genre);
        self.album_recorded = Some(album_recorded);
        self
    }
}

/// 艺术家仓储接口
///
/// 每个方法对应一条语句；调用之间不共享连接，也不构成事务。
#[async_trait]
pub trait ArtistRepository: Send + Sync {
    /// 按 username 升序返回全部艺术家
    async fn list_all(&self) -> Result<Vec<Artist>, ArtistError>;

    /// 按 username 升序返回 [offset, offset + limit) 区间
    async fn list_window(&self, limit: u64, offset: u64) -> Result<Vec<Artist>, ArtistError>;

    async fn count(&self) -> Result<u64, ArtistError>;

    /// 根据 username 查找（不区分大小写），返回所有匹配行
    async fn find_by_username(&self, username: &str) -> Result<Vec<Artist>, ArtistError>;

    async fn insert(&self, artist: &Artist) -> Result<(), ArtistError>;

    /// 以 artist.username 为条件更新三个可变字段，返回受影响行数
    async fn update(&self, artist: &Artist) -> Result<u64, ArtistError>;

    /// 返回受影响行数
    async fn delete(&self, username: &str) -> Result<u64, ArtistError>;
}
