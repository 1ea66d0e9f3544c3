use application::artist::{Paging, PagingResult};
use domain::artist::Artist;
use serde::Serialize;

/// 对外暴露的艺术家结构，可空字段序列化为 null
#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    pub username: String,
    pub artist_name: Option<String>,
    pub artist_genre: Option<String>,
    pub album_recorded: Option<i64>,
}

impl From<Artist> for ArtistResponse {
    fn from(artist: Artist) -> Self {
        Self {
            username: artist.username,
            artist_name: artist.artist_name,
            artist_genre: artist.artist_genre,
            album_recorded: artist.album_recorded,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[derive(Debug, Serialize)]
pub struct PagingView {
    pub page: i64,
    pub total_item: u64,
    pub total_page: u64,
    pub item_per_page: i64,
}

impl From<Paging> for PagingView {
    fn from(paging: Paging) -> Self {
        Self {
            page: paging.page,
            total_item: paging.total_item,
            total_page: paging.total_page,
            item_per_page: paging.item_per_page,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PagingResponse {
    pub data: Vec<ArtistResponse>,
    pub paging: PagingView,
}

impl From<PagingResult> for PagingResponse {
    fn from(result: PagingResult) -> Self {
        Self {
            data: result.data.into_iter().map(ArtistResponse::from).collect(),
            paging: result.paging.into(),
        }
    }
}
