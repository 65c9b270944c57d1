// src/shared/types/pagination.rs

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

/// 一覧系エンドポイント共通の `?page=&per_page=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PageQuery {
    /// 1 始まりのページ番号と件数。件数は 1〜100 に丸める
    pub fn page_and_size(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, per_page)
    }
}

/// レスポンスの `meta.pagination`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

impl PageMeta {
    pub fn new(current_page: u64, page_size: u64, total_items: u64) -> Self {
        Self {
            current_page,
            page_size,
            total_pages: total_items.div_ceil(page_size.max(1)),
            total_items,
        }
    }
}
