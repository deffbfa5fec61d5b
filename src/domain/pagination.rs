//! 分页
//!
//! 两种分页方式：
//! - 偏移分页（page / pageSize + 关键字过滤），返回 `{ list, totalCount }`
//! - 游标分页（cursor + limit），返回 `{ list, nextCursor }`

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

pub const DEFAULT_CURSOR_LIMIT: u32 = 10;
pub const MAX_CURSOR_LIMIT: u32 = 100;

/// 列表排序方式
///
/// 未指定时按 id 升序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    /// 最新优先
    Recent,
    /// id 升序
    #[default]
    Oldest,
}

/// 偏移分页请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    pub order_by: OrderBy,
    pub keyword: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            order_by: OrderBy::default(),
            keyword: None,
        }
    }
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// 关键字对应的 LIKE 模式，空白关键字视为未指定
    ///
    /// 模式已折叠大小写，只能与 `fold_case` 写入的列比较
    pub fn keyword_pattern(&self) -> Option<String> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| contains_pattern(&fold_case(k)))
    }
}

/// 搜索列的大小写折叠（Unicode 小写）
///
/// SQLite 的 `LIKE` 只忽略 ASCII 大小写，搜索列在写入时先折叠
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// 构造子串匹配的 LIKE 模式（配合 `ESCAPE '\'` 使用）
///
/// `%`、`_`、`\` 按字面匹配
pub fn contains_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// 偏移分页结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub list: Vec<T>,
    pub total_count: i64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            list: self.list.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}

/// 游标分页请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorRequest {
    /// 本页第一条记录的 id（即上一页返回的 nextCursor）
    pub cursor: Option<i64>,
    pub limit: u32,
}

impl Default for CursorRequest {
    fn default() -> Self {
        Self {
            cursor: None,
            limit: DEFAULT_CURSOR_LIMIT,
        }
    }
}

impl CursorRequest {
    /// 实际查询条数：多取一条用于判断是否还有下一页
    pub fn fetch_size(&self) -> i64 {
        i64::from(self.limit) + 1
    }
}

/// 游标分页结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T> {
    pub list: Vec<T>,
    pub next_cursor: Option<i64>,
}

impl<T> CursorPage<T> {
    /// 从多取一条的查询结果构造分页
    ///
    /// `rows` 最多 `limit + 1` 条；第 `limit + 1` 条（若存在）的 id 作为 nextCursor
    pub fn from_overfetch(mut rows: Vec<T>, limit: u32, id_of: impl Fn(&T) -> i64) -> Self {
        let limit = limit as usize;
        let next_cursor = rows.get(limit).map(&id_of);
        rows.truncate(limit);
        Self {
            list: rows,
            next_cursor,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> CursorPage<U> {
        CursorPage {
            list: self.list.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}
