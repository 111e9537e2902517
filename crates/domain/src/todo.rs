use crate::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Todo の識別子（ULID）
///
/// 作成時にサーバ側で採番され、以後変更されない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Ulid);

impl TodoId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// パスパラメータなどの外部入力から識別子を解釈する
    /// 前後の空白は無視し、大文字小文字は区別しない
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        Ulid::from_string(&trimmed.to_ascii_uppercase())
            .map(Self)
            .map_err(|_| DomainError::InvalidTodoId(trimmed.to_string()))
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// 空白以外の文字を少なくとも 1 文字含むタイトル
///
/// 値は入力されたまま保持する（トリムは検証にのみ使う）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(DomainError::TitleRequired);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Title {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 永続化される Todo アイテム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub title: Title,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    /// 新規作成（未完了・現在時刻で作成）
    pub fn new(title: Title) -> Self {
        Self {
            id: TodoId::new(),
            title,
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// 更新内容を適用する。値が変化した場合のみ true を返す
    pub fn apply(&mut self, update: &TodoUpdate) -> bool {
        if self.title == update.title && self.completed == update.completed {
            return false;
        }
        self.title = update.title.clone();
        self.completed = update.completed;
        true
    }
}

/// 更新リクエストの検証済み内容（タイトルと完了フラグの両方を置き換える）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub title: Title,
    pub completed: bool,
}

impl TodoUpdate {
    /// 欠落したフィールドはゼロ値で補わず、エラーとして扱う
    pub fn from_parts(title: Option<String>, completed: Option<bool>) -> Result<Self, DomainError> {
        let title = Title::new(title.ok_or(DomainError::TitleRequired)?)?;
        let completed = completed.ok_or(DomainError::CompletedRequired)?;
        Ok(Self { title, completed })
    }
}
