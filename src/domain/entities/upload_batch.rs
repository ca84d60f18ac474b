//! # UploadBatch Value Object
//!
//! アップロードバッチのバリューオブジェクトと、遅延バッチ分割イテレータ

use std::path::PathBuf;

use super::file_entry::FileEntry;

/// デフォルトのバッチサイズ
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// アップロードバッチ
///
/// 1回のやり取りでまとめて添付するファイル群
#[derive(Debug, Clone)]
pub struct UploadBatch {
    /// 1始まりのバッチ番号
    number: usize,
    /// 全バッチ数
    total: usize,
    files: Vec<FileEntry>,
}

impl UploadBatch {
    /// 新しいアップロードバッチを作成
    ///
    /// # Arguments
    ///
    /// * `number` - 1始まりのバッチ番号
    /// * `total` - 全バッチ数
    /// * `files` - バッチに含まれるファイル
    pub fn new(number: usize, total: usize, files: Vec<FileEntry>) -> Self {
        Self {
            number,
            total,
            files,
        }
    }

    /// バッチ内のファイル数を返す
    #[inline]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// バッチが空かどうかを返す
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[inline]
    pub fn number(&self) -> usize {
        self.number
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// ファイルへの参照を返す
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// ファイルパスのリストを返す
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path().to_path_buf()).collect()
    }

    /// ファイルの所有権を移動して返す
    pub fn into_files(self) -> Vec<FileEntry> {
        self.files
    }
}

impl From<UploadBatch> for Vec<FileEntry> {
    fn from(batch: UploadBatch) -> Self {
        batch.into_files()
    }
}

/// 設定値からバッチサイズを決定
///
/// 未設定・数値でない・0以下の場合は `default` にフォールバックする。
///
/// ```
/// use gemini_uploader::domain::entities::upload_batch::resolve_batch_size;
///
/// assert_eq!(resolve_batch_size(Some("25"), 10), 25);
/// assert_eq!(resolve_batch_size(Some("abc"), 10), 10);
/// assert_eq!(resolve_batch_size(Some("-3"), 10), 10);
/// assert_eq!(resolve_batch_size(None, 10), 10);
/// ```
pub fn resolve_batch_size(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| n as usize)
        .unwrap_or(default)
}

/// 遅延バッチ分割イテレータ
///
/// 入力を消費しながら固定サイズのバッチを順に返す。途中まで消費した
/// イテレータを巻き戻す手段はない。
#[derive(Debug)]
pub struct Batches {
    remaining: std::vec::IntoIter<FileEntry>,
    batch_size: usize,
    total: usize,
    next_number: usize,
}

impl Batches {
    /// # Arguments
    ///
    /// * `files` - 順序付きのファイル
    /// * `batch_size` - バッチサイズ（0 の場合は [`DEFAULT_BATCH_SIZE`]）
    pub fn new(files: Vec<FileEntry>, batch_size: usize) -> Self {
        let batch_size = if batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            batch_size
        };
        let total = files.len().div_ceil(batch_size);

        Self {
            remaining: files.into_iter(),
            batch_size,
            total,
            next_number: 1,
        }
    }

    /// 全バッチ数（`ceil(N / batch_size)`）
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl Iterator for Batches {
    type Item = UploadBatch;

    fn next(&mut self) -> Option<Self::Item> {
        let files: Vec<FileEntry> = self.remaining.by_ref().take(self.batch_size).collect();
        if files.is_empty() {
            return None;
        }

        let batch = UploadBatch::new(self.next_number, self.total, files);
        self.next_number += 1;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total + 1 - self.next_number;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Batches {}
