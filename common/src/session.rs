//! 解析セッション（アップロード → 解析 → 表示 → リセット）
//!
//! 選択中のファイル・表示用のオブジェクトURL・解析結果・解析中フラグを1か所で持つ。
//! オブジェクトURLは `ObjectUrl` が所有し、置き換え・リセット・破棄のどの経路でも
//! ちょうど1回だけ解放される。

use crate::error::Result;
use crate::types::{DetectionResult, ImageFile};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// オブジェクトURLの発行と解放
pub trait ObjectUrlProvider: Clone {
    type File;

    fn create(&self, file: &Self::File) -> Result<String>;

    fn revoke(&self, url: &str);
}

/// 発行済みURL。Dropで解放する
pub struct ObjectUrl<P: ObjectUrlProvider> {
    url: String,
    provider: P,
}

impl<P: ObjectUrlProvider> ObjectUrl<P> {
    pub fn create(provider: &P, file: &P::File) -> Result<Self> {
        let url = provider.create(file)?;
        tracing::debug!(%url, "object URL created");
        Ok(Self {
            url,
            provider: provider.clone(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl<P: ObjectUrlProvider> Drop for ObjectUrl<P> {
    fn drop(&mut self) {
        tracing::debug!(url = %self.url, "object URL revoked");
        self.provider.revoke(&self.url);
    }
}

impl<P: ObjectUrlProvider> fmt::Debug for ObjectUrl<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectUrl").field(&self.url).finish()
    }
}

/// ネイティブ環境用のURL台帳
///
/// `blob:mediscan/<n>` 形式のURLを発行し、未解放のURLを追跡する。
#[derive(Debug, Clone, Default)]
pub struct LocalUrlRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    live: HashMap<String, String>,
    released: usize,
    double_released: usize,
}

impl LocalUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 未解放のURL数
    pub fn live_count(&self) -> usize {
        self.inner.borrow().live.len()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.inner.borrow().live.contains_key(url)
    }

    /// 発行元のファイル名
    pub fn file_name(&self, url: &str) -> Option<String> {
        self.inner.borrow().live.get(url).cloned()
    }

    pub fn released_count(&self) -> usize {
        self.inner.borrow().released
    }

    /// 解放済みURLを再度解放しようとした回数
    pub fn double_released_count(&self) -> usize {
        self.inner.borrow().double_released
    }
}

impl ObjectUrlProvider for LocalUrlRegistry {
    type File = ImageFile;

    fn create(&self, file: &ImageFile) -> Result<String> {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let url = format!("blob:mediscan/{}", inner.next_id);
        inner.live.insert(url.clone(), file.name.clone());
        Ok(url)
    }

    fn revoke(&self, url: &str) {
        let mut inner = self.inner.borrow_mut();
        if inner.live.remove(url).is_some() {
            inner.released += 1;
        } else {
            inner.double_released += 1;
            tracing::warn!(%url, "object URL released twice");
        }
    }
}

/// セッションの段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FileSelected,
    Analyzing,
    Complete,
}

/// 解析開始時に払い出す引換券
///
/// リセット後に届いた古い結果を捨てるために世代番号を持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket {
    generation: u64,
}

/// 解析完了の扱い
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// 結果を保持した
    Stored,
    /// 失敗した（ファイル選択済みの状態に戻る）
    Failed(String),
    /// リセット済みのため結果を捨てた
    Discarded,
}

/// 解析セッション
pub struct Session<P: ObjectUrlProvider> {
    provider: P,
    file: Option<P::File>,
    image_url: Option<ObjectUrl<P>>,
    result: Option<DetectionResult>,
    analyzing: bool,
    generation: u64,
}

impl<P: ObjectUrlProvider> Session<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            file: None,
            image_url: None,
            result: None,
            analyzing: false,
            generation: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.analyzing {
            Phase::Analyzing
        } else if self.result.is_some() {
            Phase::Complete
        } else if self.file.is_some() {
            Phase::FileSelected
        } else {
            Phase::Idle
        }
    }

    pub fn file(&self) -> Option<&P::File> {
        self.file.as_ref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_ref().map(|u| u.as_str())
    }

    pub fn result(&self) -> Option<&DetectionResult> {
        self.result.as_ref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    /// 解析ボタンを出せるか
    pub fn can_analyze(&self) -> bool {
        self.file.is_some() && !self.analyzing && self.result.is_none()
    }

    /// ファイルを選択する
    ///
    /// 解析中は受け付けず `Ok(false)` を返す。新しいURLの発行に失敗した場合は状態を変えない。
    /// 以前のURLは新しいURLに置き換えた時点で解放される。
    pub fn select_file(&mut self, file: P::File) -> Result<bool> {
        if self.analyzing {
            tracing::debug!("file selection ignored while analyzing");
            return Ok(false);
        }

        let url = ObjectUrl::create(&self.provider, &file)?;
        self.image_url = Some(url);
        self.file = Some(file);
        self.result = None;
        Ok(true)
    }

    /// 解析を開始する。開始できない状態では None
    pub fn begin_analysis(&mut self) -> Option<AnalysisTicket> {
        if !self.can_analyze() {
            return None;
        }
        self.analyzing = true;
        Some(AnalysisTicket {
            generation: self.generation,
        })
    }

    /// 解析結果を受け取る
    pub fn finish_analysis(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<DetectionResult>,
    ) -> Completion {
        if ticket.generation != self.generation {
            tracing::debug!("stale analysis result discarded");
            return Completion::Discarded;
        }

        self.analyzing = false;
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                Completion::Stored
            }
            Err(err) => {
                tracing::error!("Analysis failed: {}", err);
                Completion::Failed(err.to_string())
            }
        }
    }

    /// 初期状態に戻す。URLを先に解放してから状態を消す
    pub fn reset(&mut self) {
        drop(self.image_url.take());
        self.file = None;
        self.result = None;
        self.analyzing = false;
        self.generation += 1;
    }
}

impl<P: ObjectUrlProvider> fmt::Debug for Session<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase())
            .field("image_url", &self.image_url())
            .field("generation", &self.generation)
            .finish()
    }
}
