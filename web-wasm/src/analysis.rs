//! ブラウザ上の模擬解析
//!
//! 待ち時間は gloo のタイマー、画像の寸法は `<img>` の読み込みで取得する。

use futures::channel::oneshot;
use gloo::timers::future::TimeoutFuture;
use mediscan_common::{
    AnalysisBackend, Error, ImageDimensions, ObjectUrl, ObjectUrlProvider, RandomSource, Result,
    UploadFile,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlImageElement};

/// 選択されたブラウザのファイル
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserFile(pub web_sys::File);

impl UploadFile for BrowserFile {
    fn file_name(&self) -> String {
        self.0.name()
    }

    fn media_type(&self) -> String {
        self.0.type_()
    }
}

/// `URL.createObjectURL` / `URL.revokeObjectURL`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserUrls;

impl ObjectUrlProvider for BrowserUrls {
    type File = BrowserFile;

    fn create(&self, file: &BrowserFile) -> Result<String> {
        web_sys::Url::create_object_url_with_blob(&file.0).map_err(|e| Error::ObjectUrl(js_error(&e)))
    }

    fn revoke(&self, url: &str) {
        if let Err(e) = web_sys::Url::revoke_object_url(url) {
            web_sys::console::warn_1(&format!("revokeObjectURL failed: {}", js_error(&e)).into());
        }
    }
}

/// `Math.random` による乱数
#[derive(Debug, Clone, Copy, Default)]
pub struct MathRandom;

impl RandomSource for MathRandom {
    fn next_unit(&mut self) -> f64 {
        js_sys::Math::random()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserBackend;

impl AnalysisBackend for BrowserBackend {
    type File = BrowserFile;

    async fn wait(&self, delay: Duration) {
        let ms = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(ms).await;
    }

    async fn probe_dimensions(&self, file: &BrowserFile) -> Result<ImageDimensions> {
        // 寸法取得用の一時URL（読み込み後、成否に関わらず解放）
        let url = ObjectUrl::create(&BrowserUrls, file)?;
        load_dimensions(url.as_str()).await
    }
}

/// `<img>` に読み込ませて naturalWidth / naturalHeight を得る
pub async fn load_dimensions(src: &str) -> Result<ImageDimensions> {
    let img = HtmlImageElement::new().map_err(|e| Error::Decode(js_error(&e)))?;

    let (tx, rx) = oneshot::channel::<bool>();
    let tx = Rc::new(RefCell::new(Some(tx)));
    let notify = |loaded: bool| {
        let tx = tx.clone();
        Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(loaded);
            }
        })
    };
    let on_load = notify(true);
    let on_error = notify(false);

    img.set_onload(Some(on_load.as_ref().unchecked_ref()));
    img.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    img.set_src(src);

    let loaded = rx.await.unwrap_or(false);
    img.set_onload(None);
    img.set_onerror(None);

    if !loaded {
        return Err(Error::Decode("the selected file could not be loaded as an image".to_string()));
    }

    Ok(ImageDimensions {
        width: img.natural_width(),
        height: img.natural_height(),
    })
}

pub fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
