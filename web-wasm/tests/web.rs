//! ブラウザ上のテスト（wasm-pack test --headless --firefox）

#![cfg(target_arch = "wasm32")]

use mediscan_common::{Error, ObjectUrl, RandomSource, UploadCollector};
use mediscan_wasm::analysis::{load_dimensions, BrowserFile, BrowserUrls, MathRandom};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn file(name: &str, media_type: &str) -> BrowserFile {
    let parts = js_sys::Array::of1(&JsValue::from_str("not really an image"));
    let options = web_sys::FilePropertyBag::new();
    options.set_type(media_type);
    let file = web_sys::File::new_with_str_sequence_and_options(&parts, name, &options)
        .expect("File作成失敗");
    BrowserFile(file)
}

#[wasm_bindgen_test]
fn test_collector_ignores_non_image() {
    let collector = UploadCollector::new();
    assert!(collector.offer(file("document.pdf", "application/pdf")).is_none());
    assert!(collector.offer(file("chest.png", "image/png")).is_some());
}

#[wasm_bindgen_test]
fn test_object_url_is_blob_url() {
    let url = ObjectUrl::create(&BrowserUrls, &file("chest.png", "image/png")).expect("URL作成失敗");
    assert!(url.as_str().starts_with("blob:"));
}

#[wasm_bindgen_test]
async fn test_undecodable_image_is_decode_error() {
    let url = ObjectUrl::create(&BrowserUrls, &file("chest.png", "image/png")).expect("URL作成失敗");
    let result = load_dimensions(url.as_str()).await;
    assert!(matches!(result, Err(Error::Decode(_))));
}

#[wasm_bindgen_test]
fn test_math_random_unit_interval() {
    let mut rng = MathRandom;
    for _ in 0..100 {
        let v = rng.next_unit();
        assert!((0.0..1.0).contains(&v));
    }
}
