//! エラーケーステスト

use mediscan::error::MediScanError;
use mediscan::report::{load_result, save_result};
use mediscan_common::DetectionResult;
use tempfile::tempdir;

/// MediScanErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        MediScanError::Config("テスト設定エラー".to_string()),
        MediScanError::FileNotFound("chest.png".to_string()),
        MediScanError::AnalysisFailed("Decode error: bad".to_string()),
        MediScanError::Prompt("interrupted".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// common::Errorからの変換（透過的）
#[test]
fn test_common_error_conversion() {
    let common_err = mediscan_common::Error::Decode("unexpected EOF".to_string());
    let err: MediScanError = common_err.into();

    assert!(matches!(err, MediScanError::Common(_)));
    assert_eq!(format!("{}", err), "Decode error: unexpected EOF");
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: MediScanError = io_err.into();
    assert!(matches!(err, MediScanError::Io(_)));
}

/// 壊れた結果JSON
#[test]
fn test_load_invalid_result_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("result.json");
    std::fs::write(&path, "{ invalid }").unwrap();

    let err = load_result(&path).unwrap_err();
    assert!(matches!(err, MediScanError::JsonParse(_)));
}

/// 結果JSONの保存と読み込み
#[test]
fn test_save_and_load_result() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("result.json");
    let result = DetectionResult {
        confidence: 0.83,
        detected_conditions: vec!["Atelectasis".to_string()],
        analysis: "Partial lung collapse".to_string(),
        ..Default::default()
    };

    save_result(&path, &result).expect("保存失敗");
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"detectedConditions\""));

    let loaded = load_result(&path).expect("読込失敗");
    assert_eq!(loaded, result);
}
