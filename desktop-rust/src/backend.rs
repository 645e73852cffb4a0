use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use futures::executor::block_on;
use mediscan_common::decode::probe_dimensions;
use mediscan_common::{
    analyze_image, AnalysisBackend, AnalysisOptions, AnalysisTicket, DetectionResult, ImageDimensions,
    ImageFile, RngSource,
};

/// ワーカースレッド上で動くバックエンド（待機はスレッドをそのまま止める）
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopBackend;

impl AnalysisBackend for DesktopBackend {
    type File = ImageFile;

    async fn wait(&self, delay: Duration) {
        std::thread::sleep(delay);
    }

    async fn probe_dimensions(&self, file: &ImageFile) -> mediscan_common::Result<ImageDimensions> {
        probe_dimensions(&file.bytes)
    }
}

pub struct AnalysisDone {
    pub ticket: AnalysisTicket,
    pub outcome: mediscan_common::Result<DetectionResult>,
}

/// 解析をワーカースレッドで実行し、結果をチャネルで返す
pub fn spawn_analysis(ticket: AnalysisTicket, file: ImageFile, options: AnalysisOptions) -> Receiver<AnalysisDone> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut rng = RngSource::from_entropy();
        let outcome = block_on(analyze_image(&DesktopBackend, &file, &mut rng, &options));
        let _ = tx.send(AnalysisDone { ticket, outcome });
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Luma};
    use mediscan_common::{Error, LocalUrlRegistry, Session};
    use std::io::Cursor;

    fn png_file() -> ImageFile {
        let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_pixel(64, 48, Luma([128]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        ImageFile::new("chest.png", "image/png", bytes)
    }

    #[test]
    fn test_worker_delivers_result() {
        let mut session = Session::new(LocalUrlRegistry::new());
        session.select_file(png_file()).unwrap();
        let file = session.file().cloned().unwrap();
        let ticket = session.begin_analysis().unwrap();

        let rx = spawn_analysis(ticket, file, AnalysisOptions::with_delay_ms(5));
        let done = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        let result = done.outcome.as_ref().unwrap();
        assert!((1..=2).contains(&result.detected_conditions.len()));

        session.finish_analysis(done.ticket, done.outcome);
        assert!(session.result().is_some());
    }

    #[test]
    fn test_worker_reports_decode_error() {
        let mut session = Session::new(LocalUrlRegistry::new());
        session.select_file(ImageFile::new("broken.png", "image/png", b"nope".to_vec())).unwrap();
        let file = session.file().cloned().unwrap();
        let ticket = session.begin_analysis().unwrap();

        let rx = spawn_analysis(ticket, file, AnalysisOptions::with_delay_ms(0));
        let done = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert!(matches!(done.outcome, Err(Error::Decode(_))));
    }
}
