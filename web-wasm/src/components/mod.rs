pub mod analysis_report;
pub mod header;
pub mod image_uploader;
pub mod xray_viewer;
