use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediscan")]
#[command(about = "胸部X線画像の模擬AI解析ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// X線画像を解析してレポートを表示
    Analyze {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 解析結果のJSON出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// レポートの代わりにJSONを標準出力へ
        #[arg(long)]
        json: bool,

        /// 乱数シード（結果を再現する）
        #[arg(long)]
        seed: Option<u64>,

        /// 擬似推論時間（ミリ秒、設定値を上書き）
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// 保存済みの解析結果JSONをレポート表示
    Report {
        /// 解析結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,
    },

    /// 対話モード（解析 → レポート → 次の画像）
    Session {
        /// 擬似推論時間（ミリ秒、設定値を上書き）
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// 設定管理
    Config {
        /// 擬似推論時間を設定（ミリ秒）
        #[arg(long)]
        set_delay_ms: Option<u64>,

        /// 解析結果の既定出力先を設定
        #[arg(long)]
        set_output_dir: Option<PathBuf>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from(["mediscan", "analyze", "sample.png", "--seed", "7", "--json"]).unwrap();
        match cli.command {
            Commands::Analyze { image, seed, json, output, delay_ms } => {
                assert_eq!(image, PathBuf::from("sample.png"));
                assert_eq!(seed, Some(7));
                assert!(json);
                assert!(output.is_none());
                assert!(delay_ms.is_none());
            }
            _ => panic!("analyze として解釈されるべき"),
        }
    }

    #[test]
    fn test_parse_global_verbose() {
        let cli = Cli::try_parse_from(["mediscan", "report", "result.json", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_analyze_requires_image() {
        assert!(Cli::try_parse_from(["mediscan", "analyze"]).is_err());
    }
}
