use clap::Parser;
use dialoguer::{Confirm, Input};
use mediscan::analyzer::{analyze_selected, CliSession};
use mediscan::cli::{Cli, Commands};
use mediscan::config::Config;
use mediscan::error::{MediScanError, Result};
use mediscan::{report, upload};
use mediscan_common::{AnalysisOptions, Completion, LocalUrlRegistry, RngSource, Session};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { image, output, json, seed, delay_ms } => {
            if !json {
                println!("🩻 MediScan AI - X-ray analysis\n");
            }

            let mut collector = upload::cli_collector();
            let mut session: CliSession = Session::new(LocalUrlRegistry::new());

            // 1. 受付
            if !json {
                println!("[1/3] Loading image...");
            }
            let Some(file) = upload::collect(&image, &mut collector)? else {
                return Ok(());
            };
            let file_name = file.name.clone();
            session.select_file(file)?;
            if !json {
                println!("✔ {} accepted\n", file_name);
            }

            // 2. 解析
            if !json {
                println!("[2/3] Analyzing...");
            }
            let options = AnalysisOptions::with_delay_ms(delay_ms.unwrap_or_else(|| config.effective_delay_ms()));
            let mut rng = match seed {
                Some(seed) => RngSource::seeded(seed),
                None => RngSource::from_entropy(),
            };
            match analyze_selected(&mut session, &mut rng, &options, !json).await {
                Some(Completion::Stored) => {}
                Some(Completion::Failed(message)) => {
                    return Err(MediScanError::AnalysisFailed(message));
                }
                _ => return Ok(()),
            }
            let Some(result) = session.result() else {
                return Ok(());
            };

            // 3. 出力
            if json {
                println!("{}", serde_json::to_string_pretty(result)?);
            } else {
                println!("✔ Analysis complete\n");
                println!("[3/3] Report\n");
                println!("{}", report::render_report(&file_name, result));
            }

            if let Some(path) = resolve_output(output, &config, &image) {
                report::save_result(&path, result)?;
                if !json {
                    println!("✔ Result saved: {}", path.display());
                }
            }
        }

        Commands::Report { input } => {
            let result = report::load_result(&input)?;
            println!("{}", report::render_report(&input.display().to_string(), &result));
        }

        Commands::Session { delay_ms } => {
            let options = AnalysisOptions::with_delay_ms(delay_ms.unwrap_or_else(|| config.effective_delay_ms()));
            run_interactive(&options).await?;
        }

        Commands::Config { set_delay_ms, set_output_dir, show } => {
            let mut config = config;

            if let Some(delay) = set_delay_ms {
                config.set_delay_ms(delay)?;
                println!("✔ Analysis delay set to {} ms", delay);
            }

            if let Some(dir) = set_output_dir {
                config.set_output_dir(dir)?;
                println!("✔ Output directory saved");
            }

            if show {
                println!("Settings:");
                println!("  Analysis delay: {} ms", config.effective_delay_ms());
                println!(
                    "  Output directory: {}",
                    config
                        .output_dir
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "(not set)".to_string())
                );
                println!("  Config file: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// --output 指定、なければ設定の出力先に `<画像名>.result.json`
fn resolve_output(output: Option<PathBuf>, config: &Config, image: &Path) -> Option<PathBuf> {
    if output.is_some() {
        return output;
    }
    let dir = config.output_dir.as_ref()?;
    let stem = image
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("result");
    Some(dir.join(format!("{stem}.result.json")))
}

/// 対話モード: 画像パスを受け取り、解析・表示・リセットを繰り返す
async fn run_interactive(options: &AnalysisOptions) -> Result<()> {
    println!("🩻 MediScan AI - interactive session");
    println!("   {}\n", mediscan_common::upload::ADVISORY_FORMATS);

    let mut collector = upload::cli_collector();
    let mut session: CliSession = Session::new(LocalUrlRegistry::new());
    let mut rng = RngSource::from_entropy();

    loop {
        let path: String = Input::new()
            .with_prompt("Chest X-ray image path")
            .interact_text()?;
        let path = PathBuf::from(path.trim());

        match upload::collect(&path, &mut collector) {
            Ok(Some(file)) => {
                let name = file.name.clone();
                session.select_file(file)?;
                println!("✔ {} selected", name);
            }
            Ok(None) => continue,
            Err(err) => {
                eprintln!("✘ {}", err);
                continue;
            }
        }

        match analyze_selected(&mut session, &mut rng, options, true).await {
            Some(Completion::Stored) => {
                if let Some(result) = session.result() {
                    println!("\n{}", report::render_report(&path.display().to_string(), result));
                }
            }
            Some(Completion::Failed(message)) => {
                // ファイル選択済みのまま。次の入力で置き換える
                eprintln!("✘ Analysis failed: {}", message);
                continue;
            }
            _ => {}
        }

        let again = Confirm::new()
            .with_prompt("Analyze another X-ray?")
            .default(true)
            .interact()?;

        session.reset();
        collector.clear_preview();
        if !again {
            break;
        }
    }

    Ok(())
}
