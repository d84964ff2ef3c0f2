use anyhow::Context;
use chrono::{Local, Offset};
use clap::Parser;
use shift_snap::core::ImageDecoder;
use shift_snap::utils::error::ErrorSeverity;
use shift_snap::utils::{logger, validation::Validate};
use shift_snap::{
    adapters::select_png_input, CliConfig, EventExporter, LocalStorage, ParserConfig, PngDecoder,
    ScheduleEngine, ScheduleError, SchedulePipeline, ScheduleSession, TesseractRecognizer,
    TracingNotifier,
};

/// 依錯誤嚴重程度決定退出碼
fn exit_with(e: &ScheduleError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.log_json);
    tracing::info!("Starting shift-snap");

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            ParserConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path))?
        }
        None => ParserConfig::default(),
    };
    cli.apply_overrides(&mut config);

    // 沒指定時區就用本機時區解讀截圖上的時間
    if config.calendar.utc_offset_minutes.is_none() {
        let local_offset = Local::now().offset().fix().local_minus_utc() / 60;
        config.calendar.utc_offset_minutes = Some(local_offset);
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }
    if cli.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    let notifier = TracingNotifier;
    let input = match select_png_input(&cli.inputs, &notifier) {
        Ok(path) => path,
        Err(e) => exit_with(&e),
    };

    let bytes = tokio::fs::read(&input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let image = match PngDecoder.decode(&bytes) {
        Ok(image) => image,
        Err(e) => exit_with(&e),
    };
    tracing::info!("🖼️ Loaded {} ({}x{})", input.display(), image.width(), image.height());

    let recognizer = TesseractRecognizer::from_config(&config.ocr);
    let pipeline = SchedulePipeline::new(recognizer, config.clone());
    let engine = ScheduleEngine::new(pipeline, notifier);
    let session = ScheduleSession::new();

    let events = match session.process(&engine, &image).await {
        Ok(events) => events,
        Err(e) => exit_with(&e),
    };

    for event in &events {
        println!("{}: {} - {}", event.title, event.start, event.end);
        println!("  {}", event.url);
    }

    let storage = LocalStorage::new(config.output.path.clone());
    let exporter = EventExporter::new(storage.clone(), config.output.formats.clone());
    match exporter.export(&events).await {
        Ok(written) => {
            for filename in written {
                println!("📁 Output saved to: {}", storage.full_path(&filename));
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
