use clap::Parser;
use titanic_predictor::utils::{logger, validation::Validate};
use titanic_predictor::{
    run_server, Cli, Command, LocalStorage, PredictorError, TrainingEngine, TrainingPipeline,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Train(args) => {
            logger::init_cli_logger(args.verbose);
            train(args).await
        }
        Command::Serve(args) => match args.resolve() {
            Ok((config, log_json)) => {
                if log_json {
                    logger::init_json_logger(args.verbose);
                } else {
                    logger::init_cli_logger(args.verbose);
                }
                tracing::info!("Starting titanic-predictor service");
                tracing::debug!("Server config: {:?}", config);
                run_server(config).await
            }
            Err(e) => {
                logger::init_cli_logger(args.verbose);
                Err(e)
            }
        },
    };

    if let Err(e) = result {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn train(args: titanic_predictor::config::cli::TrainArgs) -> Result<(), PredictorError> {
    let config = args.resolve()?;
    tracing::debug!("Training config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e);
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let monitor_enabled = config.monitor;
    let pipeline = TrainingPipeline::new(LocalStorage::default(), config);
    let engine = TrainingEngine::new_with_monitoring(pipeline, monitor_enabled);

    let report = engine.run().await?;
    tracing::info!("✅ Training completed successfully!");
    println!("✅ Training completed successfully!");
    println!("📁 Artifact saved to: {}", report.artifact_path);
    println!(
        "📊 rows={} survived={} training_accuracy={:.3} oob_accuracy={}",
        report.rows,
        report.positives,
        report.training_accuracy,
        report
            .oob_accuracy
            .map(|a| format!("{:.3}", a))
            .unwrap_or_else(|| "n/a".to_string())
    );
    Ok(())
}
