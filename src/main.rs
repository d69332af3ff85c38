use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::Level;

use page_translator::env::{core as core_env, EnvVar};
use page_translator::translation::{
    ConfigManager, LanguageEvent, PageTranslator, TranslationError, TranslationResult,
    SUPPORTED_LANGUAGES,
};
use page_translator::{translate_document, DocumentOptions};

#[derive(Parser, Debug)]
#[command(name = "page-translator")]
#[command(version)]
#[command(about = "Translate an HTML page in place and remember the chosen language")]
struct Cli {
    /// HTML file to translate, or "-" to read from stdin
    #[arg(value_name = "INPUT", required_unless_present = "list_languages")]
    input: Option<String>,

    /// Target language code (defaults to the stored preference)
    #[arg(short, long, value_name = "CODE")]
    lang: Option<String>,

    /// Write the result to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Input charset (sniffed from the document when omitted)
    #[arg(short, long, value_name = "CHARSET")]
    encoding: Option<String>,

    /// Do not inject the language selector UI
    #[arg(long)]
    no_selector: bool,

    /// Print the supported languages and exit
    #[arg(long)]
    list_languages: bool,

    /// Suppress notifications and logging
    #[arg(short, long)]
    silent: bool,

    /// Verbose logging
    #[arg(short, long, conflicts_with = "silent")]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if cli.list_languages {
        for lang in SUPPORTED_LANGUAGES {
            println!("{}\t{}\t{}", lang.code, lang.display_name, lang.native_name);
        }
        return;
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(&cli)) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.silent {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        match core_env::LogLevel::get().as_deref() {
            Ok("trace") => Level::TRACE,
            Ok("debug") => Level::DEBUG,
            Ok("warn") => Level::WARN,
            Ok("error") => Level::ERROR,
            _ => Level::INFO,
        }
    };

    let no_color = core_env::NoColor::get().unwrap_or(false);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(!no_color)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: &Cli) -> TranslationResult<()> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::from_path(path)?,
        None => ConfigManager::new()?,
    };
    let translator = PageTranslator::from_config(manager.get_config())?;
    let mut events = translator.subscribe();

    let input = match cli.input.as_deref() {
        Some(path) => read_input(path)?,
        None => return Err(TranslationError::InvalidInput("缺少输入文件".to_string())),
    };

    let options = DocumentOptions {
        encoding: cli.encoding.clone(),
        target_language: cli.lang.clone(),
        inject_selector: !cli.no_selector,
    };

    let result = translate_document(&translator, &input, &options).await;

    if !cli.silent {
        while let Ok(event) = events.try_recv() {
            if let Some(message) = event.message() {
                eprintln!("{}", message);
            } else if let LanguageEvent::LanguageChanged { language } = &event {
                tracing::debug!("languageChanged: {}", language);
            }
        }
    }

    let outcome = result?;
    tracing::debug!("统计: {:?}", translator.stats());

    // 翻译失败时页面保持原文，仍然输出，然后以失败退出
    match &cli.output {
        Some(path) => fs::write(path, &outcome.data)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&outcome.data)?;
            stdout.flush()?;
        }
    }

    match outcome.failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn read_input(path: &str) -> TranslationResult<Vec<u8>> {
    if path == "-" {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        return Ok(data);
    }

    fs::read(path).map_err(|e| {
        TranslationError::InvalidInput(format!("无法读取输入文件: {}", e)).with_context(path)
    })
}
