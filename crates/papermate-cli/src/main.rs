use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use papermate_core::config_file;
use papermate_core::gateway::openai::{DEFAULT_BASE_URL, OpenAiGateway};
use papermate_core::{
    CollisionPolicy, ConversationConfig, ConversationManager, SectionStore, summarize,
};
use papermate_pdf::{SegmenterConfig, SegmenterConfigBuilder, extract_sections, render_markdown};
use papermate_pdf_mupdf::MupdfBackend;

mod output;

use output::ColorMode;

/// Paper analysis companion - summarize academic PDFs and chat about them
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Segment a PDF into sections and print a structured analysis report
    Summarize {
        /// Path to the PDF file to analyze
        pdf_path: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Model API key
        #[arg(long)]
        api_key: Option<String>,

        /// Model identifier (e.g. deepseek-chat)
        #[arg(long)]
        model: Option<String>,

        /// Base URL of an OpenAI-compatible API
        #[arg(long)]
        base_url: Option<String>,

        /// Path to output file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep section files in this directory instead of a temp dir
        #[arg(long)]
        sections_dir: Option<PathBuf>,
    },

    /// Analyze a PDF, then answer questions about it interactively
    Chat {
        /// Path to the PDF file to analyze
        pdf_path: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Model API key
        #[arg(long)]
        api_key: Option<String>,

        /// Model identifier (e.g. deepseek-chat)
        #[arg(long)]
        model: Option<String>,

        /// Base URL of an OpenAI-compatible API
        #[arg(long)]
        base_url: Option<String>,

        /// Keep section files in this directory instead of a temp dir
        #[arg(long)]
        sections_dir: Option<PathBuf>,

        /// Skip the upfront analysis report and go straight to questions
        #[arg(long)]
        no_report: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Summarize {
            pdf_path,
            no_color,
            api_key,
            model,
            base_url,
            output,
            sections_dir,
        } => {
            run_summarize(
                pdf_path,
                no_color,
                api_key,
                model,
                base_url,
                output,
                sections_dir,
            )
            .await
        }
        Command::Chat {
            pdf_path,
            no_color,
            api_key,
            model,
            base_url,
            sections_dir,
            no_report,
        } => {
            run_chat(
                pdf_path,
                no_color,
                api_key,
                model,
                base_url,
                sections_dir,
                no_report,
            )
            .await
        }
    }
}

/// Settings after resolving CLI flags > env vars > config file > defaults.
struct Settings {
    api_key: String,
    model: String,
    base_url: String,
    segmenter: SegmenterConfig,
    conversation: ConversationConfig,
    collision_policy: CollisionPolicy,
}

fn resolve_settings(
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
) -> anyhow::Result<Settings> {
    let file = config_file::load_config();
    let api = file.api.unwrap_or_default();
    let seg = file.segmentation.unwrap_or_default();
    let conv = file.conversation.unwrap_or_default();
    let store = file.store.unwrap_or_default();

    let api_key = api_key
        .or_else(|| std::env::var("PAPERMATE_API_KEY").ok())
        .or(api.api_key)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "no API key configured. Pass --api-key, set PAPERMATE_API_KEY, or add [api] api_key to the config file"
            )
        })?;
    let model = model
        .or_else(|| std::env::var("PAPERMATE_MODEL").ok())
        .or(api.model)
        .unwrap_or_else(|| "deepseek-chat".to_string());
    let base_url = base_url
        .or_else(|| std::env::var("PAPERMATE_BASE_URL").ok())
        .or(api.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let mut segmenter = SegmenterConfigBuilder::new();
    if let Some(offset) = seg.title_size_offset {
        segmenter = segmenter.title_size_offset(offset);
    }
    if let Some(words) = seg.max_title_words {
        segmenter = segmenter.max_title_words(words);
    }
    if let Some(title) = seg.default_title {
        segmenter = segmenter.default_title(title);
    }

    let conversation = ConversationConfig {
        compression_threshold: conv
            .compression_threshold
            .unwrap_or_else(|| ConversationConfig::default().compression_threshold),
    };

    let collision_policy = match store.collision_policy.as_deref() {
        Some("number_suffix") => CollisionPolicy::NumberSuffix,
        _ => CollisionPolicy::Overwrite,
    };

    Ok(Settings {
        api_key,
        model,
        base_url,
        segmenter: segmenter.build(),
        conversation,
        collision_policy,
    })
}

/// Run the extraction pipeline: spans -> sections -> markdown -> section
/// files. Returns the written paths plus the temp dir guard keeping them
/// alive (when no explicit directory was given).
fn prepare_sections(
    pdf_path: &PathBuf,
    sections_dir: Option<PathBuf>,
    settings: &Settings,
) -> anyhow::Result<(Vec<PathBuf>, Option<tempfile::TempDir>)> {
    let backend = MupdfBackend::new();
    let sections = extract_sections(pdf_path, &backend, &settings.segmenter)?;
    let markdown = render_markdown(&sections);

    let (dir, guard) = match sections_dir {
        Some(dir) => (dir, None),
        None => {
            let tmp = tempfile::tempdir()?;
            (tmp.path().to_path_buf(), Some(tmp))
        }
    };

    let store = SectionStore::with_policy(settings.collision_policy);
    let paths = store.split_markdown(&markdown, &dir)?;
    Ok((paths, guard))
}

async fn run_summarize(
    pdf_path: PathBuf,
    no_color: bool,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    output: Option<PathBuf>,
    sections_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let settings = resolve_settings(api_key, model, base_url)?;

    let use_color = !no_color && output.is_none();
    let color = ColorMode(use_color);

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };

    output::print_processing(&mut writer, &pdf_path, color)?;
    let (paths, _guard) = prepare_sections(&pdf_path, sections_dir, &settings)?;
    output::print_section_count(&mut writer, paths.len(), color)?;

    let gateway = OpenAiGateway::with_base_url(
        settings.api_key.clone(),
        settings.model.clone(),
        settings.base_url.clone(),
    );
    let report = summarize(&paths, &gateway).await?;

    output::print_report(&mut writer, &report, color)?;
    Ok(())
}

async fn run_chat(
    pdf_path: PathBuf,
    no_color: bool,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    sections_dir: Option<PathBuf>,
    no_report: bool,
) -> anyhow::Result<()> {
    let settings = resolve_settings(api_key, model, base_url)?;
    let color = ColorMode(!no_color);
    let mut out: Box<dyn Write> = Box::new(std::io::stdout());

    output::print_processing(&mut out, &pdf_path, color)?;
    let (paths, _guard) = prepare_sections(&pdf_path, sections_dir, &settings)?;
    output::print_section_count(&mut out, paths.len(), color)?;

    let gateway = OpenAiGateway::with_base_url(
        settings.api_key.clone(),
        settings.model.clone(),
        settings.base_url.clone(),
    );

    if !no_report {
        let report = summarize(&paths, &gateway).await?;
        output::print_report(&mut out, &report, color)?;
    }

    let manager = ConversationManager::with_config(settings.conversation.clone());
    let mut history = Vec::new();
    let stdin = std::io::stdin();

    output::print_chat_banner(&mut out, color)?;
    loop {
        output::print_question_prompt(&mut out, color)?;
        out.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question == "exit" || question == "quit" {
            break;
        }

        match manager.answer(&history, question, &paths, &gateway).await {
            Ok(answer) => {
                // Commit only on success: the returned history replaces ours.
                history = answer.history;
                output::print_answer(&mut out, &answer.text)?;
            }
            Err(e) => {
                // History stays as it was; the next question retries cleanly.
                output::print_error(&mut out, &e.to_string(), color)?;
            }
        }
    }

    Ok(())
}
