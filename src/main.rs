//! xpdf - command line front end for the XPDF tool adapters
//!
//! Extracts text, document information and images from PDF files.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xpdf::{Configuration, ImageFormat, OutputMode, PdfImages, PdfInfoReader, PdfToText};

#[derive(Debug, Parser)]
#[command(name = "xpdf", version, author, about)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Process timeout in seconds, 0 to disable
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract text with pdftotext
    Text(TextArgs),
    /// Print document information with pdfinfo
    Info(InfoArgs),
    /// Extract images with pdfimages
    Images(ImagesArgs),
}

#[derive(Debug, Args)]
struct TextArgs {
    /// PDF file
    file: PathBuf,
    #[command(flatten)]
    pages: PageArgs,
    /// Output mode: raw or layout
    #[arg(long, default_value = "raw")]
    mode: OutputMode,
    /// Output encoding
    #[arg(long, default_value = "UTF-8")]
    encoding: String,
}

#[derive(Debug, Args)]
struct InfoArgs {
    /// PDF file
    file: PathBuf,
    /// Print as a JSON object
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct ImagesArgs {
    /// PDF file
    file: PathBuf,
    #[command(flatten)]
    pages: PageArgs,
    /// Image format: jpeg or bitmap
    #[arg(long, default_value = "bitmap")]
    format: ImageFormat,
    /// Directory to write images into (defaults to the temp directory)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct PageArgs {
    /// First page to extract
    #[arg(long)]
    first: Option<u32>,
    /// Last page to extract
    #[arg(long)]
    last: Option<u32>,
    /// Number of pages to extract when --last is not given
    #[arg(long, allow_negative_numbers = true)]
    pages: Option<i64>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(level)
        .init();
}

fn load_config(path: Option<&Path>, timeout: Option<u64>) -> Result<Configuration> {
    let config = match path {
        Some(path) => Configuration::load_from(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Configuration::load().context("Failed to load config")?,
    };

    Ok(match timeout {
        Some(secs) => config.with_timeout(secs),
        None => config,
    })
}

/// Extract text and write it to `out` unchanged, in the requested charset
async fn run_text(config: &Configuration, args: &TextArgs, out: &mut impl Write) -> Result<()> {
    let mut pdftotext = PdfToText::create(config)?;
    pdftotext
        .set_output_mode(args.mode)
        .set_output_encoding(args.encoding.as_str());
    if let Some(quantity) = args.pages.pages {
        pdftotext.set_page_quantity(quantity)?;
    }

    let text = pdftotext
        .get_text_bytes(&args.file, args.pages.first, args.pages.last)
        .await
        .with_context(|| format!("Failed to extract text from {}", args.file.display()))?;
    out.write_all(&text)?;
    Ok(())
}

async fn run_info(config: &Configuration, args: &InfoArgs, out: &mut impl Write) -> Result<()> {
    let mut pdfinfo = PdfInfoReader::create(config)?;
    let info = pdfinfo
        .extract_info(&args.file)
        .await
        .with_context(|| format!("Failed to read info from {}", args.file.display()))?;

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?;
    } else {
        for (key, value) in info.iter() {
            writeln!(out, "{}: {}", key, value)?;
        }
    }
    Ok(())
}

async fn run_images(config: &Configuration, args: &ImagesArgs, out: &mut impl Write) -> Result<()> {
    let mut pdfimages = PdfImages::create(config)?;
    pdfimages.set_output_format(args.format);
    if let Some(dir) = &args.out {
        pdfimages.set_output_dir(dir);
    }
    if let Some(quantity) = args.pages.pages {
        pdfimages.set_page_quantity(quantity)?;
    }

    let images = pdfimages
        .get_images(&args.file, args.pages.first, args.pages.last)
        .await
        .with_context(|| format!("Failed to extract images from {}", args.file.display()))?;
    for image in images {
        writeln!(out, "{}", image.display())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::debug!("Starting {} {}", xpdf::NAME, xpdf::VERSION);

    let config = load_config(cli.config.as_deref(), cli.timeout)?;
    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Command::Text(args) => run_text(&config, args, &mut stdout).await?,
        Command::Info(args) => run_info(&config, args, &mut stdout).await?,
        Command::Images(args) => run_images(&config, args, &mut stdout).await?,
    }

    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_text_command() {
        let cli = Cli::try_parse_from([
            "xpdf", "-vv", "text", "doc.pdf", "--first", "2", "--pages", "3", "--mode", "layout",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Text(args) => {
                assert_eq!(args.file, PathBuf::from("doc.pdf"));
                assert_eq!(args.pages.first, Some(2));
                assert_eq!(args.pages.last, None);
                assert_eq!(args.pages.pages, Some(3));
                assert_eq!(args.mode, OutputMode::Layout);
                assert_eq!(args.encoding, "UTF-8");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["xpdf", "images", "doc.pdf", "--format", "png"]).is_err());
    }

    #[test]
    fn test_timeout_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "timeout": 5 }"#).unwrap();

        let config = load_config(Some(path.as_path()), None).unwrap();
        assert_eq!(config.timeout, Some(5));

        let config = load_config(Some(path.as_path()), Some(0)).unwrap();
        assert_eq!(config.timeout(), None);
    }

    #[cfg(unix)]
    mod run {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use xpdf::Tool;

        fn fake_binary(dir: &Path, name: &str, script: &str) -> PathBuf {
            let path = dir.join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn fake_pdf(dir: &Path) -> String {
            let path = dir.join("doc.pdf");
            std::fs::write(&path, b"%PDF-1.4\n").unwrap();
            path.to_string_lossy().into_owned()
        }

        fn parse(args: &[&str]) -> Command {
            let argv = std::iter::once("xpdf").chain(args.iter().copied());
            Cli::try_parse_from(argv).unwrap().command
        }

        #[tokio::test]
        async fn test_text_passes_pages_and_keeps_bytes() {
            let dir = tempfile::tempdir().unwrap();
            let pdf = fake_pdf(dir.path());
            let binary = fake_binary(
                dir.path(),
                "pdftotext",
                "for last; do :; done\nprintf '%s\\n' \"$@\" > \"$last\"\nprintf 'caf\\351' >> \"$last\"",
            );
            let config = Configuration::default().with_binaries(Tool::PdfToText, [binary]);

            let Command::Text(args) = parse(&[
                "text", pdf.as_str(), "--first", "2", "--pages", "3", "--encoding", "Latin1",
            ]) else {
                panic!("expected text command");
            };
            let mut out = Vec::new();
            run_text(&config, &args, &mut out).await.unwrap();

            let expected_args = format!("-f\n2\n-l\n4\n-raw\n-nopgbrk\n-enc\nLatin1\n-eol\nunix\n{}\n", pdf);
            assert!(out.starts_with(expected_args.as_bytes()));
            assert!(out.ends_with(b"caf\xe9"));
        }

        #[tokio::test]
        async fn test_text_rejects_negative_pages() {
            let dir = tempfile::tempdir().unwrap();
            let pdf = fake_pdf(dir.path());
            let binary = fake_binary(dir.path(), "pdftotext", "exit 0");
            let config = Configuration::default().with_binaries(Tool::PdfToText, [binary]);

            let Command::Text(args) = parse(&["text", pdf.as_str(), "--pages", "-1"]) else {
                panic!("expected text command");
            };
            assert_eq!(args.pages.pages, Some(-1));

            let err = run_text(&config, &args, &mut Vec::new()).await.unwrap_err();
            assert_eq!(err.to_string(), "Page quantity must be a positive value");
        }

        #[tokio::test]
        async fn test_info_plain_and_json() {
            let dir = tempfile::tempdir().unwrap();
            let pdf = fake_pdf(dir.path());
            let binary = fake_binary(
                dir.path(),
                "pdfinfo",
                "printf 'Title:          Report\\nPages:          2\\n'",
            );
            let config = Configuration::default().with_binaries(Tool::PdfInfo, [binary]);

            let Command::Info(args) = parse(&["info", pdf.as_str()]) else {
                panic!("expected info command");
            };
            let mut out = Vec::new();
            run_info(&config, &args, &mut out).await.unwrap();
            assert_eq!(String::from_utf8(out).unwrap(), "Title: Report\nPages: 2\n");

            let Command::Info(args) = parse(&["info", pdf.as_str(), "--json"]) else {
                panic!("expected info command");
            };
            let mut out = Vec::new();
            run_info(&config, &args, &mut out).await.unwrap();
            let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
            assert_eq!(json, serde_json::json!({ "Title": "Report", "Pages": "2" }));
        }

        #[tokio::test]
        async fn test_images_prints_one_path_per_line() {
            let dir = tempfile::tempdir().unwrap();
            let pdf = fake_pdf(dir.path());
            let binary = fake_binary(
                dir.path(),
                "pdfimages",
                "for last; do :; done\n: > \"$last-000.ppm\"\n: > \"$last-001.jpg\"",
            );
            let config = Configuration::default().with_binaries(Tool::PdfImages, [binary]);
            let out_dir = dir.path().join("images");

            let Command::Images(args) = parse(&[
                "images",
                pdf.as_str(),
                "--format",
                "jpeg",
                "--out",
                out_dir.to_str().unwrap(),
            ]) else {
                panic!("expected images command");
            };
            let mut out = Vec::new();
            run_images(&config, &args, &mut out).await.unwrap();

            let printed = String::from_utf8(out).unwrap();
            let lines: Vec<_> = printed.lines().collect();
            assert_eq!(lines.len(), 2);
            for line in lines {
                let path = Path::new(line);
                assert!(path.exists());
                assert_eq!(path.parent(), Some(out_dir.as_path()));
            }
        }

        #[tokio::test]
        async fn test_timeout_reaches_process() {
            let dir = tempfile::tempdir().unwrap();
            let pdf = fake_pdf(dir.path());
            let binary = fake_binary(dir.path(), "pdfinfo", "sleep 5");
            let path = dir.path().join("config.json");
            Configuration::default()
                .with_binaries(Tool::PdfInfo, [binary])
                .save_to(&path)
                .unwrap();
            let config = load_config(Some(path.as_path()), Some(1)).unwrap();

            let Command::Info(args) = parse(&["info", pdf.as_str()]) else {
                panic!("expected info command");
            };
            let err = run_info(&config, &args, &mut Vec::new()).await.unwrap_err();
            assert!(err.chain().any(|e| e.to_string().contains("timed out after 1s")));
        }
    }
}
