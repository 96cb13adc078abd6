//! CLI binary for wiki-publish.
//!
//! A thin shim over the library crate that maps CLI flags (or GitHub Action
//! inputs) to `PublishConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wiki_publish::{
    publish, LinkMode, ProgressCallback, PublishConfig, PublishProgressCallback,
    WikiPublishError,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a bar over all discovered files plus one log
/// line per failed file.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>4}/{len} files  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        bar.set_style(style);
        bar.set_prefix("Publishing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl PublishProgressCallback for CliProgressCallback {
    fn on_publish_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
    }

    fn on_file_start(&self, path: &Path) {
        self.bar.set_message(path.display().to_string());
    }

    fn on_file_complete(&self, _path: &Path, _links_rewritten: usize) {
        self.bar.inc(1);
    }

    fn on_file_error(&self, path: &Path, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} {}  {}",
            red("✗"),
            path.display(),
            red(error)
        ));
        self.bar.inc(1);
    }

    fn on_publish_complete(&self, total_files: usize, success_count: usize) {
        self.bar.finish_and_clear();
        let failed = self.errors.load(Ordering::SeqCst);
        if failed == 0 {
            eprintln!(
                "{} {} files copied into the wiki checkout",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files copied  ({} failed)",
                yellow("⚠"),
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string())
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Inside a GitHub Actions workflow (inputs arrive as INPUT_* variables)
  wiki-publish --docs-folder docs --github-token "$GITHUB_TOKEN"

  # Local dry run: mirror into ./wiki-out without touching git
  wiki-publish --docs-folder docs --wiki-dir wiki-out --no-clone --no-commit --no-push

  # Strip root-anchored links instead of joining folder prefixes
  wiki-publish --docs-folder docs --link-mode strip --repository octo/project

  # Rewrite one document and print it (no files written)
  wiki-publish --rewrite docs/guide/setup.md --context guide
  cat page.md | wiki-publish --rewrite - --context docs --link-mode strip

LINK MODES:
  join    prefix local image targets with the page's folder below the docs
          folder (images/a.png in docs/guide/ → guide/images/a.png)
  strip   remove the docs folder from root-anchored or docs-prefixed targets
          (/docs/guide/a.png → guide/a.png); ./ and ../ targets are kept
  In both modes targets starting with "http" are left untouched.

ENVIRONMENT VARIABLES:
  INPUT_DOCS-FOLDER       Docs folder (GitHub Action input)
  INPUT_GITHUB-TOKEN      Access token (GitHub Action input)
  GITHUB_REPOSITORY       owner/repo, set by GitHub Actions
  GITHUB_SERVER_URL       Git host, set by GitHub Actions
  GITHUB_ACTIONS          When "true", failures are also emitted as ::error:: annotations
  RUST_LOG                Override the log filter
"#;

/// Publish a docs folder to a GitHub wiki, rewriting image links.
#[derive(Parser, Debug)]
#[command(
    name = "wiki-publish",
    version,
    about = "Publish a docs folder to a GitHub wiki, rewriting Markdown image links",
    long_about = "Clone the repository wiki, mirror the Markdown pages and images of a docs \
folder into it with image links adjusted for the wiki layout, then commit and push.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Folder containing the Markdown documentation.
    #[arg(long, env = "INPUT_DOCS-FOLDER", required_unless_present = "rewrite")]
    docs_folder: Option<PathBuf>,

    /// Token used to clone and push the wiki.
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Source repository as owner/repo.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Git host base URL.
    #[arg(long, env = "GITHUB_SERVER_URL", default_value = "https://github.com")]
    server_url: String,

    /// Explicit wiki remote (URL or path); overrides --repository.
    #[arg(long, env = "WIKI_PUBLISH_URL")]
    wiki_url: Option<String>,

    /// Directory of the wiki checkout.
    #[arg(long, env = "WIKI_PUBLISH_DIR", default_value = "wiki-repo")]
    wiki_dir: PathBuf,

    /// How image links are rewritten: join or strip.
    #[arg(long, env = "WIKI_PUBLISH_LINK_MODE", value_enum, default_value = "join")]
    link_mode: LinkModeArg,

    /// Image extensions to copy (comma separated).
    #[arg(
        long,
        env = "WIKI_PUBLISH_IMAGE_EXTENSIONS",
        value_delimiter = ',',
        default_value = "png,jpg,jpeg,gif,svg"
    )]
    image_extensions: Vec<String>,

    /// Commit message.
    #[arg(short, long, env = "WIKI_PUBLISH_MESSAGE", default_value = "Update wiki content")]
    message: String,

    /// Committer name.
    #[arg(long, env = "WIKI_PUBLISH_AUTHOR_NAME", default_value = "GitHub Action")]
    author_name: String,

    /// Committer email.
    #[arg(long, env = "WIKI_PUBLISH_AUTHOR_EMAIL", default_value = "action@github.com")]
    author_email: String,

    /// Number of files copied at once.
    #[arg(short, long, env = "WIKI_PUBLISH_CONCURRENCY", default_value_t = 8)]
    concurrency: usize,

    /// Do not clone; write into --wiki-dir as is.
    #[arg(long)]
    no_clone: bool,

    /// Do not commit (implies --no-push).
    #[arg(long)]
    no_commit: bool,

    /// Commit but do not push.
    #[arg(long)]
    no_push: bool,

    /// Rewrite a single Markdown file ("-" for stdin) and print it.
    #[arg(long, value_name = "FILE")]
    rewrite: Option<PathBuf>,

    /// Context path for --rewrite.
    #[arg(long, default_value = "")]
    context: String,

    /// Output the publish result as JSON.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LinkModeArg {
    Join,
    Strip,
}

impl From<LinkModeArg> for LinkMode {
    fn from(v: LinkModeArg) -> Self {
        match v {
            LinkModeArg::Join => LinkMode::Join,
            LinkModeArg::Strip => LinkMode::Strip,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        report_failure(&err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && cli.rewrite.is_none();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Rewrite-only mode ────────────────────────────────────────────────
    if let Some(ref path) = cli.rewrite {
        let document = read_document(path)?;
        let mode: LinkMode = cli.link_mode.into();
        let rewritten = mode.apply(&document, &cli.context);
        io::stdout()
            .lock()
            .write_all(rewritten.content.as_bytes())
            .context("Failed to write to stdout")?;
        if !cli.quiet {
            eprintln!("{}", dim(&format!("{} image link(s) rewritten", rewritten.rewritten)));
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn PublishProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run publish ──────────────────────────────────────────────────────
    let output = match publish(&config).await {
        Ok(output) => output,
        Err(e) if e.is_no_changes() => {
            if !cli.quiet {
                eprintln!("{} {}", yellow("⚠"), e);
            }
            if cli.json {
                println!("{}", serde_json::json!({ "changed": false, "message": e.to_string() }));
            }
            return Ok(());
        }
        Err(e) => return Err(e).context("Publish failed"),
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize output")?
        );
    } else if !cli.quiet {
        let stats = &output.stats;
        eprintln!(
            "Published {} pages and {} images ({} links rewritten) in {}ms",
            stats.markdown_files, stats.image_files, stats.links_rewritten, stats.total_duration_ms
        );
        if stats.failed_files > 0 {
            eprintln!("  {} files failed", red(&stats.failed_files.to_string()));
        }
        if let Some(ref commit) = stats.commit {
            eprintln!(
                "  commit {}{}",
                bold(commit),
                if stats.pushed { " pushed" } else { " (not pushed)" }
            );
        }
    }

    Ok(())
}

/// Map CLI args to `PublishConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PublishConfig> {
    let docs_folder = cli
        .docs_folder
        .clone()
        .context("--docs-folder is required")?;

    let commit = !cli.no_commit;
    let mut builder = PublishConfig::builder()
        .docs_folder(docs_folder)
        .wiki_dir(&cli.wiki_dir)
        .server_url(&cli.server_url)
        .link_mode(cli.link_mode.into())
        .image_extensions(
            cli.image_extensions
                .iter()
                .map(|e| e.trim())
                .filter(|e| !e.is_empty()),
        )
        .commit_message(&cli.message)
        .author(&cli.author_name, &cli.author_email)
        .concurrency(cli.concurrency)
        .clone_wiki(!cli.no_clone)
        .commit(commit)
        .push(commit && !cli.no_push);

    if let Some(ref repo) = cli.repository {
        builder = builder.repository(repo);
    }
    if let Some(ref url) = cli.wiki_url {
        builder = builder.wiki_url(url);
    }
    if let Some(ref token) = cli.github_token {
        builder = builder.token(token);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn read_document(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read document from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// Print the error chain; inside GitHub Actions also emit a workflow
/// annotation so the failure shows up on the run summary.
fn report_failure(err: &anyhow::Error) {
    eprintln!("{} {:#}", red("✘"), err);
    if std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true") {
        let message = match err.downcast_ref::<WikiPublishError>() {
            Some(e) => e.to_string(),
            None => format!("{err:#}"),
        };
        // Workflow commands are line-based; newlines must be escaped.
        let escaped = message
            .replace('%', "%25")
            .replace('\r', "%0D")
            .replace('\n', "%0A");
        println!("::error::{escaped}");
    }
}
