use clap::{Args, Parser, Subcommand};
use folio::catalog::{Catalog, Environment};
use folio::pageview::{self, RequestInfo};
use folio::preview::{self, PreviewRequest};
use folio::{content, listing, post};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio", version, about = "Frontmatter, excerpts and previews for a markdown blog")]
struct Cli {
    #[arg(long, env = "FOLIO_CONTENT", default_value = "src/blog", global = true)]
    content: PathBuf,

    #[arg(long, env = "FOLIO_CATALOG", global = true, help = "Catalog YAML; discovered from content when absent")]
    catalog: Option<PathBuf>,

    #[arg(long, env = "FOLIO_ENV", value_enum, default_value_t = Environment::Development, global = true)]
    env: Environment,

    #[arg(short, long, global = true, help = "Log debug output to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a document's metadata and body
    Parse(DocumentArgs),
    /// Print a plain-text excerpt of a document's body
    Excerpt {
        #[command(flatten)]
        doc: DocumentArgs,
        #[arg(long, default_value_t = 2)]
        sentences: usize,
    },
    /// List visible posts with dates and excerpts
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print a single post
    Show {
        slug: String,
        #[arg(long)]
        json: bool,
    },
    /// Render the social preview page for a published post
    Preview {
        #[arg(default_value = "")]
        slug: String,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        forwarded_host: Option<String>,
        #[arg(long)]
        forwarded_proto: Option<String>,
    },
    /// Log a request, optionally with a JSON body read from stdin
    Log {
        #[arg(long, help = "Read a JSON request body from stdin")]
        stdin: bool,
        #[arg(long, default_value = "POST")]
        method: String,
        #[arg(long, default_value = "/api/log")]
        url: String,
        #[arg(long)]
        user_agent: Option<String>,
        #[arg(long)]
        referer: Option<String>,
        #[arg(long)]
        forwarded_for: Option<String>,
    },
}

#[derive(Args)]
struct DocumentArgs {
    #[arg(help = "Markdown file to read")]
    file: Option<PathBuf>,

    #[arg(long, help = "Read the document from stdin")]
    stdin: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Parse(doc) => run_parse(doc),
        Command::Excerpt { doc, sentences } => run_excerpt(doc, *sentences),
        Command::List { json } => run_list(&cli, *json),
        Command::Show { slug, json } => run_show(&cli, slug, *json),
        Command::Preview {
            slug,
            host,
            forwarded_host,
            forwarded_proto,
        } => run_preview(
            &cli.content,
            PreviewRequest {
                slug: slug.clone(),
                host: host.clone(),
                forwarded_host: forwarded_host.clone(),
                forwarded_proto: forwarded_proto.clone(),
            },
        ),
        Command::Log {
            stdin,
            method,
            url,
            user_agent,
            referer,
            forwarded_for,
        } => run_log(
            RequestInfo {
                method: method.clone(),
                url: url.clone(),
                user_agent: user_agent.clone(),
                referer: referer.clone(),
                forwarded_for: forwarded_for.clone(),
                body: None,
            },
            *stdin,
        ),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(doc: &DocumentArgs) -> Result<String, ExitCode> {
    if doc.stdin {
        let mut buf = String::new();
        return match io::stdin().read_to_string(&mut buf) {
            Ok(_) => Ok(buf),
            Err(e) => {
                eprintln!("Error: failed to read stdin: {}", e);
                Err(ExitCode::from(2))
            }
        };
    }

    let Some(path) = &doc.file else {
        eprintln!("Error: No document given. Pass a file or --stdin");
        return Err(ExitCode::from(2));
    };
    match content::read_document(path) {
        Ok(Some(text)) => Ok(text),
        Ok(None) => {
            eprintln!("Error: {} not found", path.display());
            Err(ExitCode::from(1))
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(ExitCode::from(2))
        }
    }
}

fn run_parse(doc: &DocumentArgs) -> ExitCode {
    let raw = match read_input(doc) {
        Ok(raw) => raw,
        Err(code) => return code,
    };

    let fm = folio::parse_frontmatter(&raw);
    match serde_yaml::to_string(&fm.metadata) {
        Ok(yaml) if !fm.metadata.is_empty() => print!("{}", yaml),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    }
    println!("---");
    println!("{}", fm.body);

    ExitCode::from(0)
}

fn run_excerpt(doc: &DocumentArgs, sentences: usize) -> ExitCode {
    let raw = match read_input(doc) {
        Ok(raw) => raw,
        Err(code) => return code,
    };

    let excerpt = folio::derive_excerpt(&folio::parse_frontmatter(&raw).body, sentences);
    if excerpt.is_empty() {
        return ExitCode::from(1);
    }
    println!("{}", excerpt);
    ExitCode::from(0)
}

fn load_catalog(cli: &Cli) -> Result<Catalog, ExitCode> {
    let result = match &cli.catalog {
        Some(path) => Catalog::load(path),
        None => Catalog::discover(&cli.content),
    };
    result.map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(2)
    })
}

fn run_list(cli: &Cli, json: bool) -> ExitCode {
    let catalog = match load_catalog(cli) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let entries = listing::build_listing(&catalog, &cli.content, cli.env);
    if entries.is_empty() {
        return ExitCode::from(1);
    }

    if json {
        match serde_json::to_string_pretty(&entries) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(2);
            }
        }
    } else {
        for line in listing::format_listing(&entries) {
            println!("{}", line);
        }
    }

    ExitCode::from(0)
}

fn run_show(cli: &Cli, slug: &str, json: bool) -> ExitCode {
    let catalog = match load_catalog(cli) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match post::load_post(&catalog, &cli.content, slug, cli.env) {
        Ok(Some(view)) if json => match serde_json::to_string_pretty(&view) {
            Ok(s) => {
                println!("{}", s);
                ExitCode::from(0)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(2)
            }
        },
        Ok(Some(view)) => {
            println!("# {}", view.title);
            if !view.date.is_empty() {
                println!("{}", view.date);
            }
            println!();
            println!("{}", view.content);
            ExitCode::from(0)
        }
        Ok(None) => {
            eprintln!("Post not found");
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run_preview(root: &Path, req: PreviewRequest) -> ExitCode {
    match preview::render_preview(root, &req) {
        Ok(html) => {
            print!("{}", html);
            ExitCode::from(0)
        }
        Err(e) => {
            tracing::warn!(slug = %req.slug, status = e.status_code(), "preview failed");
            eprintln!("Error: {}", e);
            match e.status_code() {
                404 => ExitCode::from(1),
                _ => ExitCode::from(2),
            }
        }
    }
}

fn run_log(mut req: RequestInfo, read_body: bool) -> ExitCode {
    let mut input = String::new();
    if read_body {
        if let Err(e) = io::stdin().read_to_string(&mut input) {
            eprintln!("Error: failed to read stdin: {}", e);
            return ExitCode::from(2);
        }
    }
    match pageview::parse_body(&input) {
        Ok(body) => req.body = body,
        Err(e) => {
            eprintln!("Error: invalid JSON body: {}", e);
            return ExitCode::from(2);
        }
    }

    let ack = pageview::log_request(&req, chrono::Utc::now());
    match serde_json::to_string(&ack) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::from(0)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
