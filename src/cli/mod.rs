//! CLI module for the playground generator

mod args;

pub use args::{Args, Command, PathArgs};

use crate::config::{CliOverrides, Config, PlaygroundConfig, DEFAULT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::logging::init_logging;
use crate::output::{Manifest, PlaygroundGenerator};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    if let Err(e) = init_logging(args.verbose, args.quiet) {
        eprintln!("Warning: {}", e);
    }

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Run failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>, overrides: CliOverrides) -> Result<Config> {
    let mut cfg = match path {
        Some(config_path) => Config::load(config_path)?,
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };

    cfg.merge_cli(overrides);
    cfg.validate()?;
    Ok(cfg)
}

fn execute(args: Args) -> Result<()> {
    let verbose = args.verbose;
    let quiet = args.quiet;

    match args.command {
        Command::Generate { paths } => {
            let cfg = load_config(paths.config.as_deref(), paths.overrides())?;
            generate(&cfg, verbose, quiet)
        }

        Command::Config { config } => {
            let cfg = load_config(config.as_deref(), CliOverrides::default())?;
            println!("{}", cfg.bundler.to_json()?);
            Ok(())
        }

        Command::Serve {
            paths,
            host,
            port,
            no_open,
        } => {
            let overrides = CliOverrides {
                host,
                port,
                no_open,
                ..paths.overrides()
            };
            let cfg = load_config(paths.config.as_deref(), overrides)?;
            generate(&cfg, verbose, quiet)?;
            let site = ServeSite::new(&cfg.playground)?;

            let url = cfg.bundler.local_url();
            println!("Serving {} on {}", site.root.display(), url);
            println!("Press Ctrl+C to stop");

            let listener = bind(&cfg.bundler.server.host, cfg.bundler.server.port)?;
            if cfg.bundler.server.open {
                open_browser(&url);
            }

            serve_directory(listener, Arc::new(site))
        }

        Command::Version => {
            println!("playground-gen {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Regenerate the workspace
fn generate(cfg: &Config, verbose: bool, quiet: bool) -> Result<()> {
    tracing::debug!(
        source = %cfg.playground.source_dir.display(),
        output = %cfg.playground.output_dir.display(),
        template = ?cfg.playground.template,
        extension = %cfg.playground.extension,
        "Generating playground"
    );

    let generator = PlaygroundGenerator::new(cfg.playground.clone()).with_verbose(verbose);
    let generation = generator.generate()?;

    if !quiet {
        println!("{}", generation.report.summary());
        println!("Playground written to: {}", generator.output_dir().display());
    }

    Ok(())
}

fn bind(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port))
        .map_err(|e| Error::other(format!("Failed to bind to {}:{}: {}", host, port, e)))
}

/// Best-effort attempt to open `url` in the default browser
fn open_browser(url: &str) {
    use std::process::Command;

    let result = if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", url]).spawn()
    } else if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else {
        Command::new("xdg-open").arg(url).spawn()
    };

    if let Err(e) = result {
        tracing::warn!("Failed to open browser at {}: {}", url, e);
    }
}

/// Files reachable from the preview server.
///
/// The root is the deepest directory holding both the sources and the
/// workspace, so the relative imports in entry modules stay inside it.
#[derive(Debug, Clone)]
struct ServeSite {
    root: PathBuf,
    /// URL path of the workspace below the root, empty or starting with `/`
    pages_prefix: String,
    extension: String,
    manifest: PathBuf,
}

/// Outcome of mapping a request path onto the site
#[derive(Debug, PartialEq, Eq)]
enum Lookup {
    Found(PathBuf),
    Forbidden,
    NotFound,
}

impl ServeSite {
    fn new(cfg: &PlaygroundConfig) -> Result<Self> {
        let output = cfg
            .output_dir
            .canonicalize()
            .map_err(|e| Error::filesystem("resolve", &cfg.output_dir, e))?;
        let source = cfg
            .source_dir
            .canonicalize()
            .map_err(|e| Error::filesystem("resolve", &cfg.source_dir, e))?;

        let mut root: PathBuf = output
            .components()
            .zip(source.components())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a)
            .collect();

        if root.parent().is_none() {
            tracing::warn!(
                "Sources and workspace share no directory below {}, serving the workspace only",
                root.display()
            );
            root = output.clone();
        }

        let pages_prefix = output
            .strip_prefix(&root)
            .map(|rel| {
                rel.components()
                    .map(|c| format!("/{}", c.as_os_str().to_string_lossy()))
                    .collect::<String>()
            })
            .unwrap_or_default();

        Ok(Self {
            manifest: output.join(&cfg.manifest_file),
            root,
            pages_prefix,
            extension: cfg.extension.clone(),
        })
    }

    /// Map a decoded URL path to a file under the root.
    ///
    /// Extensionless paths that name no file fall back to `<path>.<extension>`,
    /// which is how the browser requests an entry module's import.
    fn resolve(&self, url_path: &str) -> Lookup {
        let relative = url_path.trim_start_matches('/');
        let mut file_path = self.root.join(relative);

        if !file_path.is_file() && Path::new(relative).extension().is_none() {
            let mut with_ext = file_path.clone().into_os_string();
            with_ext.push(".");
            with_ext.push(&self.extension);
            let with_ext = PathBuf::from(with_ext);
            if with_ext.is_file() {
                file_path = with_ext;
            }
        }

        // Security: prevent path traversal
        let canonical = match file_path.canonicalize() {
            Ok(p) => p,
            Err(_) => return Lookup::NotFound,
        };

        if !canonical.starts_with(&self.root) {
            return Lookup::Forbidden;
        }

        if canonical.is_file() {
            Lookup::Found(canonical)
        } else {
            Lookup::NotFound
        }
    }
}

/// Simple HTTP server for the generated workspace and its sources
fn serve_directory(listener: TcpListener, site: Arc<ServeSite>) -> Result<()> {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let site = Arc::clone(&site);
                std::thread::spawn(move || {
                    if let Err(e) = handle_request(stream, &site) {
                        tracing::warn!("Request error: {}", e);
                    }
                });
            }
            Err(e) => tracing::warn!("Connection error: {}", e),
        }
    }

    Ok(())
}

/// Handle a single HTTP request
fn handle_request(mut stream: TcpStream, site: &ServeSite) -> Result<()> {
    let mut buffer = [0; 4096];
    let n = stream.read(&mut buffer)?;
    let request = String::from_utf8_lossy(&buffer[..n]);

    // Parse request line
    let request_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = request_line.split_whitespace().collect();

    if parts.len() < 2 {
        send_response(&mut stream, 400, "Bad Request", "text/plain", b"Bad Request")?;
        return Ok(());
    }

    let method = parts[0];
    let path = parts[1];

    if method != "GET" {
        send_response(&mut stream, 405, "Method Not Allowed", "text/plain", b"Method Not Allowed")?;
        return Ok(());
    }

    let url_path = urlparse(path);
    if url_path == "/" {
        let body = index_page(site);
        send_response(&mut stream, 200, "OK", "text/html; charset=utf-8", body.as_bytes())?;
        tracing::info!("200 {} {}", method, path);
        return Ok(());
    }

    match site.resolve(&url_path) {
        Lookup::Found(file) => match std::fs::read(&file) {
            Ok(content) => {
                send_response(&mut stream, 200, "OK", guess_content_type(&file), &content)?;
                tracing::info!("200 {} {}", method, path);
            }
            Err(_) => {
                send_response(&mut stream, 404, "Not Found", "text/plain", b"Not Found")?;
                tracing::info!("404 {} {}", method, path);
            }
        },
        Lookup::Forbidden => {
            send_response(&mut stream, 403, "Forbidden", "text/plain", b"Forbidden")?;
            tracing::info!("403 {} {}", method, path);
        }
        Lookup::NotFound => {
            send_response(&mut stream, 404, "Not Found", "text/plain", b"Not Found")?;
            tracing::info!("404 {} {}", method, path);
        }
    }

    Ok(())
}

/// Send an HTTP response
fn send_response(
    stream: &mut TcpStream,
    status_code: u16,
    status_text: &str,
    content_type: &str,
    body: &[u8],
) -> Result<()> {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status_code,
        status_text,
        content_type,
        body.len()
    );

    stream.write_all(response.as_bytes())?;
    stream.write_all(body)?;
    stream.flush()?;

    Ok(())
}

/// Navigation page listing every generated example by category
fn index_page(site: &ServeSite) -> String {
    let manifest = std::fs::read_to_string(&site.manifest)
        .ok()
        .and_then(|json| Manifest::from_json(&json).ok())
        .unwrap_or_default();

    let mut html = String::from("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Playground</title></head><body>\n");
    for (category, entries) in manifest.categories() {
        html.push_str(&format!("<h2>{}</h2>\n<ul>\n", escape_html(category)));
        for entry in entries {
            html.push_str(&format!(
                "<li><a href=\"{}/{}.html\">{}</a></li>\n",
                escape_html(&site.pages_prefix),
                escape_html(&entry.src),
                escape_html(&entry.label)
            ));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</body></html>\n");
    html
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Guess content type from file extension
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") | Some("ts") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("wasm") => "application/wasm",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Simple URL decoding
fn urlparse(s: &str) -> String {
    // Split off query string
    let path = s.split('?').next().unwrap_or(s);

    let mut bytes = Vec::with_capacity(path.len());
    let mut iter = path.bytes();

    while let Some(b) = iter.next() {
        if b == b'%' {
            let hex: Vec<u8> = iter.by_ref().take(2).collect();
            match std::str::from_utf8(&hex).ok().and_then(|h| u8::from_str_radix(h, 16).ok()) {
                Some(byte) if hex.len() == 2 => bytes.push(byte),
                _ => {
                    bytes.push(b'%');
                    bytes.extend_from_slice(&hex);
                }
            }
        } else {
            bytes.push(b);
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_urlparse() {
        assert_eq!(urlparse("/a.html?x=1"), "/a.html");
        assert_eq!(urlparse("/multi%20camera.html"), "/multi camera.html");
        assert_eq!(urlparse("/%E5%A4%9A.html"), "/多.html");
        assert_eq!(urlparse("/bad%zz"), "/bad%zz");
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("a.html")), "text/html; charset=utf-8");
        assert_eq!(
            guess_content_type(Path::new("a.ts")),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(guess_content_type(Path::new("blob")), "application/octet-stream");
    }

    /// Default layout: `pg/a.ts` with the workspace at `pg/.dev/mpa`
    fn generated_site(dir: &Path) -> ServeSite {
        let source = dir.join("pg");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(
            source.join("a.ts"),
            "/**\n * @title A <b>\n * @category Basic\n */\nconsole.log(\"a\");\n",
        )
        .unwrap();

        let cfg = PlaygroundConfig {
            source_dir: source.clone(),
            output_dir: source.join(".dev/mpa"),
            ..Default::default()
        };
        PlaygroundGenerator::new(cfg.clone()).generate().unwrap();
        ServeSite::new(&cfg).unwrap()
    }

    fn get(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        write!(stream, "GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", path).unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn test_site_root_holds_sources_and_workspace() {
        let dir = TempDir::new().unwrap();
        let site = generated_site(dir.path());
        assert_eq!(site.root, dir.path().join("pg").canonicalize().unwrap());
        assert_eq!(site.pages_prefix, "/.dev/mpa");
    }

    #[test]
    fn test_resolve_entry_module_import() {
        let dir = TempDir::new().unwrap();
        let site = generated_site(dir.path());
        let source = dir.path().join("pg").canonicalize().unwrap();

        let entry = std::fs::read_to_string(source.join(".dev/mpa/a.ts")).unwrap();
        assert_eq!(entry, "import \"../../a\"");

        // The browser resolves ../../a against /.dev/mpa/a.ts
        assert_eq!(site.resolve("/a"), Lookup::Found(source.join("a.ts")));
        assert_eq!(
            site.resolve("/.dev/mpa/a.html"),
            Lookup::Found(source.join(".dev/mpa/a.html"))
        );
        assert_eq!(site.resolve("/missing"), Lookup::NotFound);
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let site = generated_site(dir.path());
        std::fs::write(dir.path().join("secret.txt"), "x").unwrap();

        assert_eq!(site.resolve("/../secret.txt"), Lookup::Forbidden);
        assert_eq!(site.resolve("/../secret"), Lookup::NotFound);
    }

    #[test]
    fn test_serve_loads_example_through_entry_import() {
        let dir = TempDir::new().unwrap();
        let site = Arc::new(generated_site(dir.path()));
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || serve_directory(listener, site));

        let page = get(addr, "/.dev/mpa/a.html");
        assert!(page.starts_with("HTTP/1.1 200 OK"));
        assert!(page.contains("src=\"./a.ts\""));

        let entry = get(addr, "/.dev/mpa/a.ts");
        assert!(entry.ends_with("import \"../../a\""));

        let example = get(addr, "/a");
        assert!(example.starts_with("HTTP/1.1 200 OK"));
        assert!(example.contains("application/javascript"));
        assert!(example.contains("console.log(\"a\");"));

        let index = get(addr, "/");
        assert!(index.contains("<a href=\"/.dev/mpa/a.html\">A &lt;b&gt;</a>"));
    }

    #[test]
    fn test_index_page_lists_manifest() {
        let dir = TempDir::new().unwrap();
        let site = generated_site(dir.path());

        let html = index_page(&site);
        assert!(html.contains("<h2>Basic</h2>"));
        assert!(html.contains("<a href=\"/.dev/mpa/a.html\">A &lt;b&gt;</a>"));
    }

    #[test]
    fn test_index_page_without_manifest() {
        let dir = TempDir::new().unwrap();
        let site = ServeSite {
            root: dir.path().to_path_buf(),
            pages_prefix: String::new(),
            extension: "ts".to_string(),
            manifest: dir.path().join(".demoList.json"),
        };
        let html = index_page(&site);
        assert!(html.contains("<body>"));
        assert!(!html.contains("<h2>"));
    }
}
