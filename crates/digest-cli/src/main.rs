mod session;
mod view;

use std::path::PathBuf;

use analysis_client::AnalysisClient;
use chart_render::RenderedView;
use report_export::{export_digest, export_snapshot};
use report_view::ReportConfig;
use session::ReportSession;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: digest-cli [--pdf] [--json] [--out DIR] COMPANY NAME";

struct CliArgs {
    company: String,
    export_pdf: bool,
    export_json: bool,
    out_dir: PathBuf,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut export_pdf = false;
    let mut export_json = false;
    let mut out_dir = PathBuf::from(".");
    let mut words: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--pdf" => export_pdf = true,
            "--json" => export_json = true,
            "--out" => {
                let dir = iter.next().ok_or_else(|| USAGE.to_string())?;
                out_dir = PathBuf::from(dir);
            }
            flag if flag.starts_with("--") => return Err(USAGE.to_string()),
            word => words.push(word),
        }
    }

    let company = words.join(" ");
    if company.trim().is_empty() {
        return Err(USAGE.to_string());
    }

    Ok(CliArgs {
        company,
        export_pdf,
        export_json,
        out_dir,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "digest_cli=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(usage) => {
            eprintln!("{usage}");
            std::process::exit(2);
        }
    };

    let client = AnalysisClient::from_env();
    let mut session = ReportSession::new();
    session.apply(client.analyze(&cli.company).await);

    if let Some(error) = session.error() {
        // the prior view is already cleared; show the banner and stop
        eprintln!("error: {error}");
        std::process::exit(1);
    }
    let Some(report) = session.current() else {
        return Ok(());
    };

    let cfg = ReportConfig::default();
    println!("{}", view::render_report_text(&report.digest, &report.warnings, &cfg));

    if cli.export_json {
        let path = export_digest(&report.digest, &cli.out_dir)?;
        println!("saved data export: {}", path.display());
    }
    if cli.export_pdf {
        let rendered = RenderedView::new(&report.digest, cfg);
        match export_snapshot(&rendered, &cli.out_dir)? {
            Some(path) => println!("saved snapshot: {}", path.display()),
            None => println!("snapshot skipped: nothing to capture"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_company_with_spaces() {
        let cli = parse_args(&args(&["General", "Motors"])).unwrap();
        assert_eq!(cli.company, "General Motors");
        assert!(!cli.export_pdf);
        assert!(!cli.export_json);
    }

    #[test]
    fn test_parse_flags_and_out_dir() {
        let cli = parse_args(&args(&["--pdf", "--json", "--out", "/tmp/reports", "Acme"])).unwrap();
        assert!(cli.export_pdf);
        assert!(cli.export_json);
        assert_eq!(cli.out_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(cli.company, "Acme");
    }

    #[test]
    fn test_empty_company_rejected() {
        assert!(parse_args(&args(&["--pdf"])).is_err());
        assert!(parse_args(&args(&[])).is_err());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(parse_args(&args(&["--frobnicate", "Acme"])).is_err());
    }
}
