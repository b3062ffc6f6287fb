use std::path::PathBuf;

use bolletta_chiara::{app, billing::SimulationMode, config, i18n, session::Session};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// 이탈리아 전기/가스 월 요금 시뮬레이터.
#[derive(Debug, Parser)]
#[command(name = "bolletta_chiara", version, about = "Stima bolletta luce e gas")]
struct Cli {
    /// 설정 파일 경로
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// 언어: auto / it / en
    #[arg(long, short = 'L', default_value = "auto")]
    lang: String,
    /// 시작 모드: luce / gas
    #[arg(long, default_value = "luce")]
    mode: SimulationMode,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 한 번 계산해서 출력한다
    Compute {
        /// 입력 파일(.json 또는 .toml). 없으면 기본 입력
        #[arg(long)]
        input: Option<PathBuf>,
        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },
    /// 텍스트 리포트를 파일로 저장한다
    Report {
        #[arg(long)]
        input: Option<PathBuf>,
        /// 저장 경로. 없으면 BollettaChiara_AI_Report_<Mode>.txt
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = try_run(Cli::parse()) {
        eprintln!("Errore: {err}");
        std::process::exit(1);
    }
}

fn try_run(cli: Cli) -> Result<(), app::AppError> {
    let mut cfg = config::load_or_default(&cli.config)?;
    let lang = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let mut tr = i18n::Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());
    tracing::debug!(lang = tr.language_code(), mode = %cli.mode, "starting");

    let read_input = |path: Option<PathBuf>| match path {
        Some(p) => app::load_input(&p),
        None => Ok(Default::default()),
    };

    match cli.command {
        Some(Command::Compute { input, json }) => {
            let input = read_input(input)?;
            println!("{}", app::compute_once(&cfg, &tr, &input, cli.mode, json)?);
        }
        Some(Command::Report { input, output }) => {
            let session = Session::new(read_input(input)?, cli.mode);
            let path = app::export_report(&cfg, &session, output.as_deref())?;
            println!("{} {}", tr.t(i18n::keys::EXPORT_SAVED), path.display());
        }
        None => {
            let mut session = Session::new(Default::default(), cli.mode);
            app::run(&mut cfg, &mut tr, &mut session)?;
        }
    }
    Ok(())
}
