use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::advice::{self, AdviceProvider, GeminiClient};
use crate::billing::{BillInput, SimulationMode};
use crate::config::{Config, ConfigError};
use crate::i18n::{self, keys, Translator};
use crate::report;
use crate::session::Session;
use crate::ui_cli::{self, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read {path}: {message}")]
    Input { path: PathBuf, message: String },
}

/// 입력 파일(JSON 또는 TOML)을 읽는다. 확장자가 .json이면 JSON, 그 외는 TOML.
pub fn load_input(path: &Path) -> Result<BillInput, AppError> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed: Result<BillInput, String> = if is_json {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
        toml::from_str(&content).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| AppError::Input {
        path: path.to_path_buf(),
        message,
    })
}

/// 비대화식 계산. `json`이면 계산 결과를 JSON으로, 아니면 표 형태 텍스트로 돌려준다.
pub fn compute_once(
    config: &Config,
    tr: &Translator,
    input: &BillInput,
    mode: SimulationMode,
    json: bool,
) -> Result<String, AppError> {
    let breakdown = crate::billing::compute_breakdown(input, mode, &config.rates);
    tracing::info!(%mode, total = breakdown.total, "bill computed");
    if json {
        Ok(serde_json::to_string_pretty(&breakdown)?)
    } else {
        Ok(ui_cli::format_breakdown(tr, &breakdown, mode))
    }
}

/// 리포트를 파일로 저장하고 저장 경로를 돌려준다. 경로가 없으면 기본 파일 이름을 쓴다.
pub fn export_report(
    config: &Config,
    session: &Session,
    output: Option<&Path>,
) -> Result<PathBuf, AppError> {
    let mode = session.mode();
    let breakdown = session.breakdown(&config.rates);
    let text = report::render_report(&session.input, &breakdown, mode, Local::now().date_naive());
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(report::report_file_name(mode)));
    fs::write(&path, text)?;
    tracing::info!(path = %path.display(), %mode, "report exported");
    Ok(path)
}

/// AI 분석을 요청해 세션에 저장한다. 키가 없으면 사용자에게 알리고 넘어간다.
fn request_advice(config: &Config, tr: &Translator, session: &mut Session) {
    let provider = match GeminiClient::from_config(&config.advice) {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(error = %err, "advice provider unavailable");
            println!("{} {err}", tr.t(keys::ADVICE_UNAVAILABLE));
            return;
        }
    };
    println!("{}", tr.t(keys::ADVICE_LOADING));
    let text = fetch_advice(&provider, config, session);
    session.set_advice(text);
}

fn fetch_advice(provider: &dyn AdviceProvider, config: &Config, session: &Session) -> String {
    let breakdown = session.breakdown(&config.rates);
    advice::get_advice(provider, &session.input, &breakdown, session.mode())
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(config: &mut Config, tr: &mut Translator, session: &mut Session) -> Result<(), AppError> {
    loop {
        match ui_cli::main_menu(tr, session.mode())? {
            MenuChoice::ShowBreakdown => {
                let breakdown = session.breakdown(&config.rates);
                println!("{}", ui_cli::format_breakdown(tr, &breakdown, session.mode()));
            }
            MenuChoice::EditInputs => {
                let mode = session.mode();
                ui_cli::handle_edit_inputs(tr, &mut session.input, mode)?;
            }
            MenuChoice::SwitchMode => session.set_mode(session.mode().toggled()),
            MenuChoice::Advice => {
                request_advice(config, tr, session);
                if let Some(text) = session.advice() {
                    println!("{}", tr.t(keys::ADVICE_HEADING));
                    println!("{text}");
                }
            }
            MenuChoice::Export => {
                let path = export_report(config, session, None)?;
                println!("{} {}", tr.t(keys::EXPORT_SAVED), path.display());
            }
            MenuChoice::Settings => {
                if let Some(lang) = ui_cli::handle_settings(tr, &config.language)? {
                    config.language = lang;
                    let resolved = i18n::resolve_language("auto", Some(config.language.as_str()));
                    *tr = Translator::new_with_pack(&resolved, config.language_pack_dir.as_deref());
                    config.save()?;
                }
            }
            MenuChoice::Exit => {
                if ui_cli::confirm_exit(tr, session.should_show_exit_prompt())? {
                    config.save()?;
                    println!("{}", tr.t(keys::APP_EXIT));
                    break;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::AdviceError;

    struct Offline;

    impl AdviceProvider for Offline {
        fn generate(&self, _prompt: &str) -> Result<Option<String>, AdviceError> {
            Err(AdviceError::MissingApiKey("NONE".into()))
        }
    }

    #[test]
    fn offline_provider_yields_fallback_text() {
        let cfg = Config::default();
        let session = Session::default();
        assert_eq!(
            fetch_advice(&Offline, &cfg, &session),
            advice::CONNECTION_ERROR_MESSAGE
        );
    }

    #[test]
    fn loads_json_and_toml_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("in.json");
        fs::write(&json, r#"{"monthlyKwh": 300, "energyPrice": ""}"#).unwrap();
        let input = load_input(&json).unwrap();
        assert_eq!(input.monthly_kwh.value(), 300.0);
        assert!(input.energy_price.is_empty());

        let toml_path = dir.path().join("in.toml");
        fs::write(&toml_path, "monthlySmc = 55\ntariffTypeGas = \"variable\"\n").unwrap();
        let input = load_input(&toml_path).unwrap();
        assert_eq!(input.monthly_smc.value(), 55.0);
    }

    #[test]
    fn bad_input_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_input(&path), Err(AppError::Input { path: p, .. }) if p == path));
    }

    #[test]
    fn export_writes_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("r.txt");
        let path = export_report(&Config::default(), &Session::default(), Some(&out)).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("REPORT SIMULAZIONE LUCE"));
    }

    #[test]
    fn compute_once_json_has_total() {
        let tr = Translator::new("it");
        let out = compute_once(
            &Config::default(),
            &tr,
            &BillInput::default(),
            SimulationMode::Gas,
            true,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["total"].as_f64().unwrap() > 0.0);
        assert_eq!(value["oneriSistema"], 0.0);
    }
}
