use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_CURRENT_MODE: &str = "main_menu.current_mode";
    pub const MAIN_MENU_SHOW_BREAKDOWN: &str = "main_menu.show_breakdown";
    pub const MAIN_MENU_EDIT_INPUTS: &str = "main_menu.edit_inputs";
    pub const MAIN_MENU_SWITCH_MODE: &str = "main_menu.switch_mode";
    pub const MAIN_MENU_ADVICE: &str = "main_menu.advice";
    pub const MAIN_MENU_EXPORT: &str = "main_menu.export";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const EDIT_HEADING: &str = "edit.heading";
    pub const EDIT_PROMPT_FIELD: &str = "edit.prompt_field";
    pub const EDIT_PROMPT_VALUE: &str = "edit.prompt_value";
    pub const EDIT_PROMPT_TOGGLE: &str = "edit.prompt_toggle";
    pub const EDIT_UPDATED: &str = "edit.updated";
    pub const EDIT_BAND_SHARE_WARNING: &str = "edit.band_share_warning";

    pub const RESULT_HEADING: &str = "result.heading";
    pub const RESULT_TOTAL: &str = "result.total";
    pub const RESULT_FIXED: &str = "result.fixed";
    pub const RESULT_VARIABLE: &str = "result.variable";
    pub const RESULT_DETAIL: &str = "result.detail";

    pub const ADVICE_HEADING: &str = "advice.heading";
    pub const ADVICE_LOADING: &str = "advice.loading";
    pub const ADVICE_UNAVAILABLE: &str = "advice.unavailable";

    pub const EXPORT_SAVED: &str = "export.saved";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT_LANGUAGE: &str = "settings.current_language";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const EXIT_PROMPT_TITLE: &str = "exit_prompt.title";
    pub const EXIT_PROMPT_BODY: &str = "exit_prompt.body";
    pub const EXIT_PROMPT_CONFIRM: &str = "exit_prompt.confirm";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    It,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::It
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::It => "it",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(it/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 it로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir.and_then(|dir| load_overrides(dir, lang_code));
        if overrides.is_some() {
            tracing::debug!(lang = lang_code, "language pack loaded");
        }
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 번역을 가져온다. 언어팩 → 내장 문자열 순이며, 영어 번역이 없으면 이탈리아어로 폴백한다.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v.as_str();
        }
        match self.lang {
            Language::En => en(key).or_else(|| it(key)).unwrap_or(key),
            Language::It => it(key).unwrap_or(key),
        }
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "it".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("it") => Some("it".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "it" => Some("it".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(code) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(code);
    }
    ["LANG", "LC_ALL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: `{dir}/{lang}.toml`, 중첩 테이블은 점으로 이은 키.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let path = Path::new(dir).join(format!("{lang}.toml"));
    let content = fs::read_to_string(path).ok()?;
    parse_toml_to_map(&content)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn it(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Errore",
        APP_EXIT => "Grazie per aver usato BollettaChiara.",
        MAIN_MENU_TITLE => "\n=== BollettaChiara AI ===",
        MAIN_MENU_CURRENT_MODE => "Simulazione:",
        MAIN_MENU_SHOW_BREAKDOWN => "1) Mostra stima bolletta",
        MAIN_MENU_EDIT_INPUTS => "2) Modifica dati",
        MAIN_MENU_SWITCH_MODE => "3) Passa a luce/gas",
        MAIN_MENU_ADVICE => "4) Analisi AI",
        MAIN_MENU_EXPORT => "5) Esporta report",
        MAIN_MENU_SETTINGS => "6) Impostazioni",
        MAIN_MENU_EXIT => "0) Esci",
        PROMPT_MENU_SELECT => "Scelta: ",
        INVALID_SELECTION_RETRY => "Scelta non valida. Riprova.",
        ERROR_INVALID_NUMBER => "Inserisci un numero.",
        EDIT_HEADING => "\n-- Dati della simulazione --",
        EDIT_PROMPT_FIELD => "Numero del campo (invio per tornare): ",
        EDIT_PROMPT_VALUE => "Nuovo valore (vuoto = campo vuoto): ",
        EDIT_PROMPT_TOGGLE => "Valore invertito.",
        EDIT_UPDATED => "Campo aggiornato.",
        EDIT_BAND_SHARE_WARNING => "Attenzione: le percentuali F1/F2/F3 sommano a",
        RESULT_HEADING => "\n-- Stima mensile --",
        RESULT_TOTAL => "Totale stimato:",
        RESULT_FIXED => "Fissi",
        RESULT_VARIABLE => "Consumo",
        RESULT_DETAIL => "Dettaglio:",
        ADVICE_HEADING => "\n-- Analisi BollettaChiara --",
        ADVICE_LOADING => "Richiesta in corso...",
        ADVICE_UNAVAILABLE => "Analisi AI non disponibile:",
        EXPORT_SAVED => "Report salvato in",
        SETTINGS_HEADING => "\n-- Impostazioni --",
        SETTINGS_CURRENT_LANGUAGE => "Lingua attuale:",
        SETTINGS_OPTIONS => "1) Italiano  2) English  3) Automatica",
        SETTINGS_PROMPT_CHANGE => "Numero da impostare (invio per annullare): ",
        SETTINGS_INVALID => "Scelta non valida, lingua invariata.",
        SETTINGS_SAVED => "Lingua impostata:",
        EXIT_PROMPT_TITLE => "\nPrima di andare...",
        EXIT_PROMPT_BODY => "Hai esportato il report della tua simulazione? I dati non vengono salvati.",
        EXIT_PROMPT_CONFIRM => "Uscire davvero? (s/N): ",
        _ => return None,
    })
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Thanks for using BollettaChiara.",
        MAIN_MENU_TITLE => "\n=== BollettaChiara AI ===",
        MAIN_MENU_CURRENT_MODE => "Simulation:",
        MAIN_MENU_SHOW_BREAKDOWN => "1) Show bill estimate",
        MAIN_MENU_EDIT_INPUTS => "2) Edit inputs",
        MAIN_MENU_SWITCH_MODE => "3) Switch electricity/gas",
        MAIN_MENU_ADVICE => "4) AI analysis",
        MAIN_MENU_EXPORT => "5) Export report",
        MAIN_MENU_SETTINGS => "6) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        EDIT_HEADING => "\n-- Simulation inputs --",
        EDIT_PROMPT_FIELD => "Field number (enter to go back): ",
        EDIT_PROMPT_VALUE => "New value (blank = empty field): ",
        EDIT_PROMPT_TOGGLE => "Value toggled.",
        EDIT_UPDATED => "Field updated.",
        EDIT_BAND_SHARE_WARNING => "Warning: F1/F2/F3 shares add up to",
        RESULT_HEADING => "\n-- Monthly estimate --",
        RESULT_TOTAL => "Estimated total:",
        RESULT_FIXED => "Fixed",
        RESULT_VARIABLE => "Usage",
        RESULT_DETAIL => "Details:",
        ADVICE_HEADING => "\n-- BollettaChiara analysis --",
        ADVICE_LOADING => "Requesting...",
        ADVICE_UNAVAILABLE => "AI analysis unavailable:",
        EXPORT_SAVED => "Report saved to",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT_LANGUAGE => "Current language:",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_INVALID => "Invalid input; language unchanged.",
        SETTINGS_SAVED => "Language set to:",
        EXIT_PROMPT_TITLE => "\nBefore you go...",
        EXIT_PROMPT_BODY => "Did you export your simulation report? Inputs are not saved.",
        EXIT_PROMPT_CONFIRM => "Really quit? (y/N): ",
        _ => return None,
    })
}
