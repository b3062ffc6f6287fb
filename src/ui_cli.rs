use std::io::{self, Write};

use crate::app::AppError;
use crate::billing::{Amount, BillBreakdown, BillInput, SimulationMode, TariffType};
use crate::i18n::{keys, Translator};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ShowBreakdown,
    EditInputs,
    SwitchMode,
    Advice,
    Export,
    Settings,
    Exit,
}

/// 편집 가능한 입력 항목.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    MonthlyKwh,
    TariffTypeLuce,
    PunValue,
    SpreadLuce,
    IsMultioraria,
    EnergyPrice,
    EnergyPriceF1,
    EnergyPriceF2,
    EnergyPriceF3,
    PercContentF1,
    PercContentF2,
    PercContentF3,
    PowerKw,
    PcvFixed,
    AutoDispatching,
    DispatchingFixed,
    DispatchingVar,
    CapacityMarketVar,
    IsResident,
    IncludeCanoneRai,
    MonthlySmc,
    TariffTypeGas,
    PsvValue,
    SpreadGas,
    GasPrice,
    QvdFixed,
    AutoGasTransport,
    GasTransportFixed,
    GasTransportVar,
}

const LUCE_FIELDS: &[Field] = &[
    Field::MonthlyKwh,
    Field::TariffTypeLuce,
    Field::PunValue,
    Field::SpreadLuce,
    Field::IsMultioraria,
    Field::EnergyPrice,
    Field::EnergyPriceF1,
    Field::EnergyPriceF2,
    Field::EnergyPriceF3,
    Field::PercContentF1,
    Field::PercContentF2,
    Field::PercContentF3,
    Field::PowerKw,
    Field::PcvFixed,
    Field::AutoDispatching,
    Field::DispatchingFixed,
    Field::DispatchingVar,
    Field::CapacityMarketVar,
    Field::IsResident,
    Field::IncludeCanoneRai,
];

const GAS_FIELDS: &[Field] = &[
    Field::MonthlySmc,
    Field::TariffTypeGas,
    Field::PsvValue,
    Field::SpreadGas,
    Field::GasPrice,
    Field::QvdFixed,
    Field::AutoGasTransport,
    Field::GasTransportFixed,
    Field::GasTransportVar,
];

/// 모드별 편집 항목 목록.
pub fn fields(mode: SimulationMode) -> &'static [Field] {
    match mode {
        SimulationMode::Luce => LUCE_FIELDS,
        SimulationMode::Gas => GAS_FIELDS,
    }
}

/// 항목 값 해석 오류.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid number: '{0}'")]
pub struct InvalidValue(pub String);

fn tariff_name(t: TariffType) -> &'static str {
    match t {
        TariffType::Fixed => "Fissa",
        TariffType::Variable => "Variabile",
    }
}

fn yes_no(v: bool) -> &'static str {
    if v {
        "sì"
    } else {
        "no"
    }
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::MonthlyKwh => "Consumo mensile [kWh]",
            Field::TariffTypeLuce => "Tipo tariffa (Fissa/Variabile PUN)",
            Field::PunValue => "PUN [€/kWh]",
            Field::SpreadLuce => "Spread luce [€/kWh]",
            Field::IsMultioraria => "Multioraria F1/F2/F3",
            Field::EnergyPrice => "Prezzo monorario [€/kWh]",
            Field::EnergyPriceF1 => "Prezzo F1 [€/kWh]",
            Field::EnergyPriceF2 => "Prezzo F2 [€/kWh]",
            Field::EnergyPriceF3 => "Prezzo F3 [€/kWh]",
            Field::PercContentF1 => "Consumo in F1 [%]",
            Field::PercContentF2 => "Consumo in F2 [%]",
            Field::PercContentF3 => "Consumo in F3 [%]",
            Field::PowerKw => "Potenza impegnata [kW]",
            Field::PcvFixed => "Quota fissa PCV [€/mese]",
            Field::AutoDispatching => "Dispacciamento ARERA automatico",
            Field::DispatchingFixed => "Dispacciamento fisso [€/mese]",
            Field::DispatchingVar => "Dispacciamento variabile [€/kWh]",
            Field::CapacityMarketVar => "Mercato capacità [€/kWh]",
            Field::IsResident => "Residente",
            Field::IncludeCanoneRai => "Includi Canone RAI",
            Field::MonthlySmc => "Consumo mensile [Smc]",
            Field::TariffTypeGas => "Tipo tariffa (Fissa/Variabile PSV)",
            Field::PsvValue => "PSV [€/Smc]",
            Field::SpreadGas => "Spread gas [€/Smc]",
            Field::GasPrice => "Prezzo gas [€/Smc]",
            Field::QvdFixed => "Quota fissa QVD [€/mese]",
            Field::AutoGasTransport => "Trasporto gas medio automatico",
            Field::GasTransportFixed => "Trasporto fisso [€/mese]",
            Field::GasTransportVar => "Trasporto variabile [€/Smc]",
        }
    }

    /// 값 입력 없이 뒤집기만 하는 항목인지.
    pub fn is_toggle(self) -> bool {
        matches!(
            self,
            Field::TariffTypeLuce
                | Field::IsMultioraria
                | Field::AutoDispatching
                | Field::IsResident
                | Field::IncludeCanoneRai
                | Field::TariffTypeGas
                | Field::AutoGasTransport
        )
    }

    fn amount(self, input: &BillInput) -> Option<Amount> {
        Some(match self {
            Field::MonthlyKwh => input.monthly_kwh,
            Field::PunValue => input.pun_value,
            Field::SpreadLuce => input.spread_luce,
            Field::EnergyPrice => input.energy_price,
            Field::EnergyPriceF1 => input.energy_price_f1,
            Field::EnergyPriceF2 => input.energy_price_f2,
            Field::EnergyPriceF3 => input.energy_price_f3,
            Field::PcvFixed => input.pcv_fixed,
            Field::DispatchingFixed => input.dispatching_fixed,
            Field::DispatchingVar => input.dispatching_var,
            Field::CapacityMarketVar => input.capacity_market_var,
            Field::MonthlySmc => input.monthly_smc,
            Field::PsvValue => input.psv_value,
            Field::SpreadGas => input.spread_gas,
            Field::GasPrice => input.gas_price,
            Field::QvdFixed => input.qvd_fixed,
            Field::GasTransportFixed => input.gas_transport_fixed,
            Field::GasTransportVar => input.gas_transport_var,
            _ => return None,
        })
    }

    fn amount_mut(self, input: &mut BillInput) -> Option<&mut Amount> {
        Some(match self {
            Field::MonthlyKwh => &mut input.monthly_kwh,
            Field::PunValue => &mut input.pun_value,
            Field::SpreadLuce => &mut input.spread_luce,
            Field::EnergyPrice => &mut input.energy_price,
            Field::EnergyPriceF1 => &mut input.energy_price_f1,
            Field::EnergyPriceF2 => &mut input.energy_price_f2,
            Field::EnergyPriceF3 => &mut input.energy_price_f3,
            Field::PcvFixed => &mut input.pcv_fixed,
            Field::DispatchingFixed => &mut input.dispatching_fixed,
            Field::DispatchingVar => &mut input.dispatching_var,
            Field::CapacityMarketVar => &mut input.capacity_market_var,
            Field::MonthlySmc => &mut input.monthly_smc,
            Field::PsvValue => &mut input.psv_value,
            Field::SpreadGas => &mut input.spread_gas,
            Field::GasPrice => &mut input.gas_price,
            Field::QvdFixed => &mut input.qvd_fixed,
            Field::GasTransportFixed => &mut input.gas_transport_fixed,
            Field::GasTransportVar => &mut input.gas_transport_var,
            _ => return None,
        })
    }

    fn number_mut(self, input: &mut BillInput) -> Option<&mut f64> {
        Some(match self {
            Field::PercContentF1 => &mut input.perc_content_f1,
            Field::PercContentF2 => &mut input.perc_content_f2,
            Field::PercContentF3 => &mut input.perc_content_f3,
            Field::PowerKw => &mut input.power_kw,
            _ => return None,
        })
    }

    /// 현재 값을 표시용 문자열로. 빈 값은 "-".
    pub fn display(self, input: &BillInput) -> String {
        match self {
            Field::TariffTypeLuce => tariff_name(input.tariff_type_luce).to_string(),
            Field::TariffTypeGas => tariff_name(input.tariff_type_gas).to_string(),
            Field::IsMultioraria => yes_no(input.is_multioraria).to_string(),
            Field::AutoDispatching => yes_no(input.auto_dispatching).to_string(),
            Field::IsResident => yes_no(input.is_resident).to_string(),
            Field::IncludeCanoneRai => yes_no(input.include_canone_rai).to_string(),
            Field::AutoGasTransport => yes_no(input.auto_gas_transport).to_string(),
            Field::PercContentF1 => input.perc_content_f1.to_string(),
            Field::PercContentF2 => input.perc_content_f2.to_string(),
            Field::PercContentF3 => input.perc_content_f3.to_string(),
            Field::PowerKw => input.power_kw.to_string(),
            _ => match self.amount(input) {
                Some(a) if !a.is_empty() => a.to_string(),
                _ => "-".to_string(),
            },
        }
    }

    /// 토글 항목을 뒤집는다. 토글이 아니면 아무것도 하지 않는다.
    pub fn toggle(self, input: &mut BillInput) {
        let flip = |t: TariffType| match t {
            TariffType::Fixed => TariffType::Variable,
            TariffType::Variable => TariffType::Fixed,
        };
        match self {
            Field::TariffTypeLuce => input.tariff_type_luce = flip(input.tariff_type_luce),
            Field::TariffTypeGas => input.tariff_type_gas = flip(input.tariff_type_gas),
            Field::IsMultioraria => input.is_multioraria = !input.is_multioraria,
            Field::AutoDispatching => input.auto_dispatching = !input.auto_dispatching,
            Field::IsResident => input.is_resident = !input.is_resident,
            Field::IncludeCanoneRai => input.include_canone_rai = !input.include_canone_rai,
            Field::AutoGasTransport => input.auto_gas_transport = !input.auto_gas_transport,
            _ => {}
        }
    }

    /// 입력 문자열을 항목에 반영한다. 선택적 항목은 빈 문자열로 비울 수 있다.
    pub fn apply(self, input: &mut BillInput, text: &str) -> Result<(), InvalidValue> {
        let invalid = || InvalidValue(text.trim().to_string());
        if let Some(slot) = self.amount_mut(input) {
            *slot = Amount::parse(text).map_err(|_| invalid())?;
            return Ok(());
        }
        if let Some(slot) = self.number_mut(input) {
            *slot = Amount::parse(text)
                .ok()
                .and_then(Amount::get)
                .ok_or_else(invalid)?;
            return Ok(());
        }
        self.toggle(input);
        Ok(())
    }
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator, mode: SimulationMode) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    println!("{} {}", tr.t(keys::MAIN_MENU_CURRENT_MODE), mode.to_string().to_uppercase());
    println!("{}", tr.t(keys::MAIN_MENU_SHOW_BREAKDOWN));
    println!("{}", tr.t(keys::MAIN_MENU_EDIT_INPUTS));
    println!("{}", tr.t(keys::MAIN_MENU_SWITCH_MODE));
    println!("{}", tr.t(keys::MAIN_MENU_ADVICE));
    println!("{}", tr.t(keys::MAIN_MENU_EXPORT));
    println!("{}", tr.t(keys::MAIN_MENU_SETTINGS));
    println!("{}", tr.t(keys::MAIN_MENU_EXIT));
    loop {
        let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::ShowBreakdown),
            "2" => return Ok(MenuChoice::EditInputs),
            "3" => return Ok(MenuChoice::SwitchMode),
            "4" => return Ok(MenuChoice::Advice),
            "5" => return Ok(MenuChoice::Export),
            "6" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 계산 내역을 텍스트로 만든다.
pub fn format_breakdown(tr: &Translator, breakdown: &BillBreakdown, mode: SimulationMode) -> String {
    let mut lines = vec![
        tr.t(keys::RESULT_HEADING).to_string(),
        format!("{} € {:.2}", tr.t(keys::RESULT_TOTAL), breakdown.total),
        format!(
            "{} € {:.2} ({:.0}%) | {} € {:.2}",
            tr.t(keys::RESULT_FIXED),
            breakdown.summary.fixed_total,
            breakdown.fixed_share() * 100.0,
            tr.t(keys::RESULT_VARIABLE),
            breakdown.summary.variable_total
        ),
        String::new(),
    ];
    for item in breakdown.categories(mode) {
        lines.push(format!("  {:<24} € {:>9.2}", item.label, item.value));
    }
    let m = &breakdown.materia_energia;
    let t = &breakdown.trasporto_gestione;
    lines.push(String::new());
    lines.push(tr.t(keys::RESULT_DETAIL).to_string());
    lines.push(format!("  Quota energia            € {:>9.2}", m.quota_energia));
    if mode.is_luce() {
        lines.push(format!("  Perdite di rete          € {:>9.2}", m.perdite_rete));
    }
    lines.push(format!("  Quota fissa vendita      € {:>9.2}", m.quota_fissa));
    if mode.is_luce() {
        lines.push(format!("  Dispacciamento           € {:>9.2}", m.dispacciamento));
        lines.push(format!("  Mercato capacità         € {:>9.2}", m.mercato_capacita));
    }
    lines.push(format!("  Trasporto quota fissa    € {:>9.2}", t.quota_fissa));
    if mode.is_luce() {
        lines.push(format!("  Trasporto quota potenza  € {:>9.2}", t.quota_potenza));
    }
    lines.push(format!("  Trasporto quota consumi  € {:>9.2}", t.quota_energia));
    if mode.is_luce() {
        lines.push(format!("  Oneri aggiuntivi UC3/UC6 € {:>9.2}", t.oneri_aggiuntivi));
    }
    lines.join("\n")
}

/// 입력 편집 메뉴를 처리한다. 엔터만 누르면 돌아간다.
pub fn handle_edit_inputs(tr: &Translator, input: &mut BillInput, mode: SimulationMode) -> Result<(), AppError> {
    let list = fields(mode);
    loop {
        println!("{}", tr.t(keys::EDIT_HEADING));
        for (i, field) in list.iter().enumerate() {
            println!("{:>2}) {:<36} {}", i + 1, field.label(), field.display(input));
        }
        let sel = read_line(tr.t(keys::EDIT_PROMPT_FIELD))?;
        let sel = sel.trim();
        if sel.is_empty() {
            return Ok(());
        }
        let Some(field) = sel
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| list.get(i).copied())
        else {
            println!("{}", tr.t(keys::INVALID_SELECTION_RETRY));
            continue;
        };

        if field.is_toggle() {
            field.toggle(input);
            println!("{} {} = {}", tr.t(keys::EDIT_PROMPT_TOGGLE), field.label(), field.display(input));
            continue;
        }
        let value = read_line(tr.t(keys::EDIT_PROMPT_VALUE))?;
        match field.apply(input, &value) {
            Ok(()) => {
                tracing::debug!(?field, value = %value.trim(), "input updated");
                println!("{}", tr.t(keys::EDIT_UPDATED));
            }
            Err(err) => {
                tracing::debug!(%err, "rejected input");
                println!("{}", tr.t(keys::ERROR_INVALID_NUMBER));
            }
        }
        if mode.is_luce() && input.is_multioraria {
            let sum = input.band_share_sum();
            if (sum - 100.0).abs() > 1e-9 {
                println!("{} {sum}%", tr.t(keys::EDIT_BAND_SHARE_WARNING));
            }
        }
    }
}

/// 설정 메뉴를 처리한다. 언어가 바뀌면 새 언어 코드를 돌려준다.
pub fn handle_settings(tr: &Translator, current: &str) -> Result<Option<String>, AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!("{} {current}", tr.t(keys::SETTINGS_CURRENT_LANGUAGE));
    println!("{}", tr.t(keys::SETTINGS_OPTIONS));
    let sel = read_line(tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    let lang = match sel.trim() {
        "" => return Ok(None),
        "1" => "it",
        "2" => "en",
        "3" => "auto",
        _ => {
            println!("{}", tr.t(keys::SETTINGS_INVALID));
            return Ok(None);
        }
    };
    println!("{} {lang}", tr.t(keys::SETTINGS_SAVED));
    Ok(Some(lang.to_string()))
}

/// 종료 확인. 세션 첫 종료 시에만 묻는다.
pub fn confirm_exit(tr: &Translator, ask: bool) -> Result<bool, AppError> {
    if !ask {
        return Ok(true);
    }
    println!("{}", tr.t(keys::EXIT_PROMPT_TITLE));
    println!("{}", tr.t(keys::EXIT_PROMPT_BODY));
    let answer = read_line(tr.t(keys::EXIT_PROMPT_CONFIRM))?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "s" | "si" | "sì" | "y" | "yes"))
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_field_can_be_emptied() {
        let mut input = BillInput::default();
        Field::EnergyPrice.apply(&mut input, "").unwrap();
        assert!(input.energy_price.is_empty());
        assert_eq!(Field::EnergyPrice.display(&input), "-");
        Field::EnergyPrice.apply(&mut input, "0,2").unwrap();
        assert_eq!(input.energy_price, Amount::new(0.2));
    }

    #[test]
    fn plain_number_field_rejects_empty() {
        let mut input = BillInput::default();
        assert_eq!(
            Field::PowerKw.apply(&mut input, " "),
            Err(InvalidValue(String::new()))
        );
        assert!(Field::PowerKw.apply(&mut input, "4.5").is_ok());
        assert_eq!(input.power_kw, 4.5);
    }

    #[test]
    fn toggles_flip_values() {
        let mut input = BillInput::default();
        Field::TariffTypeGas.toggle(&mut input);
        assert_eq!(input.tariff_type_gas, TariffType::Variable);
        Field::IsResident.apply(&mut input, "").unwrap();
        assert!(!input.is_resident);
    }

    #[test]
    fn every_field_belongs_to_one_mode() {
        for f in fields(SimulationMode::Luce) {
            assert!(!fields(SimulationMode::Gas).contains(f));
        }
        assert_eq!(fields(SimulationMode::Luce).len() + fields(SimulationMode::Gas).len(), 29);
    }

    #[test]
    fn gas_breakdown_hides_electricity_lines() {
        let tr = Translator::new("it");
        let b = crate::billing::compute_breakdown(
            &BillInput::default(),
            SimulationMode::Gas,
            &crate::billing::RateTable::default(),
        );
        let text = format_breakdown(&tr, &b, SimulationMode::Gas);
        assert!(text.contains("Materia Gas"));
        assert!(!text.contains("Dispacciamento"));
        assert!(!text.contains("Canone"));
    }
}
