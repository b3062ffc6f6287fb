use std::fmt::{self, Write};

use crate::billing::{BillBreakdown, BillInput, SimulationMode, TariffType};

/// 계약 형태 설명 문구.
pub fn tariff_label(input: &BillInput, mode: SimulationMode) -> &'static str {
    match mode {
        SimulationMode::Luce => match (input.tariff_type_luce, input.is_multioraria) {
            (TariffType::Variable, _) => "Variabile (Indicizzata PUN)",
            (TariffType::Fixed, true) => "Fissa Multioraria (F1/F2/F3)",
            (TariffType::Fixed, false) => "Fissa Monoraria",
        },
        SimulationMode::Gas => match input.tariff_type_gas {
            TariffType::Variable => "Variabile (Indicizzata PSV)",
            TariffType::Fixed => "Prezzo Fisso",
        },
    }
}

/// 단가 정보 줄들.
fn price_lines(input: &BillInput, mode: SimulationMode) -> Vec<String> {
    match mode {
        SimulationMode::Luce => match input.tariff_type_luce {
            TariffType::Variable => vec![
                format!("- Prezzo Index (PUN): {} €/kWh", input.pun_value),
                format!("- Spread/Fee: {} €/kWh", input.spread_luce),
            ],
            TariffType::Fixed if input.is_multioraria => vec![
                format!(
                    "- Prezzi Fissi per Fascia: F1 {}€, F2 {}€, F3 {}€",
                    input.energy_price_f1.value(),
                    input.energy_price_f2.value(),
                    input.energy_price_f3.value()
                ),
                format!(
                    "- Distribuzione Consumi: F1 {}%, F2 {}%, F3 {}%",
                    input.perc_content_f1, input.perc_content_f2, input.perc_content_f3
                ),
            ],
            TariffType::Fixed => vec![format!(
                "- Prezzo Fisso Monorario: {} €/kWh",
                input.energy_price.value()
            )],
        },
        SimulationMode::Gas => match input.tariff_type_gas {
            TariffType::Variable => vec![
                format!("- Prezzo Index (PSV): {} €/Smc", input.psv_value),
                format!("- Spread/Fee: {} €/Smc", input.spread_gas),
            ],
            TariffType::Fixed => vec![format!(
                "- Prezzo Fisso Materia Prima: {} €/Smc",
                input.gas_price.value()
            )],
        },
    }
}

/// AI 분석 요청 프롬프트를 만든다. 입력 조건과 계산 내역을 자연어로 요약한다.
pub fn build_prompt(input: &BillInput, breakdown: &BillBreakdown, mode: SimulationMode) -> String {
    let mut out = String::new();
    // String에 대한 쓰기는 실패하지 않는다
    let _ = write_prompt(&mut out, input, breakdown, mode);
    out
}

fn write_prompt(
    out: &mut String,
    input: &BillInput,
    breakdown: &BillBreakdown,
    mode: SimulationMode,
) -> fmt::Result {
    let type_label = match mode {
        SimulationMode::Luce => "Elettrica",
        SimulationMode::Gas => "del Gas",
    };
    writeln!(out, "Agisci come l'assistente virtuale ufficiale di \"BollettaChiara AI\".")?;
    writeln!(out, "Il tuo obiettivo è portare trasparenza nel mercato energetico italiano.")?;
    writeln!(out)?;
    writeln!(out, "Analizza i seguenti dati di una simulazione bolletta {type_label}:")?;
    writeln!(out)?;
    writeln!(out, "DATI GENERALI:")?;
    writeln!(
        out,
        "- Consumo Mensile: {} {}",
        input.consumption(mode),
        mode.unit()
    )?;
    writeln!(out, "- Costo Totale Stimato: {:.2} €", breakdown.total)?;
    writeln!(out)?;
    writeln!(out, "DETTAGLI TECNICI:")?;
    if mode.is_luce() {
        writeln!(out, "- Potenza Impegnata: {} kW", input.power_kw)?;
    }
    writeln!(out, "- Tipologia Contratto: {}", tariff_label(input, mode))?;
    for line in price_lines(input, mode) {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;
    writeln!(out, "BREAKDOWN COSTI:")?;
    writeln!(
        out,
        "- Materia Energia/Gas: {:.2}€",
        breakdown.materia_energia.total
    )?;
    writeln!(
        out,
        "- Trasporto e Gestione Contatore: {:.2}€",
        breakdown.trasporto_gestione.total
    )?;
    writeln!(
        out,
        "- Oneri di Sistema e Accise: {:.2}€",
        breakdown.oneri_e_imposte()
    )?;
    writeln!(out, "- IVA: {:.2}€", breakdown.iva)?;
    writeln!(out)?;
    writeln!(out, "RICHIESTA:")?;
    writeln!(out, "Fornisci un'analisi \"Chiara\" e 3 consigli pratici per il risparmio.")?;
    writeln!(out)?;
    writeln!(out, "ISTRUZIONI DI FORMATTAZIONE:")?;
    writeln!(out, "- Rispondi in testo semplice, leggibile in un terminale.")?;
    writeln!(out, "- Non usare Markdown né HTML.")?;
    writeln!(out, "- Usa elenchi numerati per i consigli.")?;
    if mode.is_luce() {
        let tariff = match input.tariff_type_luce {
            TariffType::Variable => "Variabile PUN",
            TariffType::Fixed => "Fissa",
        };
        writeln!(out)?;
        writeln!(out, "Analisi specifica richiesta nel testo:")?;
        writeln!(
            out,
            "1. Valuta il dimensionamento della potenza ({} kW).",
            input.power_kw
        )?;
        writeln!(
            out,
            "2. Commenta la convenienza della tariffa scelta ({tariff}) rispetto all'attuale mercato."
        )?;
    }
    writeln!(out)?;
    write!(out, "Usa uno stile professionale, empatico e molto diretto.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::{compute_breakdown, RateTable};

    #[test]
    fn electricity_prompt_mentions_power_and_total() {
        let input = BillInput::default();
        let b = compute_breakdown(&input, SimulationMode::Luce, &RateTable::default());
        let prompt = build_prompt(&input, &b, SimulationMode::Luce);
        assert!(prompt.contains("bolletta Elettrica"));
        assert!(prompt.contains("- Consumo Mensile: 220 kWh"));
        assert!(prompt.contains("- Potenza Impegnata: 3 kW"));
        assert!(prompt.contains("Fissa Monoraria"));
        assert!(prompt.contains(&format!("{:.2} €", b.total)));
    }

    #[test]
    fn gas_prompt_skips_power_analysis() {
        let input = BillInput {
            tariff_type_gas: TariffType::Variable,
            ..BillInput::default()
        };
        let b = compute_breakdown(&input, SimulationMode::Gas, &RateTable::default());
        let prompt = build_prompt(&input, &b, SimulationMode::Gas);
        assert!(prompt.contains("- Consumo Mensile: 100 Smc"));
        assert!(prompt.contains("Prezzo Index (PSV): 0.4 €/Smc"));
        assert!(!prompt.contains("Potenza"));
    }
}
