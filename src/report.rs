//! 계산 결과를 텍스트 리포트로 내보낸다.

use chrono::NaiveDate;

use crate::billing::{BillBreakdown, BillInput, SimulationMode};

const RULE: &str = "--------------------------------------------------";

/// 리포트 파일 이름. 예: `BollettaChiara_AI_Report_Luce.txt`
pub fn report_file_name(mode: SimulationMode) -> String {
    let suffix = match mode {
        SimulationMode::Luce => "Luce",
        SimulationMode::Gas => "Gas",
    };
    format!("BollettaChiara_AI_Report_{suffix}.txt")
}

/// 시뮬레이션 리포트 본문을 만든다. 날짜는 호출 쪽에서 넘긴다(dd/mm/yyyy로 출력).
pub fn render_report(
    input: &BillInput,
    breakdown: &BillBreakdown,
    mode: SimulationMode,
    generated_on: NaiveDate,
) -> String {
    let (title, materia) = match mode {
        SimulationMode::Luce => ("LUCE", "Energia"),
        SimulationMode::Gas => ("GAS", "Gas"),
    };
    // 사용량은 입력 그대로 표시한다 (빈 값이면 공란)
    let consumption = match mode {
        SimulationMode::Luce => input.monthly_kwh,
        SimulationMode::Gas => input.monthly_smc,
    };

    let mut lines = vec![
        format!("BOLLETTA CHIARA AI - REPORT SIMULAZIONE {title}"),
        RULE.to_string(),
        format!("Consumo: {consumption} {}", mode.unit()),
        format!("Costo Totale Stimato: € {:.2}", breakdown.total),
        String::new(),
        "DETTAGLIO COSTI:".to_string(),
        format!("- Materia {materia}: € {:.2}", breakdown.materia_energia.total),
        format!(
            "- Trasporto e Gestione: € {:.2}",
            breakdown.trasporto_gestione.total
        ),
        format!("- Oneri di Sistema: € {:.2}", breakdown.oneri_sistema),
        format!("- Imposte e Accise: € {:.2}", breakdown.imposte),
        format!("- IVA: € {:.2}", breakdown.iva),
    ];
    if breakdown.canone_rai > 0.0 {
        lines.push(format!("- Canone RAI: € {:.2}", breakdown.canone_rai));
    }
    lines.extend([
        String::new(),
        "RIEPILOGO:".to_string(),
        format!(
            "- Quota Fissa (indipendente dai consumi): € {:.2}",
            breakdown.summary.fixed_total
        ),
        format!(
            "- Quota Variabile (legata ai consumi): € {:.2}",
            breakdown.summary.variable_total
        ),
        RULE.to_string(),
        format!(
            "Generato da BollettaChiara AI il {}",
            generated_on.format("%d/%m/%Y")
        ),
    ]);
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::{compute_breakdown, RateTable};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
    }

    #[test]
    fn electricity_report_lists_canone() {
        let input = BillInput::default();
        let b = compute_breakdown(&input, SimulationMode::Luce, &RateTable::default());
        let text = render_report(&input, &b, SimulationMode::Luce, date());
        assert!(text.starts_with("BOLLETTA CHIARA AI - REPORT SIMULAZIONE LUCE\n"));
        assert!(text.contains("Consumo: 220 kWh"));
        assert!(text.contains("- Canone RAI: € 7.50"));
        assert!(text.contains("Generato da BollettaChiara AI il 07/03/2026"));
    }

    #[test]
    fn gas_report_has_no_canone_line() {
        let input = BillInput::default();
        let b = compute_breakdown(&input, SimulationMode::Gas, &RateTable::default());
        let text = render_report(&input, &b, SimulationMode::Gas, date());
        assert!(text.contains("- Materia Gas: € 55.00"));
        assert!(!text.contains("Canone"));
    }

    #[test]
    fn file_name_per_mode() {
        assert_eq!(report_file_name(SimulationMode::Gas), "BollettaChiara_AI_Report_Gas.txt");
    }
}
