use serde::{Deserialize, Serialize};

use super::input::SimulationMode;

/// 에너지/가스 원자재 비용(materia energia).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MateriaEnergia {
    pub quota_energia: f64,
    /// 계통 손실분 (전기 전용)
    pub perdite_rete: f64,
    pub quota_fissa: f64,
    /// 전기 전용
    pub dispacciamento: f64,
    /// 전기 전용
    pub mercato_capacita: f64,
    pub total: f64,
}

/// 수송 및 계량기 관리 비용.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrasportoGestione {
    pub quota_fissa: f64,
    /// 계약 전력 비례분 (전기 전용)
    pub quota_potenza: f64,
    pub quota_energia: f64,
    /// UC3/UC6 등 부가 항목
    pub oneri_aggiuntivi: f64,
    pub total: f64,
}

/// 고정비/변동비 요약.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    /// 사용량과 무관한 부분
    pub fixed_total: f64,
    /// `total - fixed_total`
    pub variable_total: f64,
}

/// 한 번의 계산 결과. 입력이 바뀔 때마다 새로 만들어지며 수정하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillBreakdown {
    pub materia_energia: MateriaEnergia,
    pub trasporto_gestione: TrasportoGestione,
    /// 계통 부담금 (가스는 0)
    pub oneri_sistema: f64,
    /// 소비세/지방세
    pub imposte: f64,
    pub iva: f64,
    /// 공영방송 수신료 (가스는 0)
    pub canone_rai: f64,
    pub summary: CostSummary,
    pub total: f64,
}

/// 화면/리포트에 쓰이는 비용 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostCategory {
    Materia,
    Trasporto,
    Oneri,
    Imposte,
    Iva,
    Canone,
}

impl CostCategory {
    /// 화면 표시용 이름.
    pub fn label(self, mode: SimulationMode) -> &'static str {
        match (self, mode) {
            (CostCategory::Materia, SimulationMode::Luce) => "Materia Energia",
            (CostCategory::Materia, SimulationMode::Gas) => "Materia Gas",
            (CostCategory::Trasporto, _) => "Trasporto e Gestione",
            (CostCategory::Oneri, _) => "Oneri di Sistema",
            (CostCategory::Imposte, _) => "Imposte e Accise",
            (CostCategory::Iva, SimulationMode::Luce) => "IVA (10%)",
            (CostCategory::Iva, SimulationMode::Gas) => "IVA (mista)",
            (CostCategory::Canone, _) => "Canone RAI",
        }
    }
}

/// 구분별 금액 한 줄.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryAmount {
    pub category: CostCategory,
    pub label: &'static str,
    pub value: f64,
}

impl BillBreakdown {
    /// 구분별 금액 목록. 수신료는 0보다 클 때만 포함한다.
    pub fn categories(&self, mode: SimulationMode) -> Vec<CategoryAmount> {
        let mut items = vec![
            (CostCategory::Materia, self.materia_energia.total),
            (CostCategory::Trasporto, self.trasporto_gestione.total),
            (CostCategory::Oneri, self.oneri_sistema),
            (CostCategory::Imposte, self.imposte),
            (CostCategory::Iva, self.iva),
        ];
        if self.canone_rai > 0.0 {
            items.push((CostCategory::Canone, self.canone_rai));
        }
        items
            .into_iter()
            .map(|(category, value)| CategoryAmount {
                category,
                label: category.label(mode),
                value,
            })
            .collect()
    }

    /// 계통 부담금 + 세금.
    pub fn oneri_e_imposte(&self) -> f64 {
        self.oneri_sistema + self.imposte
    }

    /// 전체 중 고정비 비율(0~1). 합계가 0이면 0.
    pub fn fixed_share(&self) -> f64 {
        if self.total == 0.0 {
            0.0
        } else {
            self.summary.fixed_total / self.total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canone_only_listed_when_positive() {
        let mut b = BillBreakdown::default();
        assert_eq!(b.categories(SimulationMode::Gas).len(), 5);
        b.canone_rai = 7.5;
        let items = b.categories(SimulationMode::Luce);
        assert_eq!(items.len(), 6);
        assert_eq!(items[5].label, "Canone RAI");
    }

    #[test]
    fn serializes_with_camel_case_names() {
        let json = serde_json::to_value(BillBreakdown::default()).unwrap();
        assert!(json.get("materiaEnergia").is_some());
        assert!(json["trasportoGestione"].get("oneriAggiuntivi").is_some());
        assert!(json["summary"].get("fixedTotal").is_some());
    }
}
