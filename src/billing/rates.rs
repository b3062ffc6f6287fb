use serde::{Deserialize, Serialize};

/// 전기 규제 요율(ARERA 기준). 단위는 €/kWh, €/kW, €/월.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectricityRates {
    /// 계통 손실 계수 (0.102 = 10.2%)
    pub grid_loss_factor: f64,
    pub transport_fixed: f64,
    pub transport_power: f64,
    pub transport_variable: f64,
    pub uc3_rate: f64,
    pub uc6_fixed_rate: f64,
    pub uc6_var_rate: f64,
    pub asos_rate: f64,
    pub arim_rate: f64,
    /// 비거주자 고정 계통비 [€/월]
    pub system_fixed_non_resident: f64,
    pub excise_rate: f64,
    pub iva_rate: f64,
    pub canone_rai_monthly: f64,
    /// 용량시장 단가가 0이거나 비었을 때 쓰는 값
    pub capacity_market_fallback: f64,
}

impl Default for ElectricityRates {
    fn default() -> Self {
        Self {
            grid_loss_factor: 0.102,
            transport_fixed: 1.72,
            transport_power: 1.79,
            transport_variable: 0.0085,
            uc3_rate: 0.0014,
            uc6_fixed_rate: 0.015,
            uc6_var_rate: 0.00005,
            asos_rate: 0.0285,
            arim_rate: 0.0016,
            system_fixed_non_resident: 2.15,
            excise_rate: 0.0227,
            iva_rate: 0.10,
            canone_rai_monthly: 7.50,
            capacity_market_fallback: 0.005,
        }
    }
}

/// ARERA 표준 급전(dispacciamento) 값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchingDefaults {
    /// [€/월]
    pub fixed: f64,
    /// [€/kWh]
    pub variable: f64,
}

impl Default for DispatchingDefaults {
    fn default() -> Self {
        Self {
            fixed: -0.916,
            variable: 0.0098,
        }
    }
}

/// 가스 세율과 평균 수송비.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasRates {
    /// 환산 계수 C. 현재 계산에서는 1로 고정되어 쓰이지 않는다.
    pub conversion_c: f64,
    /// 소비세 [€/Smc]
    pub excise_rate: f64,
    /// 지방 부가세 [€/Smc]
    pub regional_tax: f64,
    pub iva_low: f64,
    pub iva_standard: f64,
    /// 이 사용량 "미만"이면 저율 IVA 적용 [Smc/월]
    pub iva_low_threshold_smc: f64,
    pub avg_transport_fixed: f64,
    pub avg_transport_var: f64,
}

impl Default for GasRates {
    fn default() -> Self {
        Self {
            conversion_c: 1.0,
            excise_rate: 0.159,
            regional_tax: 0.020,
            iva_low: 0.10,
            iva_standard: 0.22,
            iva_low_threshold_smc: 40.0,
            avg_transport_fixed: 6.50,
            avg_transport_var: 0.18,
        }
    }
}

/// 계산 엔진이 참조하는 요율표 전체. `config.toml`의 `[rates]` 섹션에서 덮어쓸 수 있다.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    pub electricity: ElectricityRates,
    pub dispatching: DispatchingDefaults,
    pub gas: GasRates,
}

impl RateTable {
    /// 가스 사용량에 맞는 IVA 세율. 경계값(40 Smc)은 표준 세율이다.
    pub fn gas_iva_rate(&self, monthly_smc: f64) -> f64 {
        if monthly_smc < self.gas.iva_low_threshold_smc {
            self.gas.iva_low
        } else {
            self.gas.iva_standard
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_iva_bracket_is_strict() {
        let rates = RateTable::default();
        assert_eq!(rates.gas_iva_rate(39.99), 0.10);
        assert_eq!(rates.gas_iva_rate(40.0), 0.22);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let rates: RateTable = toml::from_str("[electricity]\niva_rate = 0.22\n").unwrap();
        assert_eq!(rates.electricity.iva_rate, 0.22);
        assert_eq!(rates.electricity.grid_loss_factor, 0.102);
        assert_eq!(rates.gas, GasRates::default());
    }
}
