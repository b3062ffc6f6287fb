use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// 비어 있을 수 있는 숫자 입력값.
///
/// 입력 화면에서 지운 칸은 0과 구분되는 "빈 값"으로 남는다. 계산 시점에만
/// [`Amount::value`]로 0으로 간주하며, 저장된 입력 자체는 바꾸지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Amount(Option<f64>);

impl Amount {
    /// 빈 값.
    pub const EMPTY: Amount = Amount(None);

    pub const fn new(value: f64) -> Self {
        Amount(Some(value))
    }

    /// 계산용 값. 빈 값은 0으로 본다.
    pub fn value(self) -> f64 {
        self.0.unwrap_or(0.0)
    }

    pub fn get(self) -> Option<f64> {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0.is_none()
    }

    /// 사용자가 입력한 문자열을 해석한다. 공백뿐이면 빈 값, 소수점 쉼표(0,125)도 허용한다.
    pub fn parse(text: &str) -> Result<Self, std::num::ParseFloatError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Amount::EMPTY);
        }
        trimmed.replace(',', ".").parse::<f64>().map(Amount::new)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => Ok(()),
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_none(),
        }
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, an empty string or null")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        Ok(Amount::new(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount::new(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount::new(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::parse(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_none<E: de::Error>(self) -> Result<Amount, E> {
        Ok(Amount::EMPTY)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Amount, E> {
        Ok(Amount::EMPTY)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Amount, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

/// 시뮬레이션 대상(전기/가스).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMode {
    #[default]
    Luce,
    Gas,
}

impl SimulationMode {
    /// 사용량 단위.
    pub fn unit(self) -> &'static str {
        match self {
            SimulationMode::Luce => "kWh",
            SimulationMode::Gas => "Smc",
        }
    }

    pub fn is_luce(self) -> bool {
        self == SimulationMode::Luce
    }

    pub fn toggled(self) -> Self {
        match self {
            SimulationMode::Luce => SimulationMode::Gas,
            SimulationMode::Gas => SimulationMode::Luce,
        }
    }
}

impl fmt::Display for SimulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationMode::Luce => f.write_str("luce"),
            SimulationMode::Gas => f.write_str("gas"),
        }
    }
}

impl FromStr for SimulationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "luce" | "electricity" | "power" => Ok(SimulationMode::Luce),
            "gas" => Ok(SimulationMode::Gas),
            other => Err(format!("unknown mode '{other}' (expected luce or gas)")),
        }
    }
}

/// 요금 방식. `Fixed`는 고정 단가, `Variable`은 지수(PUN/PSV) + 스프레드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TariffType {
    #[default]
    Fixed,
    Variable,
}

/// 시장 구분. 계산에는 쓰이지 않고 설명용으로만 보관한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    #[default]
    Free,
    Protected,
}

/// 사용자가 입력한 요금 시뮬레이션 조건. 전기와 가스 항목을 함께 가진다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BillInput {
    // 전기
    pub tariff_type_luce: TariffType,
    /// PUN 지수 [€/kWh]
    pub pun_value: Amount,
    pub spread_luce: Amount,

    /// 월 사용량 [kWh]
    pub monthly_kwh: Amount,
    /// true면 F1/F2/F3 시간대별 단가 사용
    pub is_multioraria: bool,
    /// 단일 단가 [€/kWh]
    pub energy_price: Amount,
    pub energy_price_f1: Amount,
    pub energy_price_f2: Amount,
    pub energy_price_f3: Amount,
    /// 시간대별 사용 비율 [%]. 합이 100이 아니어도 보정하지 않는다.
    pub perc_content_f1: f64,
    pub perc_content_f2: f64,
    pub perc_content_f3: f64,

    /// 계약 전력 [kW]
    pub power_kw: f64,
    /// 판매 고정비(PCV) [€/월]
    pub pcv_fixed: Amount,
    pub dispatching_fixed: Amount,
    pub dispatching_var: Amount,
    /// 용량시장 단가 [€/kWh]. 0 또는 빈 값이면 기본값 사용
    pub capacity_market_var: Amount,
    pub is_resident: bool,
    pub include_canone_rai: bool,
    pub market_type: MarketType,
    /// true면 ARERA 기본 급전(dispacciamento) 값 사용
    pub auto_dispatching: bool,

    // 가스
    pub tariff_type_gas: TariffType,
    /// PSV 지수 [€/Smc]
    pub psv_value: Amount,
    pub spread_gas: Amount,

    /// 월 사용량 [Smc]
    pub monthly_smc: Amount,
    pub gas_price: Amount,
    /// QVD 판매 고정비 [€/월]
    pub qvd_fixed: Amount,
    /// true면 평균 수송비 기본값 사용
    pub auto_gas_transport: bool,
    pub gas_transport_fixed: Amount,
    pub gas_transport_var: Amount,
}

impl Default for BillInput {
    fn default() -> Self {
        Self {
            tariff_type_luce: TariffType::Fixed,
            pun_value: Amount::new(0.10),
            spread_luce: Amount::new(0.02),

            monthly_kwh: Amount::new(220.0),
            is_multioraria: false,
            energy_price: Amount::new(0.125),
            energy_price_f1: Amount::new(0.145),
            energy_price_f2: Amount::new(0.135),
            energy_price_f3: Amount::new(0.110),
            perc_content_f1: 33.0,
            perc_content_f2: 33.0,
            perc_content_f3: 34.0,

            power_kw: 3.0,
            pcv_fixed: Amount::new(12.00),
            dispatching_fixed: Amount::new(-0.916),
            dispatching_var: Amount::new(0.012),
            capacity_market_var: Amount::new(0.005),
            is_resident: true,
            include_canone_rai: true,
            market_type: MarketType::Free,
            auto_dispatching: true,

            tariff_type_gas: TariffType::Fixed,
            psv_value: Amount::new(0.40),
            spread_gas: Amount::new(0.10),

            monthly_smc: Amount::new(100.0),
            gas_price: Amount::new(0.45),
            qvd_fixed: Amount::new(10.00),
            auto_gas_transport: true,
            gas_transport_fixed: Amount::new(6.50),
            gas_transport_var: Amount::new(0.16),
        }
    }
}

impl BillInput {
    /// 모드별 월 사용량(빈 값은 0).
    pub fn consumption(&self, mode: SimulationMode) -> f64 {
        match mode {
            SimulationMode::Luce => self.monthly_kwh.value(),
            SimulationMode::Gas => self.monthly_smc.value(),
        }
    }

    /// 시간대별 비율 합계 [%].
    pub fn band_share_sum(&self) -> f64 {
        self.perc_content_f1 + self.perc_content_f2 + self.perc_content_f3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_parse_handles_empty_and_comma() {
        assert_eq!(Amount::parse("  ").unwrap(), Amount::EMPTY);
        assert_eq!(Amount::parse("0,125").unwrap(), Amount::new(0.125));
        assert!(Amount::parse("abc").is_err());
    }

    #[test]
    fn empty_amount_is_zero_only_at_use() {
        let a = Amount::EMPTY;
        assert_eq!(a.value(), 0.0);
        assert!(a.is_empty());
        assert_ne!(a, Amount::new(0.0));
    }

    #[test]
    fn input_accepts_empty_string_and_null() {
        let json = r#"{"monthlyKwh": "", "energyPrice": null, "pcvFixed": 9}"#;
        let input: BillInput = serde_json::from_str(json).unwrap();
        assert!(input.monthly_kwh.is_empty());
        assert!(input.energy_price.is_empty());
        assert_eq!(input.pcv_fixed, Amount::new(9.0));
        // 명시하지 않은 항목은 기본값
        assert_eq!(input.monthly_smc, Amount::new(100.0));
    }

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("LUCE".parse::<SimulationMode>().unwrap(), SimulationMode::Luce);
        assert_eq!("gas".parse::<SimulationMode>().unwrap(), SimulationMode::Gas);
        assert!("water".parse::<SimulationMode>().is_err());
        assert_eq!(SimulationMode::Luce.toggled(), SimulationMode::Gas);
    }
}
