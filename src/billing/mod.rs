//! 이탈리아 전기/가스 요금 계산 엔진.

pub mod breakdown;
pub mod engine;
pub mod input;
pub mod rates;

pub use breakdown::{BillBreakdown, CategoryAmount, CostCategory, CostSummary, MateriaEnergia, TrasportoGestione};
pub use engine::{compute_breakdown, electricity_unit_price, gas_unit_price};
pub use input::{Amount, BillInput, MarketType, SimulationMode, TariffType};
pub use rates::{DispatchingDefaults, ElectricityRates, GasRates, RateTable};
