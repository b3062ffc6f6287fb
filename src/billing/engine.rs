use super::breakdown::{BillBreakdown, CostSummary, MateriaEnergia, TrasportoGestione};
use super::input::{BillInput, SimulationMode, TariffType};
use super::rates::RateTable;

/// 입력과 모드로 월 요금 내역을 계산한다.
///
/// 순수 함수다. 빈 숫자 입력은 0으로 간주하고, 음수 등 비정상 값도 보정 없이
/// 공식에 그대로 흘려보낸다. 같은 입력이면 항상 같은 결과를 낸다.
pub fn compute_breakdown(input: &BillInput, mode: SimulationMode, rates: &RateTable) -> BillBreakdown {
    match mode {
        SimulationMode::Luce => electricity(input, rates),
        SimulationMode::Gas => gas(input, rates),
    }
}

/// 전기 단가 [€/kWh]: 지수형 → PUN+스프레드, 시간대별 → 비율 가중 평균, 그 외 단일 단가.
pub fn electricity_unit_price(input: &BillInput) -> f64 {
    if input.tariff_type_luce == TariffType::Variable {
        return input.pun_value.value() + input.spread_luce.value();
    }
    if input.is_multioraria {
        // 비율 합이 100이 아니어도 정규화하지 않는다
        input.energy_price_f1.value() * (input.perc_content_f1 / 100.0)
            + input.energy_price_f2.value() * (input.perc_content_f2 / 100.0)
            + input.energy_price_f3.value() * (input.perc_content_f3 / 100.0)
    } else {
        input.energy_price.value()
    }
}

/// 가스 단가 [€/Smc].
pub fn gas_unit_price(input: &BillInput) -> f64 {
    match input.tariff_type_gas {
        TariffType::Variable => input.psv_value.value() + input.spread_gas.value(),
        TariffType::Fixed => input.gas_price.value(),
    }
}

fn electricity(input: &BillInput, rates: &RateTable) -> BillBreakdown {
    let r = &rates.electricity;
    let kwh = input.monthly_kwh.value();
    let price = electricity_unit_price(input);
    let kwh_with_losses = kwh * (1.0 + r.grid_loss_factor);

    let (disp_fixed, disp_var) = if input.auto_dispatching {
        (rates.dispatching.fixed, rates.dispatching.variable)
    } else {
        (input.dispatching_fixed.value(), input.dispatching_var.value())
    };
    // 0, 빈 값, NaN이면 기본 단가로 대체
    let capacity_rate = match input.capacity_market_var.value() {
        v if v == 0.0 || v.is_nan() => r.capacity_market_fallback,
        v => v,
    };

    let pcv = input.pcv_fixed.value();
    let quota_energia = kwh * price;
    let perdite_rete = kwh * r.grid_loss_factor * price;
    let dispacciamento = disp_fixed + kwh_with_losses * disp_var;
    let mercato_capacita = kwh_with_losses * capacity_rate;
    let materia_energia = MateriaEnergia {
        quota_energia,
        perdite_rete,
        quota_fissa: pcv,
        dispacciamento,
        mercato_capacita,
        total: quota_energia + perdite_rete + pcv + dispacciamento + mercato_capacita,
    };

    let transport_power = r.transport_power * input.power_kw;
    let transport_energy = r.transport_variable * kwh;
    let uc3 = r.uc3_rate * kwh;
    let uc6 = r.uc6_fixed_rate * input.power_kw + r.uc6_var_rate * kwh;
    let trasporto_gestione = TrasportoGestione {
        quota_fissa: r.transport_fixed,
        quota_potenza: transport_power,
        quota_energia: transport_energy,
        oneri_aggiuntivi: uc3 + uc6,
        total: r.transport_fixed + transport_power + transport_energy + uc3 + uc6,
    };

    let system_fixed = if input.is_resident {
        0.0
    } else {
        r.system_fixed_non_resident
    };
    let oneri_sistema = r.asos_rate * kwh + r.arim_rate * kwh + system_fixed;
    let imposte = r.excise_rate * kwh;

    let imponibile = materia_energia.total + trasporto_gestione.total + oneri_sistema + imposte;
    let iva = imponibile * r.iva_rate;
    let canone_rai = if input.include_canone_rai {
        r.canone_rai_monthly
    } else {
        0.0
    };
    let total = imponibile + iva + canone_rai;

    let fixed_total = pcv + disp_fixed + r.transport_fixed + transport_power + canone_rai;

    BillBreakdown {
        materia_energia,
        trasporto_gestione,
        oneri_sistema,
        imposte,
        iva,
        canone_rai,
        summary: CostSummary {
            fixed_total,
            variable_total: total - fixed_total,
        },
        total,
    }
}

fn gas(input: &BillInput, rates: &RateTable) -> BillBreakdown {
    let g = &rates.gas;
    let smc = input.monthly_smc.value();
    let price = gas_unit_price(input);
    let qvd = input.qvd_fixed.value();

    let (transport_fixed, transport_var) = if input.auto_gas_transport {
        (g.avg_transport_fixed, g.avg_transport_var)
    } else {
        (input.gas_transport_fixed.value(), input.gas_transport_var.value())
    };

    let quota_energia = smc * price;
    let materia_energia = MateriaEnergia {
        quota_energia,
        quota_fissa: qvd,
        total: quota_energia + qvd,
        ..MateriaEnergia::default()
    };

    let transport_volume = smc * transport_var;
    let trasporto_gestione = TrasportoGestione {
        quota_fissa: transport_fixed,
        quota_energia: transport_volume,
        total: transport_fixed + transport_volume,
        ..TrasportoGestione::default()
    };

    let imposte = smc * (g.excise_rate + g.regional_tax);
    let imponibile = materia_energia.total + trasporto_gestione.total + imposte;
    let iva = imponibile * rates.gas_iva_rate(smc);
    let total = imponibile + iva;
    let fixed_total = qvd + transport_fixed;

    BillBreakdown {
        materia_energia,
        trasporto_gestione,
        oneri_sistema: 0.0,
        imposte,
        iva,
        canone_rai: 0.0,
        summary: CostSummary {
            fixed_total,
            variable_total: total - fixed_total,
        },
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::input::Amount;

    #[test]
    fn variable_tariff_uses_index_plus_spread() {
        let input = BillInput {
            tariff_type_luce: TariffType::Variable,
            is_multioraria: true,
            ..BillInput::default()
        };
        assert!((electricity_unit_price(&input) - 0.12).abs() < 1e-12);
    }

    #[test]
    fn gas_variable_price() {
        let input = BillInput {
            tariff_type_gas: TariffType::Variable,
            ..BillInput::default()
        };
        assert!((gas_unit_price(&input) - 0.50).abs() < 1e-12);
    }

    #[test]
    fn capacity_fallback_applies_to_zero_and_empty() {
        let rates = RateTable::default();
        let zero = BillInput {
            capacity_market_var: Amount::new(0.0),
            ..BillInput::default()
        };
        let empty = BillInput {
            capacity_market_var: Amount::EMPTY,
            ..BillInput::default()
        };
        let a = compute_breakdown(&zero, SimulationMode::Luce, &rates);
        let b = compute_breakdown(&empty, SimulationMode::Luce, &rates);
        let expected = 220.0 * 1.102 * 0.005;
        assert!((a.materia_energia.mercato_capacita - expected).abs() < 1e-12);
        assert_eq!(a, b);
    }

    #[test]
    fn manual_dispatching_uses_overrides() {
        let input = BillInput {
            auto_dispatching: false,
            dispatching_fixed: Amount::new(1.0),
            dispatching_var: Amount::new(0.01),
            ..BillInput::default()
        };
        let b = compute_breakdown(&input, SimulationMode::Luce, &RateTable::default());
        let expected = 1.0 + 220.0 * 1.102 * 0.01;
        assert!((b.materia_energia.dispacciamento - expected).abs() < 1e-12);
    }

    #[test]
    fn non_resident_pays_system_fixed_fee() {
        let rates = RateTable::default();
        let resident = compute_breakdown(&BillInput::default(), SimulationMode::Luce, &rates);
        let other = compute_breakdown(
            &BillInput {
                is_resident: false,
                ..BillInput::default()
            },
            SimulationMode::Luce,
            &rates,
        );
        assert!((other.oneri_sistema - resident.oneri_sistema - 2.15).abs() < 1e-12);
        // 고정비 요약에는 포함하지 않는다
        assert_eq!(other.summary.fixed_total, resident.summary.fixed_total);
    }

    #[test]
    fn manual_gas_transport_uses_overrides() {
        let b = compute_breakdown(
            &BillInput {
                auto_gas_transport: false,
                ..BillInput::default()
            },
            SimulationMode::Gas,
            &RateTable::default(),
        );
        assert_eq!(b.trasporto_gestione.quota_fissa, 6.50);
        assert!((b.trasporto_gestione.quota_energia - 16.0).abs() < 1e-12);
    }
}
