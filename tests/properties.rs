//! Property tests for the payroll calculation rules.

use payroll_engine::calculation::{
    calculate_freelancer_withholding, calculate_insurance, calculate_payroll, floor_product,
    resolve_rates,
};
use payroll_engine::config::ConfigLoader;
use payroll_engine::models::{DeductionKind, PayrollInput, PayrollMonth, TaxType};
use proptest::prelude::*;
use proptest::test_runner::Config;
use rust_decimal::Decimal;

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/kr").expect("Failed to load config")
}

fn tax_type() -> impl Strategy<Value = TaxType> {
    prop_oneof![
        Just(TaxType::StatutoryFourInsurance),
        Just(TaxType::FlatWithholding),
    ]
}

fn month_from(offset: u32) -> PayrollMonth {
    // Months from 2025-01 through 2027-12
    PayrollMonth::new(2025 + (offset / 12) as i32, offset % 12 + 1).unwrap()
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn line_items_are_non_negative_and_totals_balance(
        base_pay in 0_i64..20_000_000_i64,
        offset in 0_u32..36_u32,
        dependents in 1_u32..6_u32,
        tax_type in tax_type(),
    ) {
        let loader = load_config();
        let input = PayrollInput {
            employee_id: "emp_prop".to_string(),
            base_pay: Decimal::from(base_pay),
            payroll_month: month_from(offset),
            tax_type,
            dependents_count: dependents,
        };

        let result = calculate_payroll(&input, loader.config()).expect("payroll");

        for amount in result.deductions.values() {
            prop_assert!(*amount >= Decimal::ZERO);
            prop_assert!(amount.fract().is_zero());
        }
        let total: Decimal = result.deductions.values().copied().sum();
        prop_assert_eq!(result.total_deductions, total);
        prop_assert_eq!(result.net_pay, result.base_pay - total);

        for (kind, amount) in &result.deductions {
            if kind.is_statutory_insurance() {
                prop_assert_eq!(result.employer_burden.get(kind), Some(amount));
            } else {
                prop_assert!(!result.employer_burden.contains_key(kind));
            }
        }
        prop_assert_eq!(
            result.total_labor_cost,
            result.base_pay + result.employer_burden_total().expect("burden total")
        );
        prop_assert_eq!(result.negative_net_pay, result.net_pay < Decimal::ZERO);
        prop_assert_eq!(
            result.audit_trace.has_warning("NEGATIVE_NET_PAY"),
            result.negative_net_pay
        );

        if tax_type == TaxType::FlatWithholding {
            prop_assert!(result.employer_burden.is_empty());
        }
    }

    #[test]
    fn repeated_calculation_gives_identical_amounts(
        base_pay in 0_i64..20_000_000_i64,
        offset in 0_u32..36_u32,
        tax_type in tax_type(),
    ) {
        let loader = load_config();
        let input = PayrollInput {
            employee_id: "emp_prop".to_string(),
            base_pay: Decimal::from(base_pay),
            payroll_month: month_from(offset),
            tax_type,
            dependents_count: 1,
        };

        let first = calculate_payroll(&input, loader.config()).expect("first");
        let second = calculate_payroll(&input, loader.config()).expect("second");

        prop_assert_eq!(first.deductions, second.deductions);
        prop_assert_eq!(first.net_pay, second.net_pay);
        prop_assert_eq!(first.employer_burden, second.employer_burden);
        prop_assert_eq!(first.applied_rate_month, second.applied_rate_month);
        prop_assert_eq!(first.audit_trace.steps, second.audit_trace.steps);
    }

    #[test]
    fn resolver_picks_latest_record_not_after_target(offset in 0_u32..36_u32) {
        let loader = load_config();
        let target = month_from(offset);

        let record = resolve_rates(loader.rate_table(), target).expect("resolve");

        prop_assert!(record.effective_month <= target);
        prop_assert!(
            !loader
                .rate_table()
                .iter()
                .any(|r| r.effective_month > record.effective_month && r.effective_month <= target)
        );
    }

    #[test]
    fn pension_stays_within_clamped_bounds(
        base_pay in 0_i64..50_000_000_i64,
        offset in 0_u32..36_u32,
    ) {
        let loader = load_config();
        let rates = resolve_rates(loader.rate_table(), month_from(offset)).expect("resolve");

        let contributions = calculate_insurance(Decimal::from(base_pay), rates).expect("insurance");

        let lowest = floor_product("min", rates.national_pension_min, rates.national_pension_rate)
            .expect("min");
        let highest = floor_product("max", rates.national_pension_max, rates.national_pension_rate)
            .expect("max");
        prop_assert!(contributions.national_pension >= lowest);
        prop_assert!(contributions.national_pension <= highest);
        prop_assert!(contributions.long_term_care <= contributions.health_insurance);
    }

    #[test]
    fn withholding_splits_base_pay_exactly(base_pay in 0_i64..100_000_000_i64) {
        let base_pay = Decimal::from(base_pay);

        let result = calculate_freelancer_withholding(base_pay, 1).expect("withholding");

        prop_assert_eq!(result.income_tax + result.local_income_tax + result.net_pay, base_pay);
        prop_assert!(result.local_income_tax * Decimal::from(10) <= result.income_tax);
        let deductions = result.to_deductions();
        prop_assert!(!deductions.contains_key(&DeductionKind::NationalPension));
    }
}
