use crate::currency::format_brl;
use crate::web::middleware::i18n::current_locale;
use crate::web::models::plan_models::{BillingPeriod, PlanView};

struct PlanSpec {
    name: &'static str,
    price: f64,
    period: BillingPeriod,
    is_popular: bool,
    /// How many entries of `BENEFITS` the plan includes, in order.
    included: usize,
}

const BENEFITS: [&str; 7] = [
    "Painel com saldo em tempo real",
    "Estratégias de cores pré-definidas",
    "Proteções com gales",
    "Stop win e stop loss automáticos",
    "Histórico de apostas",
    "Gráfico de evolução do saldo",
    "Suporte prioritário",
];

const PLANS: [PlanSpec; 3] = [
    PlanSpec {
        name: "Trial",
        price: 0.0,
        period: BillingPeriod::Month,
        is_popular: false,
        included: 4,
    },
    PlanSpec {
        name: "Mensal",
        price: 9.9,
        period: BillingPeriod::Month,
        is_popular: true,
        included: 6,
    },
    PlanSpec {
        name: "Anual",
        price: 108.9,
        period: BillingPeriod::Year,
        is_popular: false,
        included: 7,
    },
];

/// The subscription plans shown on the plans page.
pub fn catalog() -> Vec<PlanView> {
    let locale = current_locale();
    PLANS
        .iter()
        .map(|plan| {
            let (included, not_included) = BENEFITS.split_at(plan.included.min(BENEFITS.len()));
            let period_label = match plan.period {
                BillingPeriod::Month => t!("plans.period_month", locale = &locale),
                BillingPeriod::Year => t!("plans.period_year", locale = &locale),
            };
            PlanView {
                name: plan.name.to_string(),
                price: plan.price,
                formatted_price: format!("R$ {}", format_brl(plan.price)),
                period: plan.period,
                period_label: period_label.to_string(),
                benefits_included: included.iter().map(|b| b.to_string()).collect(),
                benefits_not_included: not_included.iter().map(|b| b.to_string()).collect(),
                is_popular: plan.is_popular,
                checkout_hint: t!("plans.checkout_hint", locale = &locale).to_string(),
            }
        })
        .collect()
}
