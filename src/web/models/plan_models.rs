use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    Month,
    Year,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanView {
    pub name: String,
    pub price: f64,
    pub formatted_price: String,
    pub period: BillingPeriod,
    pub period_label: String,
    pub benefits_included: Vec<String>,
    pub benefits_not_included: Vec<String>,
    pub is_popular: bool,
    pub checkout_hint: String,
}
