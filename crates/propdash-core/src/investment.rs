//! Rental property investment metrics

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::stats::percentage;

/// Purchase and operating assumptions for one property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentInputs {
    pub purchase_price: f64,
    pub down_payment: f64,
    /// Annual interest rate in percent, e.g. 6.0
    pub interest_rate: f64,
    pub loan_term_years: u32,
    pub monthly_rent: f64,
    /// Operating costs per month: service charges, maintenance, insurance
    #[serde(default)]
    pub monthly_expenses: f64,
    #[serde(default)]
    pub closing_costs: f64,
    /// Expected annual appreciation in percent
    #[serde(default)]
    pub appreciation_rate: f64,
}

impl InvestmentInputs {
    /// Reject inputs the formulas cannot give a meaningful answer for
    pub fn validate(&self) -> CoreResult<()> {
        let non_negative = [
            ("purchasePrice", self.purchase_price),
            ("downPayment", self.down_payment),
            ("interestRate", self.interest_rate),
            ("monthlyRent", self.monthly_rent),
            ("monthlyExpenses", self.monthly_expenses),
            ("closingCosts", self.closing_costs),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidInput {
                    message: format!("{} must be a non-negative number", field),
                });
            }
        }
        if self.down_payment > self.purchase_price {
            return Err(CoreError::InvalidInput {
                message: "downPayment cannot exceed purchasePrice".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentMetrics {
    pub loan_amount: f64,
    pub monthly_payment: f64,
    /// Interest paid over the full loan term
    pub total_interest: f64,
    pub monthly_cash_flow: f64,
    pub annual_cash_flow: f64,
    /// Annual rent minus annual operating expenses, before debt service
    pub net_operating_income: f64,
    pub cap_rate: f64,
    /// Down payment plus closing costs
    pub cash_invested: f64,
    pub cash_on_cash_return: f64,
    /// Value gained in one year at the appreciation rate
    pub appreciation_value: f64,
    pub total_roi: f64,
}

/// Fixed-rate annuity payment for `loan` over `months` at `annual_rate` percent
pub fn monthly_payment(loan: f64, annual_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return 0.0;
    }
    let n = f64::from(months);
    let c = annual_rate / 100.0 / 12.0;
    if c == 0.0 {
        return loan / n;
    }
    let growth = (1.0 + c).powf(n);
    loan * (c * growth) / (growth - 1.0)
}

pub fn investment_metrics(inputs: &InvestmentInputs) -> InvestmentMetrics {
    let loan_amount = inputs.purchase_price - inputs.down_payment;
    let months = inputs.loan_term_years.saturating_mul(12);
    let payment = monthly_payment(loan_amount, inputs.interest_rate, months);
    let total_interest = if months == 0 {
        0.0
    } else {
        payment * f64::from(months) - loan_amount
    };

    let monthly_cash_flow = inputs.monthly_rent - inputs.monthly_expenses - payment;
    let annual_cash_flow = monthly_cash_flow * 12.0;
    let net_operating_income = (inputs.monthly_rent - inputs.monthly_expenses) * 12.0;
    let cash_invested = inputs.down_payment + inputs.closing_costs;
    let appreciation_value = inputs.purchase_price * inputs.appreciation_rate / 100.0;

    InvestmentMetrics {
        loan_amount,
        monthly_payment: payment,
        total_interest,
        monthly_cash_flow,
        annual_cash_flow,
        net_operating_income,
        cap_rate: percentage(net_operating_income, inputs.purchase_price),
        cash_invested,
        cash_on_cash_return: percentage(annual_cash_flow, cash_invested),
        appreciation_value,
        total_roi: percentage(annual_cash_flow + appreciation_value, cash_invested),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> InvestmentInputs {
        InvestmentInputs {
            purchase_price: 250_000.0,
            down_payment: 50_000.0,
            interest_rate: 6.0,
            loan_term_years: 30,
            monthly_rent: 2_000.0,
            monthly_expenses: 300.0,
            closing_costs: 5_000.0,
            appreciation_rate: 3.0,
        }
    }

    #[test]
    fn test_monthly_payment_annuity() {
        let payment = monthly_payment(200_000.0, 6.0, 360);
        assert!((payment - 1199.10).abs() < 0.01, "payment was {}", payment);
    }

    #[test]
    fn test_monthly_payment_zero_rate() {
        assert_eq!(monthly_payment(120_000.0, 0.0, 120), 1000.0);
        assert_eq!(monthly_payment(120_000.0, 5.0, 0), 0.0);
    }

    #[test]
    fn test_investment_metrics() {
        let metrics = investment_metrics(&inputs());
        assert_eq!(metrics.loan_amount, 200_000.0);
        assert!((metrics.monthly_payment - 1199.10).abs() < 0.01);
        assert_eq!(metrics.net_operating_income, 20_400.0);
        assert!((metrics.cap_rate - 8.16).abs() < 1e-9);
        assert_eq!(metrics.cash_invested, 55_000.0);
        assert_eq!(metrics.appreciation_value, 7_500.0);

        let expected_cash_flow = (2_000.0 - 300.0 - metrics.monthly_payment) * 12.0;
        assert!((metrics.annual_cash_flow - expected_cash_flow).abs() < 1e-9);
        assert!((metrics.cash_on_cash_return - expected_cash_flow / 55_000.0 * 100.0).abs() < 1e-9);
        assert!((metrics.total_roi - (expected_cash_flow + 7_500.0) / 55_000.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_cash_purchase_has_no_nan() {
        let mut all_cash = inputs();
        all_cash.down_payment = 250_000.0;
        all_cash.closing_costs = 0.0;
        all_cash.interest_rate = 0.0;
        let metrics = investment_metrics(&all_cash);
        assert_eq!(metrics.monthly_payment, 0.0);
        assert_eq!(metrics.total_interest, 0.0);
        assert!(metrics.total_roi.is_finite());

        let mut nothing = inputs();
        nothing.purchase_price = 0.0;
        nothing.down_payment = 0.0;
        nothing.closing_costs = 0.0;
        let metrics = investment_metrics(&nothing);
        assert_eq!(metrics.cap_rate, 0.0);
        assert_eq!(metrics.cash_on_cash_return, 0.0);
    }

    #[test]
    fn test_validate() {
        assert!(inputs().validate().is_ok());
        let mut bad = inputs();
        bad.down_payment = 300_000.0;
        assert!(bad.validate().is_err());
        bad = inputs();
        bad.monthly_rent = f64::NAN;
        assert!(bad.validate().is_err());
    }
}
