use crate::config::{
    MAX_ANNUAL_RATE, MAX_PRINCIPAL, MAX_TERM_YEARS, MIN_ANNUAL_RATE, MIN_PRINCIPAL,
    MIN_TERM_YEARS, MONTHS_IN_YEAR, PERCENT,
};
use crate::error::{MortgageError, Result};
use log::{debug, trace};
use std::fmt;

/// Validated inputs for a single fixed-rate mortgage.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLoanParameters"))]
pub struct LoanParameters {
    principal: u32,
    annual_rate: f64,
    term_years: u8,
}

impl LoanParameters {
    /// Checks every field against its accepted range. A zero, negative or
    /// non-finite rate is `InvalidRate` rather than `RateOutOfRange`.
    pub fn new(principal: u32, annual_rate: f64, term_years: u8) -> Result<Self> {
        if !(MIN_PRINCIPAL..=MAX_PRINCIPAL).contains(&principal) {
            return Err(MortgageError::PrincipalOutOfRange {
                principal,
                min: MIN_PRINCIPAL,
                max: MAX_PRINCIPAL,
            });
        }
        if !annual_rate.is_finite() || annual_rate <= 0. {
            return Err(MortgageError::InvalidRate { rate: annual_rate });
        }
        if !(MIN_ANNUAL_RATE..=MAX_ANNUAL_RATE).contains(&annual_rate) {
            return Err(MortgageError::RateOutOfRange {
                rate: annual_rate,
                min: MIN_ANNUAL_RATE,
                max: MAX_ANNUAL_RATE,
            });
        }
        if !(MIN_TERM_YEARS..=MAX_TERM_YEARS).contains(&term_years) {
            return Err(MortgageError::TermOutOfRange {
                years: term_years,
                min: MIN_TERM_YEARS,
                max: MAX_TERM_YEARS,
            });
        }

        Ok(Self {
            principal,
            annual_rate,
            term_years,
        })
    }

    pub fn principal(&self) -> u32 {
        self.principal
    }

    /// annual rate as a percentage, i.e. 5.5 for 5.5%
    pub fn annual_rate(&self) -> f64 {
        self.annual_rate
    }

    pub fn term_years(&self) -> u8 {
        self.term_years
    }
}

// deserialized fields go through `LoanParameters::new`
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawLoanParameters {
    principal: u32,
    annual_rate: f64,
    term_years: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLoanParameters> for LoanParameters {
    type Error = MortgageError;

    fn try_from(raw: RawLoanParameters) -> Result<Self> {
        Self::new(raw.principal, raw.annual_rate, raw.term_years)
    }
}

impl fmt::Display for LoanParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "principal ${}, annual rate {}%, term {} years",
            self.principal, self.annual_rate, self.term_years
        )
    }
}

/// Monthly payment plus the balance left after each payment 1..=n.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmortizationSchedule {
    pub monthly_payment: f64,
    pub balances: Vec<f64>,
}

/// Standard fixed-rate, fixed-term, monthly compounding amortization.
///
/// Every query is recomputed from the loan parameters; nothing is cached.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Mortgage {
    params: LoanParameters,
}

impl Mortgage {
    pub fn new(params: LoanParameters) -> Self {
        debug!("new mortgage: {}", params);
        Self { params }
    }

    pub fn params(&self) -> &LoanParameters {
        &self.params
    }

    pub fn monthly_interest_rate(&self) -> f64 {
        self.params.annual_rate / PERCENT / MONTHS_IN_YEAR as f64
    }

    pub fn number_of_payments(&self) -> u32 {
        self.params.term_years as u32 * MONTHS_IN_YEAR
    }

    /// Level payment that retires the principal in `number_of_payments`
    /// months. Not rounded.
    pub fn monthly_payment(&self) -> f64 {
        let rate = self.monthly_interest_rate();
        let factor = self.growth_factor(self.number_of_payments());

        self.params.principal as f64 * (rate * factor) / (factor - 1.)
    }

    /// Principal still owed right after payment number `payments_made`.
    /// `0` yields the full principal and `number_of_payments()` yields zero.
    pub fn remaining_balance(&self, payments_made: u32) -> Result<f64> {
        let number_of_payments = self.number_of_payments();
        if payments_made > number_of_payments {
            return Err(MortgageError::PaymentOutOfRange {
                payments_made,
                number_of_payments,
            });
        }

        Ok(self.balance_after(payments_made))
    }

    /// Balances after payments 1 through `number_of_payments()`; the opening
    /// principal is not included.
    pub fn full_schedule(&self) -> Vec<f64> {
        (1..=self.number_of_payments())
            .map(|month| self.balance_after(month))
            .collect()
    }

    pub fn schedule(&self) -> AmortizationSchedule {
        AmortizationSchedule {
            monthly_payment: self.monthly_payment(),
            balances: self.full_schedule(),
        }
    }

    pub fn total_paid(&self) -> f64 {
        self.monthly_payment() * self.number_of_payments() as f64
    }

    pub fn total_interest(&self) -> f64 {
        self.total_paid() - self.params.principal as f64
    }

    // caller keeps payments_made within 0..=number_of_payments()
    fn balance_after(&self, payments_made: u32) -> f64 {
        let total_factor = self.growth_factor(self.number_of_payments());
        let paid_factor = self.growth_factor(payments_made);
        let balance =
            self.params.principal as f64 * (total_factor - paid_factor) / (total_factor - 1.);
        trace!("pmt # {}, remaining balance {}", payments_made, balance);

        balance
    }

    // (1 + r)^periods
    fn growth_factor(&self, periods: u32) -> f64 {
        (1. + self.monthly_interest_rate()).powi(periods as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::{LoanParameters, Mortgage};
    use crate::error::MortgageError;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use test_log::test;

    fn mortgage(principal: u32, annual_rate: f64, term_years: u8) -> Mortgage {
        Mortgage::new(LoanParameters::new(principal, annual_rate, term_years).unwrap())
    }

    #[test]
    fn test_thirty_year_loan() {
        let loan = mortgage(200_000, 6., 30);

        assert_abs_diff_eq!(loan.monthly_interest_rate(), 0.005, epsilon = 1e-12);
        assert_eq!(loan.number_of_payments(), 360);
        assert_abs_diff_eq!(loan.monthly_payment(), 1199.10, epsilon = 0.01);
        assert_abs_diff_eq!(loan.remaining_balance(1).unwrap(), 199_800.90, epsilon = 0.01);
        assert_abs_diff_eq!(loan.remaining_balance(360).unwrap(), 0., epsilon = 1e-6);
    }

    #[test]
    fn test_one_year_loan() {
        let loan = mortgage(100_000, 12., 1);

        assert_eq!(loan.number_of_payments(), 12);
        assert_abs_diff_eq!(loan.monthly_interest_rate(), 0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(loan.monthly_payment(), 8884.88, epsilon = 0.01);
    }

    #[test]
    fn test_remaining_balance_endpoints() {
        for (principal, rate, years) in [
            (1_000, 1., 1),
            (250_000, 5.5, 15),
            (1_000_000, 30., 30),
            (75_000, 3.25, 7),
        ] {
            let loan = mortgage(principal, rate, years);
            let n = loan.number_of_payments();

            assert_relative_eq!(
                loan.remaining_balance(0).unwrap(),
                principal as f64,
                max_relative = 1e-9
            );
            assert_abs_diff_eq!(
                loan.remaining_balance(n).unwrap(),
                0.,
                epsilon = principal as f64 * 1e-6
            );
        }
    }

    #[test]
    fn test_remaining_balance_past_term() {
        let loan = mortgage(200_000, 6., 30);

        match loan.remaining_balance(361) {
            Err(MortgageError::PaymentOutOfRange {
                payments_made,
                number_of_payments,
            }) => {
                assert_eq!(payments_made, 361);
                assert_eq!(number_of_payments, 360);
            }
            other => panic!("expected PaymentOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_full_schedule_shape() {
        for years in [1, 30] {
            let loan = mortgage(200_000, 6., years);
            let schedule = loan.full_schedule();

            assert_eq!(schedule.len(), years as usize * 12);
            assert!(schedule.iter().all(|balance| balance.is_finite()));
            assert!(schedule.windows(2).all(|pair| pair[1] <= pair[0]));
            assert!(schedule[0] < 200_000.);
            assert_abs_diff_eq!(*schedule.last().unwrap(), 0., epsilon = 1e-6);
        }
    }

    #[test]
    fn test_full_schedule_matches_remaining_balance() {
        let loan = mortgage(320_000, 4.75, 20);

        for (i, balance) in loan.full_schedule().iter().enumerate() {
            let expected = loan.remaining_balance(i as u32 + 1).unwrap();
            assert_relative_eq!(*balance, expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_totals() {
        let loan = mortgage(200_000, 6., 30);
        let n = loan.number_of_payments() as f64;

        assert!(loan.monthly_payment() > 0.);
        assert!(loan.total_paid() > 200_000.);
        assert_relative_eq!(loan.total_paid(), loan.monthly_payment() * n);
        assert_relative_eq!(
            loan.total_interest(),
            loan.monthly_payment() * n - 200_000.,
            max_relative = 1e-12
        );

    }

    #[test]
    fn test_payments_retire_principal() {
        for (principal, rate, years) in [(200_000, 6., 30), (100_000, 12., 1), (1_000, 30., 30)] {
            let loan = mortgage(principal, rate, years);
            let r = loan.monthly_interest_rate();
            let pmt = loan.monthly_payment();

            // carry the balance forward one month at a time
            let mut balance = principal as f64;
            let mut interest_paid = 0.;
            for month in 1..=loan.number_of_payments() {
                let interest = balance * r;
                interest_paid += interest;
                balance = balance + interest - pmt;
                assert_abs_diff_eq!(
                    balance,
                    loan.remaining_balance(month).unwrap(),
                    epsilon = principal as f64 * 1e-8
                );
            }

            assert_abs_diff_eq!(balance, 0., epsilon = principal as f64 * 1e-8);
            assert_relative_eq!(interest_paid, loan.total_interest(), max_relative = 1e-8);
        }
    }

    #[test]
    fn test_schedule_bundle() {
        let loan = mortgage(150_000, 7., 10);
        let schedule = loan.schedule();

        assert_eq!(schedule.monthly_payment, loan.monthly_payment());
        assert_eq!(schedule.balances, loan.full_schedule());
    }

    #[test]
    fn test_rejects_degenerate_rate() {
        for rate in [0., -2.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                LoanParameters::new(200_000, rate, 30),
                Err(MortgageError::InvalidRate { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_out_of_range_parameters() {
        assert!(matches!(
            LoanParameters::new(999, 6., 30),
            Err(MortgageError::PrincipalOutOfRange { .. })
        ));
        assert!(matches!(
            LoanParameters::new(1_000_001, 6., 30),
            Err(MortgageError::PrincipalOutOfRange { .. })
        ));
        assert!(matches!(
            LoanParameters::new(200_000, 0.5, 30),
            Err(MortgageError::RateOutOfRange { .. })
        ));
        assert!(matches!(
            LoanParameters::new(200_000, 30.01, 30),
            Err(MortgageError::RateOutOfRange { .. })
        ));
        assert!(matches!(
            LoanParameters::new(200_000, 6., 0),
            Err(MortgageError::TermOutOfRange { .. })
        ));
        assert!(matches!(
            LoanParameters::new(200_000, 6., 31),
            Err(MortgageError::TermOutOfRange { .. })
        ));
    }

    #[test]
    fn test_display_params() {
        let params = LoanParameters::new(200_000, 6.5, 30).unwrap();
        assert_eq!(
            params.to_string(),
            "principal $200000, annual rate 6.5%, term 30 years"
        );
        assert_eq!(Mortgage::new(params).params(), &params);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates_params() {
        let params: LoanParameters =
            serde_json::from_str(r#"{"principal":200000,"annual_rate":6.0,"term_years":30}"#)
                .unwrap();
        assert_eq!(params, LoanParameters::new(200_000, 6., 30).unwrap());

        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(serde_json::from_str::<LoanParameters>(&json).unwrap(), params);

        for bad in [
            r#"{"principal":200000,"annual_rate":0.0,"term_years":30}"#,
            r#"{"principal":200000,"annual_rate":-4.0,"term_years":30}"#,
            r#"{"principal":200000,"annual_rate":45.0,"term_years":30}"#,
            r#"{"principal":500,"annual_rate":6.0,"term_years":30}"#,
            r#"{"principal":200000,"annual_rate":6.0,"term_years":0}"#,
        ] {
            assert!(serde_json::from_str::<LoanParameters>(bad).is_err(), "{}", bad);
        }

        let err = serde_json::from_str::<LoanParameters>(
            r#"{"principal":200000,"annual_rate":0.0,"term_years":30}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid interest rate"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_schedule_serde() {
        let schedule = mortgage(100_000, 12., 1).schedule();
        let json = serde_json::to_string(&schedule).unwrap();
        let restored: super::AmortizationSchedule = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.balances.len(), 12);
        assert_eq!(restored.monthly_payment, schedule.monthly_payment);
        assert_eq!(restored, schedule);
    }
}
