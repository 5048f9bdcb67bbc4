use thiserror::Error;

#[derive(Error, Debug)]
pub enum MortgageError {
    #[error("principal out of range: {principal} (expected {min} to {max})")]
    PrincipalOutOfRange { principal: u32, min: u32, max: u32 },

    #[error("invalid interest rate: {rate}% (must be a finite value above zero)")]
    InvalidRate { rate: f64 },

    #[error("interest rate out of range: {rate}% (expected {min} to {max})")]
    RateOutOfRange { rate: f64, min: f64, max: f64 },

    #[error("term out of range: {years} years (expected {min} to {max})")]
    TermOutOfRange { years: u8, min: u8, max: u8 },

    #[error("payment number {payments_made} is past the final payment {number_of_payments}")]
    PaymentOutOfRange {
        payments_made: u32,
        number_of_payments: u32,
    },

    #[error("input closed before a value was entered")]
    InputClosed,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MortgageError>;
