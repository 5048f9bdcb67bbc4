use crate::config::{
    MAX_ANNUAL_RATE, MAX_PRINCIPAL, MAX_TERM_YEARS, MIN_ANNUAL_RATE, MIN_PRINCIPAL,
    MIN_TERM_YEARS,
};
use crate::error::{MortgageError, Result};
use crate::mortgage::LoanParameters;
use log::{debug, warn};
use std::io::{BufRead, Write};

/// Line-oriented prompting over any reader/writer pair.
///
/// Stdin/stdout in the binary, in-memory buffers in tests.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prompts until a number within `min..=max` is entered.
    pub fn read_number(&mut self, prompt: &str, min: f64, max: f64) -> Result<f64> {
        loop {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;

            let token = self.next_token()?;
            match token.parse::<f64>() {
                Ok(value) if (min..=max).contains(&value) => return Ok(value),
                Ok(value) => {
                    debug!("rejected {} outside {}..={}", value, min, max);
                    writeln!(self.output, "Enter a value between {} and {}", min, max)?;
                }
                Err(_) => {
                    debug!("rejected non-numeric input {:?}", token);
                    writeln!(self.output, "Enter a number")?;
                }
            }
        }
    }

    /// Prompts once and returns the first word entered.
    pub fn read_string(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        self.next_token()
    }

    /// Asks for principal, rate and term. Principal and term are truncated
    /// to whole units.
    pub fn read_loan_parameters(&mut self) -> Result<LoanParameters> {
        let principal = self.read_number(
            "Principal ($1k - $1M): ",
            MIN_PRINCIPAL as f64,
            MAX_PRINCIPAL as f64,
        )?;
        let annual_rate = self.read_number(
            "Annual Interest Rate (1-30%): ",
            MIN_ANNUAL_RATE,
            MAX_ANNUAL_RATE,
        )?;
        let years = self.read_number(
            "Period (Years, 1-30): ",
            MIN_TERM_YEARS as f64,
            MAX_TERM_YEARS as f64,
        )?;

        LoanParameters::new(principal as u32, annual_rate, years as u8)
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    // skips blank lines; end of input is an error
    fn next_token(&mut self) -> Result<String> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                warn!("input closed while waiting for a value");
                return Err(MortgageError::InputClosed);
            }
            if let Some(token) = line.split_whitespace().next() {
                return Ok(token.to_string());
            }
        }
    }
}
