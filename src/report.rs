use crate::error::Result;
use crate::mortgage::{AmortizationSchedule, Mortgage};
use chrono::NaiveDate;
use log::{info, warn};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Renders an amount of money as display text.
pub trait CurrencyFormatter {
    fn format(&self, amount: f64) -> String;
}

/// US dollars, rounded to cents with comma grouping: `$1,234.56`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UsdFormatter;

impl CurrencyFormatter for UsdFormatter {
    fn format(&self, amount: f64) -> String {
        let cents = (amount.abs() * 100.).round() as u64;
        let sign = if amount < 0. && cents > 0 { "-" } else { "" };

        format!(
            "{}${}.{:02}",
            sign,
            group_thousands(cents / 100),
            cents % 100
        )
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Console and file rendering of one mortgage.
///
/// The schedule is computed once when the report is built and shared by
/// every section.
pub struct MortgageReport<F = UsdFormatter> {
    schedule: AmortizationSchedule,
    currency: F,
}

impl MortgageReport<UsdFormatter> {
    pub fn new(mortgage: &Mortgage) -> Self {
        Self::with_formatter(mortgage, UsdFormatter)
    }
}

impl<F: CurrencyFormatter> MortgageReport<F> {
    pub fn with_formatter(mortgage: &Mortgage, currency: F) -> Self {
        Self {
            schedule: mortgage.schedule(),
            currency,
        }
    }

    pub fn schedule(&self) -> &AmortizationSchedule {
        &self.schedule
    }

    pub fn print_mortgage<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        self.write_mortgage(out)
    }

    pub fn print_payment_schedule<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        self.write_payment_schedule(out)
    }

    /// Full text of the saved report, dated `date`.
    pub fn render(&self, date: NaiveDate) -> io::Result<String> {
        let mut text = Vec::new();
        self.write_file_body(&mut text, date)?;
        String::from_utf8(text).map_err(|e| io::Error::new(ErrorKind::InvalidData, e))
    }

    /// Writes the report into `dir` and returns the path used. An existing
    /// report for the same date is left alone; the next free `_2`, `_3`, ...
    /// suffix is taken instead.
    pub fn save(&self, dir: &Path, date: NaiveDate) -> Result<PathBuf> {
        let (path, file) = create_report_file(dir, date)?;
        let mut writer = BufWriter::new(file);
        self.write_file_body(&mut writer, date)?;
        writer.flush()?;

        info!(
            "saved report with {} balances to {}",
            self.schedule.balances.len(),
            path.display()
        );
        Ok(path)
    }

    fn write_file_body<W: Write>(&self, out: &mut W, date: NaiveDate) -> io::Result<()> {
        writeln!(out, "--- Mortgage Calculator Report ---")?;
        writeln!(out)?;
        writeln!(out, "Date: {}", date.format("%B %d, %Y"))?;
        writeln!(out)?;
        self.write_mortgage(out)?;
        writeln!(out)?;
        self.write_payment_schedule(out)
    }

    fn write_mortgage<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "MORTGAGE")?;
        writeln!(out, "--------")?;
        writeln!(
            out,
            "Monthly Payments: {}",
            self.currency.format(self.schedule.monthly_payment)
        )
    }

    fn write_payment_schedule<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "PAYMENT SCHEDULE")?;
        writeln!(out, "----------------")?;
        for balance in &self.schedule.balances {
            writeln!(out, "{}", self.currency.format(*balance))?;
        }
        Ok(())
    }
}

pub fn report_file_name(date: NaiveDate, copy: u32) -> String {
    if copy <= 1 {
        format!("Mortgage_Report_{}.txt", date.format("%Y-%m-%d"))
    } else {
        format!("Mortgage_Report_{}_{}.txt", date.format("%Y-%m-%d"), copy)
    }
}

fn create_report_file(dir: &Path, date: NaiveDate) -> Result<(PathBuf, File)> {
    let mut copy = 1;
    loop {
        let path = dir.join(report_file_name(date, copy));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                warn!("{} already exists, trying the next name", path.display());
                copy += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
