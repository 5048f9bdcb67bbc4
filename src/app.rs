use crate::config::Settings;
use crate::error::Result;
use crate::input::Prompter;
use crate::mortgage::Mortgage;
use crate::report::MortgageReport;
use chrono::NaiveDate;
use log::info;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Interactive session: collect a loan, report on it, offer to go again.
pub struct App<R, W> {
    prompter: Prompter<R, W>,
    settings: Settings,
    today: fn() -> NaiveDate,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(input: R, output: W, settings: Settings, today: fn() -> NaiveDate) -> Self {
        Self {
            prompter: Prompter::new(input, output),
            settings,
            today,
        }
    }

    /// Runs until the user answers anything but "yes".
    pub fn run(&mut self) -> Result<u32> {
        writeln!(
            self.prompter.output(),
            "--- Welcome to the Mortgage Calculator App ---"
        )?;

        let mut runs = 0;
        loop {
            self.run_once()?;
            runs += 1;

            let answer = self
                .prompter
                .read_string("\nWould you like to calculate another mortgage? (yes/no): ")?;
            if answer.to_lowercase() != "yes" {
                break;
            }
        }

        writeln!(
            self.prompter.output(),
            "Thank you for using the Mortgage Calculator App. Goodbye!"
        )?;
        info!("session finished after {} calculations", runs);
        Ok(runs)
    }

    /// One calculation: prompt, print the report and save it. Returns the
    /// path of the saved report.
    pub fn run_once(&mut self) -> Result<PathBuf> {
        let params = self.prompter.read_loan_parameters()?;
        let mortgage = Mortgage::new(params);
        info!(
            "calculating {} ({} payments)",
            mortgage.params(),
            mortgage.number_of_payments()
        );

        let report = MortgageReport::new(&mortgage);
        let out = self.prompter.output();
        report.print_mortgage(out)?;
        report.print_payment_schedule(out)?;

        let path = report.save(&self.settings.report_dir, (self.today)())?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        writeln!(out, "\nReport saved to {}\n", file_name)?;

        Ok(path)
    }
}
