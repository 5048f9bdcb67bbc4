use chrono::{Local, NaiveDate};
use log::error;
use mortgage::app::App;
use mortgage::config::Settings;
use simple_logger::SimpleLogger;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let settings = Settings::default();

    if let Err(e) = SimpleLogger::new().with_level(settings.log_level).init() {
        eprintln!("failed to start logger: {}", e);
    }

    let mut app = App::new(io::stdin().lock(), io::stdout(), settings, today);
    match app.run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
