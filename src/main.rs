mod app;
mod calculator;
mod config;
mod format;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use calculator::EigenkapitalInputs;
use config::AppConfig;
use theme::Theme;

#[derive(Parser, Debug)]
#[command(name = "eigenkapital")]
#[command(version = "0.1.0")]
#[command(about = "Eigenkapital-Rechner: equity, loan-to-value and monthly rate for a property purchase")]
struct Args {
    /// Print the results for the given inputs as JSON and exit
    #[arg(short, long)]
    json: bool,

    /// Config file (default: ~/.config/eigenkapital/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a config template with the default start values and exit
    #[arg(long)]
    init_config: bool,

    /// Purchase price in EUR
    #[arg(long)]
    kaufpreis: Option<f64>,

    /// Transaction costs in percent of the purchase price
    #[arg(long)]
    nebenkosten: Option<f64>,

    /// Available cash equity in EUR
    #[arg(long)]
    eigenkapital: Option<f64>,

    /// Interest rate (percent) above 90 % loan-to-value
    #[arg(long = "zins-100")]
    zins_100: Option<f64>,

    /// Interest rate (percent) above 70 % loan-to-value
    #[arg(long = "zins-80")]
    zins_80: Option<f64>,

    /// Interest rate (percent) up to 70 % loan-to-value
    #[arg(long = "zins-60")]
    zins_60: Option<f64>,

    /// Expected annual rent in EUR
    #[arg(long)]
    jahresmiete: Option<f64>,
}

impl Args {
    /// Apply command-line overrides on top of the configured start values
    fn apply_overrides(&self, mut inputs: EigenkapitalInputs) -> EigenkapitalInputs {
        if let Some(v) = self.kaufpreis {
            inputs.kaufpreis = v;
        }
        if let Some(v) = self.eigenkapital {
            inputs.eigenkapital_vorhanden = v;
        }
        if self.nebenkosten.is_some() {
            inputs.nebenkosten_prozent = self.nebenkosten;
        }
        if self.zins_100.is_some() {
            inputs.zinssatz_100 = self.zins_100;
        }
        if self.zins_80.is_some() {
            inputs.zinssatz_80 = self.zins_80;
        }
        if self.zins_60.is_some() {
            inputs.zinssatz_60 = self.zins_60;
        }
        if self.jahresmiete.is_some() {
            inputs.jahresmiete = self.jahresmiete;
        }
        inputs
    }

    fn load_config(&self) -> Result<AppConfig> {
        match &self.config {
            Some(path) => AppConfig::load_from(path)
                .with_context(|| format!("Failed to load config {}", path.display())),
            None => Ok(AppConfig::load()),
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if args.init_config {
        return init_config(&args);
    }

    let config = args.load_config()?;
    let startwerte = args.apply_overrides(config.startwerte.clone());

    if args.json {
        return print_json(&startwerte);
    }

    ui::init_theme(Theme::from_config(&config.theme));

    run_tui(startwerte)
}

fn init_config(args: &Args) -> Result<()> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => AppConfig::default_path()?,
    };
    AppConfig::default().write_template(&path)?;
    println!("{}", path.display());
    Ok(())
}

fn print_json(inputs: &EigenkapitalInputs) -> Result<()> {
    let results = calculator::calculate(inputs);
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn run_tui(startwerte: EigenkapitalInputs) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(startwerte);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc if app.popup == Popup::None => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => app.handle_key(key),
                    }
                }
            }
        }

        // Expire status messages
        app.tick();
    }
}
