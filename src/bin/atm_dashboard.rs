//! ATM Options dashboard
//!
//! Interactive view of the ATM contract: market quote, Black-Scholes-Merton
//! price, mispricing and Greeks, with the implied volatility smile of the
//! selected expiry.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints, VLine};

use atm_options::analysis::SIGNIFICANT_MISPRICING_PCT;
use atm_options::logging::init_logging;
use atm_options::prelude::*;
use atm_options::report::{error_message, format_thousands};

#[derive(Parser)]
#[command(name = "atm-dashboard")]
#[command(about = "Interactive ATM option pricing and Greeks dashboard")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct DashboardApp {
    config: AppConfig,
    client: Result<YahooClient, AnalysisError>,

    // UI state
    ticker_input: String,
    side: OptionType,
    selected_expiry: Option<NaiveDate>,
    status: Option<String>,

    // Data
    snapshot: Option<TickerSnapshot>,
    analysis: Option<AnalysisResult<Analysis>>,
}

impl DashboardApp {
    fn new(config: AppConfig) -> Self {
        let client = YahooClient::new(&config.data);
        Self {
            config,
            client,
            ticker_input: "AAPL".to_string(),
            side: OptionType::Call,
            selected_expiry: None,
            status: None,
            snapshot: None,
            analysis: None,
        }
    }

    fn fetch(&mut self, expiry: Option<NaiveDate>) {
        let ticker = self.ticker_input.trim().to_uppercase();
        if ticker.is_empty() {
            self.status = Some("Enter a ticker symbol".to_string());
            return;
        }

        let result = match &self.client {
            Ok(client) => client.snapshot(&ticker, expiry),
            Err(e) => Err(e.clone()),
        };

        match result {
            Ok(snapshot) => {
                self.ticker_input = ticker;
                self.selected_expiry = Some(snapshot.expiry());
                self.snapshot = Some(snapshot);
                self.status = None;
                self.reanalyze();
            }
            Err(e) => {
                tracing::warn!(ticker, error = %e, "fetch failed");
                self.snapshot = None;
                self.analysis = None;
                self.status = Some(error_message(&e));
            }
        }
    }

    fn reanalyze(&mut self) {
        let now = chrono::Local::now().naive_local();
        self.analysis = self
            .snapshot
            .as_ref()
            .map(|s| analyze(s, self.side, &self.config.market, now));
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("ATM Options");
        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Ticker:");
            ui.text_edit_singleline(&mut self.ticker_input);
        });
        if ui.button("Fetch").clicked() {
            self.fetch(None);
        }
        if let Some(status) = &self.status {
            ui.colored_label(egui::Color32::RED, status);
        }

        let expiries = self
            .snapshot
            .as_ref()
            .map(|s| s.expiries.clone())
            .unwrap_or_default();
        if !expiries.is_empty() {
            ui.separator();
            let mut chosen = self.selected_expiry;
            egui::ComboBox::from_label("Expiry")
                .selected_text(chosen.map(|d| d.to_string()).unwrap_or_default())
                .show_ui(ui, |ui| {
                    for expiry in &expiries {
                        ui.selectable_value(&mut chosen, Some(*expiry), expiry.to_string());
                    }
                });
            if chosen != self.selected_expiry {
                self.fetch(chosen);
            }
        }

        ui.separator();
        ui.heading("Option Type");
        let before = self.side;
        ui.radio_value(&mut self.side, OptionType::Call, "Call");
        ui.radio_value(&mut self.side, OptionType::Put, "Put");
        if self.side != before {
            self.reanalyze();
        }

        ui.separator();
        ui.label(format!(
            "Risk-free rate: {:.2}%",
            self.config.market.risk_free_rate * 100.0
        ));
        ui.label(format!(
            "Dividend yield: {:.2}%",
            self.config.market.dividend_yield * 100.0
        ));
    }

    fn analysis_panel(ui: &mut egui::Ui, a: &Analysis) {
        ui.label(format!("Live Spot Price: ${:.2}", a.spot));
        ui.label(format!("ATM Strike Price: ${:?}", a.atm_strike));
        if a.expiry_clamped {
            ui.colored_label(
                egui::Color32::YELLOW,
                "Option is expiring today or has expired. Using minimum time value.",
            );
        }
        ui.label(format!("Days to Expiry: {}", a.days_to_expiry));
        ui.label(format!("Time to Expiry (T): {:.4}", a.time_to_expiry));

        ui.separator();
        ui.heading(format!("{} Option Analysis", a.option_type));

        let q = &a.quote;
        egui::Grid::new("market_grid")
            .striped(true)
            .spacing([30.0, 4.0])
            .show(ui, |ui| {
                ui.strong("Market Price");
                ui.strong("Bid");
                ui.strong("Ask");
                ui.strong("Volume");
                ui.strong("Implied Volatility");
                ui.end_row();

                ui.label(format!("${:.2}", q.last_price));
                ui.label(format!("${:.2}", q.bid));
                ui.label(format!("${:.2}", q.ask));
                ui.label(format_thousands(q.volume));
                ui.label(
                    q.implied_volatility
                        .map(|iv| format!("{:.2}%", iv * 100.0))
                        .unwrap_or_else(|| "n/a".to_string()),
                );
                ui.end_row();
            });

        match &a.valuation {
            Err(e) => {
                ui.colored_label(egui::Color32::RED, error_message(e));
            }
            Ok(v) => {
                ui.separator();
                ui.heading("Black-Scholes Model Results");
                ui.horizontal(|ui| {
                    ui.label(format!("BSM Price: ${:.2}", v.greeks.price));
                    match &v.mispricing {
                        Ok(m) if m.is_significant() => {
                            let color = if m.mispricing_percent > 0.0 {
                                egui::Color32::LIGHT_GREEN
                            } else {
                                egui::Color32::LIGHT_RED
                            };
                            ui.colored_label(
                                color,
                                format!(
                                    "Mispricing: {:+.2}% (beyond ±{:.0}%)",
                                    m.mispricing_percent, SIGNIFICANT_MISPRICING_PCT
                                ),
                            );
                        }
                        Ok(m) => {
                            ui.label(format!("Mispricing: {:.2}%", m.mispricing_percent));
                        }
                        Err(e) => {
                            ui.colored_label(egui::Color32::RED, error_message(e));
                        }
                    }
                });

                ui.heading("Option Greeks");
                egui::Grid::new("greeks_grid")
                    .striped(true)
                    .spacing([30.0, 4.0])
                    .show(ui, |ui| {
                        for (name, _) in v.greeks.named() {
                            ui.strong(name);
                        }
                        ui.end_row();
                        for (_, value) in v.greeks.named() {
                            ui.label(format!("{:.4}", value));
                        }
                        ui.end_row();
                    });
            }
        }

        egui::CollapsingHeader::new("Debug Information").show(ui, |ui| {
            ui.label(format!("Spot Price: {}", a.spot));
            ui.label(format!("ATM Strike: {}", a.atm_strike));
            ui.label(format!("Time to Expiry: {}", a.time_to_expiry));
            ui.label(format!("Risk-free Rate: {}", a.params.risk_free_rate));
            ui.label(format!("Dividend Yield: {}", a.params.dividend_yield));
            ui.label(format!("{} IV: {:?}", a.option_type, q.implied_volatility));
            ui.label(format!("{} Last Price: {}", a.option_type, q.last_price));
            if let (Some(mid), Some(spread)) = (q.mid(), q.spread()) {
                ui.label(format!("Mid: {:.3}  Spread: {:.3}", mid, spread));
            }
        });
    }

    fn smile_plot(ui: &mut egui::Ui, snapshot: &TickerSnapshot, side: OptionType, atm: Option<f64>) {
        let points: Vec<[f64; 2]> = snapshot
            .chain
            .side(side)
            .iter()
            .filter_map(|q| {
                q.implied_volatility
                    .filter(|iv| *iv > 0.0 && iv.is_finite())
                    .map(|iv| [q.strike, iv * 100.0])
            })
            .collect();

        ui.heading("Implied Volatility Smile");
        Plot::new("iv_smile")
            .view_aspect(2.5)
            .x_axis_label("Strike")
            .y_axis_label("Implied Vol (%)")
            .legend(egui_plot::Legend::default())
            .show(ui, |plot_ui| {
                if !points.is_empty() {
                    plot_ui.line(
                        Line::new(PlotPoints::new(points))
                            .name(format!("{} IV", side))
                            .color(egui::Color32::LIGHT_BLUE)
                            .width(2.0),
                    );
                }

                plot_ui.vline(
                    VLine::new(snapshot.spot)
                        .name("Spot")
                        .color(egui::Color32::YELLOW)
                        .width(1.5)
                        .style(egui_plot::LineStyle::Dashed { length: 5.0 }),
                );

                if let Some(strike) = atm {
                    plot_ui.vline(
                        VLine::new(strike)
                            .name("ATM")
                            .color(egui::Color32::LIGHT_GREEN)
                            .width(1.0),
                    );
                }
            });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("controls").show(ctx, |ui| {
            self.controls(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("ATM Option Pricing & Greeks Dashboard");

            let Some(snapshot) = &self.snapshot else {
                ui.label("Enter a ticker and click 'Fetch' to load option data");
                return;
            };

            ui.label(format!("{} | expiry {}", snapshot.ticker, snapshot.expiry()));
            ui.separator();

            let atm = match &self.analysis {
                Some(Ok(a)) => {
                    Self::analysis_panel(ui, a);
                    Some(a.atm_strike)
                }
                Some(Err(e)) => {
                    ui.colored_label(egui::Color32::RED, error_message(e));
                    None
                }
                None => None,
            };

            ui.separator();
            Self::smile_plot(ui, snapshot, self.side, atm);
        });
    }
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Error: {}", e);
    }

    let config = match args.config.as_deref().map(AppConfig::load) {
        Some(Ok(c)) => c,
        Some(Err(e)) => {
            eprintln!("Error: {}", error_message(&e));
            std::process::exit(2);
        }
        None => AppConfig::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 850.0])
            .with_title("ATM Option Analyzer"),
        ..Default::default()
    };

    eframe::run_native(
        "ATM Option Analyzer",
        options,
        Box::new(move |_cc| Box::new(DashboardApp::new(config))),
    )
}
