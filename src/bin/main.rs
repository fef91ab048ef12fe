use std::{fmt::Display, fs, path::PathBuf, process::ExitCode, str::FromStr};

use atm_cash_monitor::{
    analytics::{ApiAnalyticsService, DynAnalyticsService},
    api_client::{ApiClient, ReqwestTransport},
    config::Config,
    dashboard::{
        cash_band, display_percentage,
        models::Notice,
        run_refresh_loop, summarize, MachineBoard, RefillBoard,
    },
    export::{
        self, generate_filename,
        reports::{
            backend_prediction_report, forecast_report, format_currency, machine_report,
            network_summary_report, refill_request_report,
        },
        write_report, ExportFormat, Record,
    },
    forecast::{
        chart_projection, local_forecast,
        models::{ForecastDay, ForecastFactors},
    },
    machines::{
        models::{Coordinates, DataSource, Machine, MachineStatus, MachineUpdate, NewMachine},
        ApiMachineService, DynMachineService,
    },
    prediction_model::{models::PredictionResponse, ApiPredictionModelService, DynPredictionModelService},
    push_channel::{self, models::ReconnectPolicy, PushChannel},
    refill_requests::{
        can_act_on,
        models::{RefillAction, RefillRequest, RefillStatus},
        ApiRefillRequestService, DynRefillRequestService,
    },
    session::{models::Role, FileTokenStore, Session},
};
use chrono::{Days, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use reqwest::Client;
use tokio::sync::watch;

type Outcome = std::result::Result<Notice, Notice>;

#[derive(Parser, Debug)]
#[command(name = "atm-monitor", version, about = "Monitor and manage a network of cash machines")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,
    /// Backend base URL, overrides config and environment
    #[arg(long)]
    api_url: Option<String>,
    /// Push channel URL, overrides config and environment
    #[arg(long)]
    ws_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the credential
    Login {
        username: String,
        #[arg(long, env = "ATM_PASSWORD")]
        password: String,
    },
    Register {
        username: String,
        email: String,
        #[arg(long, env = "ATM_PASSWORD")]
        password: String,
        /// Login id or role label
        #[arg(long, default_value = "atm_ops")]
        role: String,
    },
    Logout,
    Whoami,
    #[command(subcommand)]
    Machines(MachinesCommand),
    #[command(subcommand)]
    Requests(RequestsCommand),
    #[command(subcommand)]
    Model(ModelCommand),
    /// Forecast a machine's cash, falling back to a local estimate when the backend fails
    Forecast {
        atm_id: String,
        #[command(flatten)]
        factors: FactorArgs,
    },
    /// Week-ahead projection for every machine
    Chart,
    #[command(subcommand)]
    Analytics(AnalyticsCommand),
    #[command(subcommand)]
    Export(ExportCommand),
    /// Keep refreshing the network summary and print push messages until interrupted
    Watch,
}

#[derive(Subcommand, Debug)]
enum MachinesCommand {
    List,
    Show { id: String },
    Add {
        location: String,
        cash: f64,
        capacity: f64,
        #[arg(long, requires = "lng")]
        lat: Option<f64>,
        #[arg(long, requires = "lat")]
        lng: Option<f64>,
    },
    Edit {
        id: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        cash: Option<f64>,
        #[arg(long)]
        capacity: Option<f64>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    Delete { id: String },
    /// Top a machine up to capacity
    Refill { id: String },
}

#[derive(Subcommand, Debug)]
enum RequestsCommand {
    List {
        /// pending, approved, rejected, completed or all
        #[arg(long, default_value = "all")]
        status: String,
    },
    Create {
        atm_id: String,
        amount: f64,
        #[arg(long)]
        comment: Option<String>,
    },
    Approve {
        id: String,
        #[arg(long)]
        comment: Option<String>,
    },
    Reject {
        id: String,
        #[arg(long)]
        comment: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ModelCommand {
    /// Upload historical withdrawal data
    Train { file: PathBuf },
    Predict {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}

#[derive(Subcommand, Debug)]
enum AnalyticsCommand {
    Machine {
        atm_id: String,
        #[command(flatten)]
        range: RangeArgs,
    },
    Network {
        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(Subcommand, Debug)]
enum ExportCommand {
    Machines {
        #[arg(long, value_enum, default_value_t = FormatArg::Spreadsheet)]
        format: FormatArg,
    },
    Network {
        #[arg(long, value_enum, default_value_t = FormatArg::Spreadsheet)]
        format: FormatArg,
    },
    Requests {
        #[arg(long, default_value = "all")]
        status: String,
        #[arg(long, value_enum, default_value_t = FormatArg::Spreadsheet)]
        format: FormatArg,
    },
    Forecast {
        atm_id: String,
        #[command(flatten)]
        factors: FactorArgs,
        #[arg(long, value_enum, default_value_t = FormatArg::Spreadsheet)]
        format: FormatArg,
    },
    /// Raw network analytics as JSON
    Analytics {
        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(clap::Args, Debug)]
struct FactorArgs {
    #[arg(long, default_value_t = 7)]
    days: u32,
    #[arg(long, default_value_t = 1.0)]
    seasonal: f64,
    #[arg(long, default_value_t = 1.0)]
    event: f64,
}

#[derive(clap::Args, Debug)]
struct RangeArgs {
    /// Defaults to a week before the end date
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Defaults to today
    #[arg(long)]
    end: Option<NaiveDate>,
}

impl RangeArgs {
    fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let end = self.end.unwrap_or(today);
        let start = self.start.unwrap_or(end - Days::new(7));
        (start, end)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusArg { Online, Offline, Maintenance, }

impl From<StatusArg> for MachineStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Online => MachineStatus::Online,
            StatusArg::Offline => MachineStatus::Offline,
            StatusArg::Maintenance => MachineStatus::Maintenance,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg { Csv, Spreadsheet, Json, }

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Spreadsheet => ExportFormat::Spreadsheet,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

enum Prediction {
    Backend(PredictionResponse),
    Local(Vec<ForecastDay>),
}

fn failed<E: Display>(title: &'static str) -> impl Fn(E) -> Notice {
    move |e| Notice::from_error(title, &e)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `None` for "all"
fn parse_status_filter(status: &str) -> Result<Option<RefillStatus>, Notice> {
    if status.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    RefillStatus::from_str(status).map(Some).map_err(failed("Invalid Filter"))
}

fn cash_bar(machine: &Machine) -> String {
    let filled = (display_percentage(machine) / 5.0).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(20 - filled.min(20)))
}

fn print_machine(m: &Machine) {
    println!(
        "{:<8} {:<32} {:>12} / {:<12} {} {:>6.1}% {:<6} {:<6} {}",
        m.id,
        m.location,
        format_currency(m.current_cash),
        format_currency(m.capacity),
        cash_bar(m),
        m.cash_percentage(),
        cash_band(m).as_str(),
        m.risk_level.as_str(),
        m.status.as_str(),
    );
}

fn print_summary(machines: &[Machine]) {
    let summary = summarize(machines);
    println!(
        "{} machines | total cash {} | {} high risk | avg daily withdrawal {}",
        summary.machine_count,
        format_currency(summary.total_cash),
        summary.high_risk_count,
        format_currency(summary.average_daily_withdrawal.round()),
    );
}

fn print_request(r: &RefillRequest) {
    println!(
        "{:<12} {:<8} {:>12} {:<12} {:<10} {:<20} {}",
        r.request_id,
        r.atm_id,
        format_currency(r.requested_amount),
        r.requestor,
        r.status.as_str(),
        r.created_at,
        r.comment_text().unwrap_or("-"),
    );
    for approval in &r.approval_history {
        println!(
            "    {} {} ({}) at {}{}",
            approval.action,
            approval.approver,
            approval.role,
            approval.timestamp,
            approval.comment.as_deref().map(|c| format!(": {}", c)).unwrap_or_default(),
        );
    }
}

struct App {
    config: Config,
    client: ApiClient,
    machines: DynMachineService,
    requests: DynRefillRequestService,
    model: DynPredictionModelService,
    analytics: DynAnalyticsService,
}

impl App {
    fn new(config: Config, client: ApiClient) -> Self {
        Self {
            machines: ApiMachineService::new_dyn(client.clone()),
            requests: ApiRefillRequestService::new_dyn(client.clone()),
            model: ApiPredictionModelService::new_dyn(client.clone()),
            analytics: ApiAnalyticsService::new_dyn(client.clone()),
            config,
            client,
        }
    }

    async fn run(&self, command: Command) -> Notice {
        let outcome = match command {
            Command::Login { username, password } => self.login(&username, &password).await,
            Command::Register { username, email, password, role } => {
                self.register(&username, &email, &password, &role).await
            }
            Command::Logout => self.logout(),
            Command::Whoami => self.whoami(),
            Command::Machines(cmd) => self.machines(cmd).await,
            Command::Requests(cmd) => self.requests(cmd).await,
            Command::Model(cmd) => self.model(cmd).await,
            Command::Forecast { atm_id, factors } => self.forecast(&atm_id, &factors).await,
            Command::Chart => self.chart().await,
            Command::Analytics(cmd) => self.analytics(cmd).await,
            Command::Export(cmd) => self.export(cmd).await,
            Command::Watch => self.watch().await,
        };

        match outcome {
            Ok(notice) | Err(notice) => notice,
        }
    }

    async fn login(&self, username: &str, password: &str) -> Outcome {
        let user = self.client.login(username, password).await.map_err(failed("Login Failed"))?;
        Ok(Notice::success("Logged In", format!("Welcome, {} ({})", user.username, user.role)))
    }

    async fn register(&self, username: &str, email: &str, password: &str, role: &str) -> Outcome {
        let role = Role::from_str(role).map_err(failed("Registration Failed"))?;
        self.client.register(username, email, password, role).await.map_err(failed("Registration Failed"))?;
        Ok(Notice::success("Registered", format!("{} can now log in as {}", username, role)))
    }

    fn logout(&self) -> Outcome {
        self.client.logout().map_err(failed("Logout Failed"))?;
        Ok(Notice::success("Logged Out", "Credential removed"))
    }

    fn whoami(&self) -> Outcome {
        let user = self.client.current_user()
            .ok_or(Notice::failure("Not Logged In", "No stored credential"))?;
        println!("create refill requests: {}", user.role.can_create_refill_requests());
        println!("approve refill requests: {}", user.role.can_approve_refill_requests());
        println!("train model: {}", user.role.can_train_model());
        Ok(Notice::success("Current User", format!("{} ({})", user.username, user.role)))
    }

    fn require_role(&self, allowed: fn(&Role) -> bool, action: &str) -> Result<Role, Notice> {
        let role = self.client.current_user()
            .map(|u| u.role)
            .ok_or(Notice::failure("Not Logged In", "Log in first"))?;
        if !allowed(&role) {
            return Err(Notice::failure("Permission Denied", format!("{} may not {}", role, action)));
        }
        Ok(role)
    }

    async fn find_machine(&self, atm_id: &str) -> Result<Machine, Notice> {
        self.machines.list_machines().await.machines
            .into_iter()
            .find(|m| m.id == atm_id)
            .ok_or(Notice::failure("Unknown Machine", format!("No machine with id {}", atm_id)))
    }

    async fn machines(&self, cmd: MachinesCommand) -> Outcome {
        match cmd {
            MachinesCommand::List => {
                let listing = self.machines.list_machines().await;
                listing.machines.iter().for_each(print_machine);
                print_summary(&listing.machines);
                Ok(match listing.source {
                    DataSource::Live => Notice::success("Machines Loaded", format!("{} machines", listing.machines.len())),
                    DataSource::Fallback => Notice::success("Offline Mode", "Backend unreachable, showing sample data"),
                })
            }
            MachinesCommand::Show { id } => {
                let machine = self.machines.get_machine(&id).await.map_err(failed("Lookup Failed"))?;
                print_machine(&machine);
                println!("daily withdrawals: {:?}", machine.daily_withdrawals);
                println!("last refill {}, predicted depletion {}", machine.last_refill, machine.predicted_depletion);
                if let Some(c) = machine.coordinates {
                    println!("coordinates {}, {}", c.lat, c.lng);
                }
                Ok(Notice::success("Machine Loaded", id))
            }
            MachinesCommand::Add { location, cash, capacity, lat, lng } => {
                let coordinates = lat.zip(lng).map(|(lat, lng)| Coordinates { lat, lng });
                let machine = self.machines
                    .create_machine(NewMachine::install(&location, cash, capacity, coordinates, today()))
                    .await
                    .map_err(failed("Add Failed"))?;
                print_machine(&machine);
                Ok(Notice::success("Machine Added", format!("{} at {}", machine.id, machine.location)))
            }
            MachinesCommand::Edit { id, location, cash, capacity, status } => {
                let update = MachineUpdate {
                    location,
                    current_cash: cash,
                    capacity,
                    status: status.map(MachineStatus::from),
                    ..Default::default()
                };
                let machine = self.machines.update_machine(&id, update).await.map_err(failed("Update Failed"))?;
                print_machine(&machine);
                Ok(Notice::success("Machine Updated", id))
            }
            MachinesCommand::Delete { id } => {
                self.machines.delete_machine(&id).await.map_err(failed("Delete Failed"))?;
                Ok(Notice::success("Machine Deleted", id))
            }
            MachinesCommand::Refill { id } => {
                let machine = self.machines.refill_machine(&id, today()).await.map_err(failed("Refill Failed"))?;
                Ok(Notice::success(
                    "Machine Refilled",
                    format!("{} now holds {}", machine.id, format_currency(machine.current_cash)),
                ))
            }
        }
    }

    async fn requests(&self, cmd: RequestsCommand) -> Outcome {
        match cmd {
            RequestsCommand::List { status } => {
                let filter = parse_status_filter(&status)?;
                let requests = self.requests.list_requests(filter).await.map_err(failed("Load Failed"))?;
                requests.iter().for_each(print_request);
                Ok(Notice::success("Requests Loaded", format!("{} requests", requests.len())))
            }
            RequestsCommand::Create { atm_id, amount, comment } => {
                self.require_role(Role::can_create_refill_requests, "create refill requests")?;
                let request = self.requests
                    .create_request(&atm_id, amount, comment)
                    .await
                    .map_err(failed("Request Failed"))?;
                print_request(&request);
                Ok(Notice::success("Request Submitted", format!("{} for {}", request.request_id, request.atm_id)))
            }
            RequestsCommand::Approve { id, comment } => self.act(&id, RefillAction::Approve, comment).await,
            RequestsCommand::Reject { id, comment } => self.act(&id, RefillAction::Reject, comment).await,
        }
    }

    async fn act(&self, id: &str, action: RefillAction, comment: Option<String>) -> Outcome {
        let role = self.require_role(Role::can_approve_refill_requests, "approve refill requests")?;
        let mut board = RefillBoard::new(
            self.requests.list_requests(None).await.map_err(failed("Load Failed"))?,
        );

        let request = board.requests().iter()
            .find(|r| r.request_id == id)
            .ok_or(Notice::failure("Unknown Request", format!("No refill request {}", id)))?;
        if !can_act_on(role, request) {
            return Err(Notice::failure("Not Actionable", format!("{} is {}", id, request.status)));
        }

        let updated = self.requests.act_on_request(id, action, comment).await.map_err(failed("Action Failed"))?;
        if !board.apply_update(updated.clone()) {
            warn!("Ignored out-of-order update for {}", id);
        }
        print_request(&updated);
        Ok(Notice::success("Request Updated", format!("{} is now {}", id, updated.status)))
    }

    async fn model(&self, cmd: ModelCommand) -> Outcome {
        match cmd {
            ModelCommand::Train { file } => {
                self.require_role(Role::can_train_model, "train the model")?;
                let contents = fs::read(&file).map_err(failed("Training Failed"))?;
                let file_name = file.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or(String::from("training.csv"));
                let meta = self.model.train_model(&file_name, contents).await.map_err(failed("Training Failed"))?;
                println!("{}", export::encode_json(&meta).map_err(failed("Training Failed"))?);
                Ok(Notice::success("Model Trained", file_name))
            }
            ModelCommand::Predict { days } => {
                let res = self.model.predict(today(), days).await.map_err(failed("Prediction Failed"))?;
                for p in &res.daily_predictions {
                    println!("{:>3} {} {:>12} {:>14}", p.day_number, p.date,
                        format_currency(p.predicted_withdrawal), format_currency(p.running_total));
                }
                Ok(Notice::success("Prediction Generated", res.message))
            }
        }
    }

    async fn predict_for(&self, atm_id: &str, factors: &FactorArgs) -> Result<(Prediction, Notice), Notice> {
        match self.model.predict(today(), factors.days).await {
            Ok(res) => Ok((
                Prediction::Backend(res),
                Notice::success("Prediction Generated", format!("Backend prediction for {}", atm_id)),
            )),
            Err(e) => {
                warn!("Backend prediction failed, using local forecast: {}", e);
                let machine = self.find_machine(atm_id).await?;
                let days = local_forecast(
                    &machine,
                    factors.days,
                    ForecastFactors { seasonal: factors.seasonal, event: factors.event },
                    today(),
                ).map_err(failed("Prediction Failed"))?;
                Ok((Prediction::Local(days), Notice::success("Offline Prediction", "Generated prediction using local algorithms")))
            }
        }
    }

    async fn forecast(&self, atm_id: &str, factors: &FactorArgs) -> Outcome {
        let (prediction, notice) = self.predict_for(atm_id, factors).await?;
        match prediction {
            Prediction::Backend(res) => {
                for p in &res.daily_predictions {
                    println!("{:>3} {} withdrawal {:>12} running {:>14}", p.day_number, p.date,
                        format_currency(p.predicted_withdrawal), format_currency(p.running_total));
                }
            }
            Prediction::Local(days) => {
                for d in &days {
                    println!("{:>3} {} cash {:>12} {:>6.1}% {}", d.day, d.date,
                        format_currency(d.predicted_cash), d.cash_percentage, d.risk_level);
                }
            }
        }
        Ok(notice)
    }

    async fn chart(&self) -> Outcome {
        let listing = self.machines.list_machines().await;
        let chart = chart_projection(&listing.machines, today(), &mut rand::rng());
        for day in &chart {
            let cells: Vec<String> = day.machines.iter()
                .map(|p| format!("{} {}", p.atm_id, format_currency(p.predicted_cash)))
                .collect();
            println!("{} | {}", day.date.format("%b %-d"), cells.join(" | "));
        }
        Ok(Notice::success("Projection Ready", format!("{} days", chart.len())))
    }

    async fn analytics(&self, cmd: AnalyticsCommand) -> Outcome {
        let (title, res) = match cmd {
            AnalyticsCommand::Machine { atm_id, range } => {
                let (start, end) = range.resolve(today());
                ("Machine Analytics", self.analytics.machine_analytics(&atm_id, start, end).await)
            }
            AnalyticsCommand::Network { range } => {
                let (start, end) = range.resolve(today());
                ("Network Analytics", self.analytics.network_analytics(start, end).await)
            }
        };
        let value = res.map_err(failed("Analytics Failed"))?;
        println!("{}", export::encode_json(&value).map_err(failed("Analytics Failed"))?);
        Ok(Notice::success(title, "Loaded"))
    }

    fn save(&self, prefix: &str, format: ExportFormat, records: &[Record]) -> Outcome {
        let content = format.render(records).map_err(failed("Export Failed"))?;
        let filename = generate_filename(prefix, format.extension(), Utc::now());
        let path = write_report(&self.config.export_dir, &filename, &content).map_err(failed("Export Failed"))?;
        Ok(Notice::success("Export Complete", path.display().to_string()))
    }

    async fn export(&self, cmd: ExportCommand) -> Outcome {
        let now = Utc::now();
        match cmd {
            ExportCommand::Machines { format } => {
                let machines = self.machines.list_machines().await.machines;
                let records = machine_report(&machines, now).map_err(failed("Export Failed"))?;
                self.save("atm-report", format.into(), &records)
            }
            ExportCommand::Network { format } => {
                let machines = self.machines.list_machines().await.machines;
                let records = network_summary_report(&machines, now).map_err(failed("Export Failed"))?;
                self.save("analytics-report", format.into(), &records)
            }
            ExportCommand::Requests { status, format } => {
                let filter = parse_status_filter(&status)?;
                let requests = self.requests.list_requests(filter).await.map_err(failed("Export Failed"))?;
                let records = refill_request_report(&requests, now).map_err(failed("Export Failed"))?;
                self.save("refill-requests-report", format.into(), &records)
            }
            ExportCommand::Forecast { atm_id, factors, format } => {
                let (prediction, _) = self.predict_for(&atm_id, &factors).await?;
                let records = match prediction {
                    Prediction::Backend(res) => backend_prediction_report(&res.daily_predictions, now),
                    Prediction::Local(days) => forecast_report(&days, now),
                }.map_err(failed("Export Failed"))?;
                self.save("predictions-report", format.into(), &records)
            }
            ExportCommand::Analytics { range } => {
                let (start, end) = range.resolve(today());
                let value = self.analytics.network_analytics(start, end).await.map_err(failed("Export Failed"))?;
                let content = export::encode_json(&value).map_err(failed("Export Failed"))?;
                let filename = generate_filename("network-analytics", ExportFormat::Json.extension(), now);
                let path = write_report(&self.config.export_dir, &filename, &content).map_err(failed("Export Failed"))?;
                Ok(Notice::success("Export Complete", path.display().to_string()))
            }
        }
    }

    async fn watch(&self) -> Outcome {
        if !self.client.session().is_authenticated() {
            return Err(Notice::failure("Not Logged In", "Log in first"));
        }

        let board = MachineBoard::new_dyn();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let refresh = tokio::spawn(run_refresh_loop(
            self.machines.clone(),
            board.clone(),
            self.config.refresh_interval(),
            shutdown_rx,
        ));

        let push = PushChannel::connect(
            &self.config.push_url,
            ReconnectPolicy::default(),
            Box::new(|message: serde_json::Value| println!("push: {}", message)),
            Some(Box::new(|e: &push_channel::error::Error| warn!("Push channel: {}", e))),
        );

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut ticker = tokio::time::interval(self.config.refresh_interval());
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Some(source) = board.source() {
                        if source == DataSource::Fallback {
                            println!("(offline: sample data)");
                        }
                        print_summary(&board.machines());
                    }
                }
                _ = &mut ctrl_c => break,
            }
        }

        info!("Stopping watch");
        shutdown_tx.send_replace(true);
        push.disconnect();
        if let Err(e) = refresh.await {
            warn!("Refresh loop ended abnormally: {}", e);
        }
        Ok(Notice::success("Watch Stopped", format!("Push channel {:?}", push.closed().await)))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = Config::load(Some(cli.config.as_path()))?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if let Some(url) = cli.ws_url {
        config.push_url = url;
    }

    let session = Session::restore(FileTokenStore::new_dyn(config.token_file.clone()))?;
    let client = ApiClient::new(&config.api_base_url, ReqwestTransport::new_dyn(Client::new()), session);
    let app = App::new(config, client);

    let notice = app.run(cli.command).await;
    if notice.is_failure() {
        eprintln!("{}", notice);
        return Ok(ExitCode::FAILURE);
    }
    println!("{}", notice);
    Ok(ExitCode::SUCCESS)
}
