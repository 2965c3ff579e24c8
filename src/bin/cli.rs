// Stream panel operator CLI
// Drives the control panel gateway from a terminal and renders the same interlocked view as the page

use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::*;
use serde_json::Value;
use tokio::time::{sleep, Duration};

use stream_panel::api::RELOAD_DELAY_MS;
use stream_panel::config::{normalize_url, BackendConfig, LogFormat, DEFAULT_POLL_INTERVAL_SECS};
use stream_panel::gateway::{BackendClient, BackendReply, Command, DeleteFileRequest, Toggled};
use stream_panel::interlock::{self, ControlId, ControlStyle, ControlView, PanelView};
use stream_panel::poller::{PanelModel, Poller, Region};
use stream_panel::state::{CpuStats, DiskUsage, LogSnapshot, OperationalState, SysInfo};
use stream_panel::logging;
use stream_panel::PanelError;

#[derive(Parser)]
#[command(name = "panel-cli")]
#[command(about = "Stream control panel CLI", long_about = None)]
struct Cli {
    /// Gateway address (default: 127.0.0.1:3000)
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    server: String,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Print debug logs
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway health endpoint
    Health,

    /// Fetch backend state and render the panel once
    State {
        /// Print the rendered view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Poll the gateway and re-render whenever something changes
    Monitor {
        /// Poll interval in seconds
        #[arg(short, long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
        interval: u64,
    },

    /// Toggle a mode: stream, stream_record, record or file_stream
    Toggle {
        control: ControlId,

        /// Send even if another active mode locks this control
        #[arg(long)]
        force: bool,
    },

    /// Send a raw command such as start_stream or reboot
    Send { command: Command },

    /// Show the activity log
    Logs {
        /// Show the ffmpeg log instead
        #[arg(long)]
        ffmpeg: bool,
    },

    /// Show CPU, memory and disk usage
    Stats,

    /// Show system information
    SysInfo,

    /// Update backend configuration, e.g. BITRATE=4500 FRAME_RATE=30
    UpdateConfig {
        #[arg(required = true)]
        pairs: Vec<String>,
    },

    /// Delete a recording
    Delete {
        #[arg(short, long)]
        directory: String,

        #[arg(short, long)]
        filename: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        std::env::set_var("RUST_LOG", "stream_panel=debug");
        logging::init(LogFormat::Pretty);
    }

    let client = match BackendClient::new(&BackendConfig {
        url: normalize_url(&cli.server),
        timeout_secs: cli.timeout,
    }) {
        Ok(client) => client,
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            std::process::exit(1);
        }
    };

    let ok = match &cli.command {
        Commands::Health => check_health(&client).await,
        Commands::State { json } => show_state(&client, *json).await,
        Commands::Monitor { interval } => monitor(client, *interval).await,
        Commands::Toggle { control, force } => toggle(&client, *control, *force).await,
        Commands::Send { command } => send_command(&client, *command).await,
        Commands::Logs { ffmpeg } => show_log(&client, *ffmpeg).await,
        Commands::Stats => show_stats(&client).await,
        Commands::SysInfo => show_sys_info(&client).await,
        Commands::UpdateConfig { pairs } => update_config(&client, pairs).await,
        Commands::Delete {
            directory,
            filename,
        } => {
            delete_file(
                &client,
                DeleteFileRequest {
                    directory: directory.clone(),
                    filename: filename.clone(),
                },
            )
            .await
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

async fn check_health(client: &BackendClient) -> bool {
    println!("{}", "Checking gateway health...".cyan());

    match client.get("health").await {
        Ok(reply) if reply.status.is_success() => {
            println!("{} Health check passed", "✓".green());
            println!("  Status: {}", reply.body["status"].as_str().unwrap_or("unknown"));
            println!("  Service: {}", reply.body["service"].as_str().unwrap_or("unknown"));
            println!("  Version: {}", reply.body["version"].as_str().unwrap_or("unknown"));
            true
        }
        Ok(reply) => {
            println!("{} Health check failed: {}", "✗".red(), reply.status);
            false
        }
        Err(e) => {
            println!("{} Cannot connect to gateway: {}", "✗".red(), e);
            println!("  Make sure the gateway is running on {}", client.base_url());
            false
        }
    }
}

async fn fetch_view(client: &BackendClient) -> Option<PanelView> {
    match client.get_json::<OperationalState>("load_state").await {
        Ok(state) => Some(interlock::render(&state)),
        Err(e) => {
            println!("{} Failed to load state: {}", "✗".red(), e);
            None
        }
    }
}

async fn show_state(client: &BackendClient, json: bool) -> bool {
    let Some(view) = fetch_view(client).await else {
        return false;
    };

    if json {
        match serde_json::to_string_pretty(&view) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                println!("{} {}", "✗".red(), e);
                return false;
            }
        }
    } else {
        print_panel(&view);
    }
    true
}

async fn monitor(client: BackendClient, interval: u64) -> bool {
    let interval = Duration::from_secs(interval.max(1));
    println!(
        "{} Monitoring {} every {}s (Ctrl+C to exit)",
        "▶".cyan(),
        client.base_url(),
        interval.as_secs()
    );

    let (poller, mut events) = Poller::spawn(Arc::new(client), interval);
    let mut model = PanelModel::default();

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                if let Some(region) = model.apply(event) {
                    print_region(&model, region);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\n{}", "Stopping monitor".yellow());
                break;
            }
        }
    }

    poller.shutdown();
    true
}

async fn toggle(client: &BackendClient, control: ControlId, force: bool) -> bool {
    match client.toggle(control, force).await {
        Ok(Toggled { view, reply }) if reply.status.is_success() => {
            print_panel(&view.in_flight(control));
            println!("{} Toggled {}", "✓".green(), control);
        }
        Ok(Toggled { reply, .. }) => {
            println!("{} Failed to toggle {}: {}", "✗".red(), control, reply.status);
            print_message(&reply.body);
            return false;
        }
        Err(e @ PanelError::ControlLocked { .. }) => {
            println!("{} {}", "⚠".yellow(), e);
            println!("  Use --force to send it anyway");
            return false;
        }
        Err(e) => {
            println!("{} Failed to toggle {}: {}", "✗".red(), control, e);
            return false;
        }
    }

    match fetch_view(client).await {
        Some(view) => {
            print_panel(&view);
            true
        }
        None => false,
    }
}

async fn send_command(client: &BackendClient, command: Command) -> bool {
    println!("{} {}", "Sending".cyan(), command);
    report(client.post_empty(command.as_str()).await)
}

async fn show_log(client: &BackendClient, ffmpeg: bool) -> bool {
    let path = if ffmpeg { "get_ffmpeg_log" } else { "get_log" };

    match client.get_json::<LogSnapshot>(path).await {
        Ok(LogSnapshot::Log { log }) => {
            println!("{}", log);
            true
        }
        Ok(LogSnapshot::Error { error }) => {
            println!("{} Error fetching log: {}", "✗".red(), error);
            false
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            false
        }
    }
}

async fn show_stats(client: &BackendClient) -> bool {
    let cpu = client.get_json::<CpuStats>("get_cpu_stats").await;
    let disk = client.get_json::<DiskUsage>("get_disk_usage").await;

    let mut ok = true;
    match cpu {
        Ok(stats) => print_cpu(&stats),
        Err(e) => {
            println!("{} Error fetching stats: {}", "✗".red(), e);
            ok = false;
        }
    }
    match disk {
        Ok(disk) => print_disk(&disk),
        Err(e) => {
            println!("{} Error fetching disk usage: {}", "✗".red(), e);
            ok = false;
        }
    }
    ok
}

async fn show_sys_info(client: &BackendClient) -> bool {
    match client.get_json::<SysInfo>("get_sys_info").await {
        Ok(SysInfo::Info { info }) => {
            println!("{}", info);
            true
        }
        Ok(SysInfo::Error { error }) => {
            println!("{} {}", "✗".red(), error);
            false
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            false
        }
    }
}

async fn update_config(client: &BackendClient, pairs: &[String]) -> bool {
    let mut form = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            println!("{} Expected KEY=VALUE, got '{}'", "✗".red(), pair);
            return false;
        };
        form.push(format!(
            "{}={}",
            urlencoding::encode(key.trim()),
            urlencoding::encode(value)
        ));
    }

    println!("{}", "Updating configuration...".cyan());
    report(client.post_form("update_config", form.join("&")).await)
}

async fn delete_file(client: &BackendClient, request: DeleteFileRequest) -> bool {
    if let Err(e) = request.validate() {
        println!("{} {}", "✗".red(), e);
        return false;
    }

    println!(
        "{} {}/{}",
        "Deleting".cyan(),
        request.directory,
        request.filename
    );
    if !report(client.post_form("delete_file", request.to_form_body()).await) {
        return false;
    }

    sleep(Duration::from_millis(RELOAD_DELAY_MS)).await;
    show_state(client, false).await
}

fn report(result: stream_panel::Result<BackendReply>) -> bool {
    match result {
        Ok(reply) if reply.status.is_success() => {
            print!("{} ", "✓".green());
            print_message(&reply.body);
            true
        }
        Ok(reply) => {
            print!("{} {} ", "✗".red(), reply.status);
            print_message(&reply.body);
            false
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            false
        }
    }
}

fn print_message(body: &Value) {
    match (body["message"].as_str(), body["error"].as_str()) {
        (Some(message), _) => println!("{}", message),
        (None, Some(error)) => println!("{}", error.red()),
        _ => println!("{}", body),
    }
}

fn print_panel(view: &PanelView) {
    println!("\n{}", "═".repeat(50).cyan());
    if view.state.is_idle() {
        println!("  {}", "Idle".green().bold());
    } else {
        println!("  {}", "Busy".yellow().bold());
    }
    for control in &view.controls {
        print_control(control);
    }
    println!("{}", "─".repeat(50).cyan());

    let shared = &view.shared;
    println!(
        "  Recording actions: {}",
        flag(shared.recording_actions_visible, "visible", "hidden")
    );
    println!(
        "  Inputs & selects:  {}",
        flag(shared.form_controls_enabled, "enabled", "disabled")
    );
    println!(
        "  Primary actions:   {}",
        flag(shared.primary_actions_enabled, "enabled", "disabled")
    );
    println!("{}", "═".repeat(50).cyan());
}

fn print_control(control: &ControlView) {
    let label = match control.style {
        ControlStyle::Active => control.label.red().bold(),
        ControlStyle::Idle => control.label.green().bold(),
    };
    let label = if control.enabled { label } else { label.dimmed() };

    let status = match (control.enabled, control.locked_by) {
        (true, _) => "enabled".normal(),
        (false, Some(mode)) => format!("locked ({:?})", mode).yellow(),
        (false, None) => "disabled".yellow(),
    };

    println!("  {:<14} {:<28} {}", control.id.as_str(), label, status);
}

fn print_region(model: &PanelModel, region: Region) {
    match region {
        Region::Controls => {
            if let Some(view) = &model.view {
                print_panel(view);
            }
        }
        Region::Log => {
            if let Some(log) = &model.log {
                println!("{}", "── activity log ──".bold());
                println!("{}", tail(log, 10));
            }
        }
        Region::FfmpegLog => {
            if let Some(log) = &model.ffmpeg_log {
                println!("{}", "── ffmpeg log ──".bold());
                println!("{}", tail(log, 10));
            }
        }
        Region::Stats => {
            if let Some(cpu) = &model.cpu {
                print_cpu(cpu);
            }
        }
        Region::Disk => {
            if let Some(disk) = &model.disk {
                print_disk(disk);
            }
        }
        Region::SysInfo => {
            if let Some(info) = &model.sys_info {
                println!("{}", "── system ──".bold());
                println!("{}", info);
            }
        }
    }
}

fn print_cpu(stats: &CpuStats) {
    println!("  CPU Usage: {}%", stats.cpu_usage);
    println!("  Memory Usage: {}%", stats.memory_usage_percent);
}

fn print_disk(disk: &DiskUsage) {
    println!("  File System: {}", disk.filesystem);
    println!("  Disk Size: {}", disk.size);
    println!("  Disk Used: {}", disk.used);
    println!("  Disk Available: {}", disk.available);
}

fn flag(on: bool, yes: &str, no: &str) -> ColoredString {
    if on {
        yes.green()
    } else {
        no.yellow()
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}
