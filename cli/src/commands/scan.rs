use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use colored::*;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info_span, warn};

use crate::{mprint, terminal::{colors, format, print, spinner}};
use portscan_common::{config::Config, success};
use portscan_core::PreparedScan;
use portscan_core::network::tcp::TcpConnectProber;
use portscan_core::scanner::{ProbeResult, ScanOutcome, ScanStatus, Scanner};

pub async fn scan(prepared: PreparedScan, cfg: &Config) -> anyhow::Result<ScanStatus> {
    scan_begins(&prepared, cfg);

    let cancel = CancellationToken::new();
    let interrupt_handle = spawn_interrupt_listener(cancel.clone());

    let (open_tx, open_rx) = mpsc::unbounded_channel::<ProbeResult>();
    let scanner = Scanner::new(TcpConnectProber, prepared.settings)
        .with_notifier(open_tx)
        .with_cancellation(cancel);
    let reporter_handle = spawn_open_port_reporter(open_rx);

    let span = info_span!("scan", indicatif.pb_show = true);
    spinner::attach_progress_bar(&span, prepared.ports.len());
    let running: Arc<AtomicBool> = Arc::new(AtomicBool::new(true));
    let progress_handle =
        spinner::start_progress_updates(span.clone(), scanner.progress(), running.clone());

    let outcome: ScanOutcome = scanner
        .scan(prepared.addr, &prepared.ports)
        .instrument(span)
        .await;

    running.store(false, Ordering::Relaxed);
    let _ = progress_handle.await;
    interrupt_handle.abort();

    // Closes the notification channel so the reporter can drain and exit.
    drop(scanner);
    let _ = reporter_handle.await;

    scan_ends(&outcome, cfg);
    Ok(outcome.status)
}

fn spawn_interrupt_listener(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping scan...");
            cancel.cancel();
        }
    })
}

fn spawn_open_port_reporter(mut open_rx: UnboundedReceiver<ProbeResult>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(result) = open_rx.recv().await {
            print::print(&format::open_port_line(result.port));
        }
    })
}

fn scan_begins(prepared: &PreparedScan, cfg: &Config) {
    if cfg.quiet > 1 {
        return;
    }

    print::header("starting scanner", cfg.quiet);
    let started: String = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    print::aligned_line("Target", prepared.target.as_str());
    print::aligned_line("Address", format::ip_addr(&prepared.addr));
    print::aligned_line("Started", started);
    print::aligned_line("Mode", prepared.mode.to_string());
    print::aligned_line("Ports", prepared.ports.len().to_string());
    print::aligned_line("Threads", prepared.settings.concurrency().to_string());
    print::aligned_line("Timeout", format::seconds(prepared.settings.timeout));
    mprint!();
}

fn scan_ends(outcome: &ScanOutcome, cfg: &Config) {
    if cfg.quiet < 2 {
        mprint!();
    }

    if outcome.open_ports.is_empty() {
        no_ports_found(cfg);
    } else {
        print::header("summary", cfg.quiet);
        if cfg.quiet < 2 {
            let count: ColoredString = outcome.open_ports.len().to_string().bold().green();
            print::aligned_line("Open", format!("({count}) {}", format::port_list(&outcome.open_ports)));
        }
    }

    if cfg.quiet < 2 {
        print::aligned_line("Scanned", format!("{}/{}", outcome.ports_scanned, outcome.ports_requested));
        print::aligned_line("Time", format::seconds(outcome.elapsed).yellow());
    }
    print_summary(outcome, cfg);
}

fn no_ports_found(cfg: &Config) {
    print::header("no open ports", cfg.quiet);
    if cfg.quiet == 0 {
        print::no_results();
    }
    if cfg.quiet < 2 {
        print::print_status("No open ports identified (filters or firewalls may apply)");
    }
}

fn print_summary(outcome: &ScanOutcome, cfg: &Config) {
    let open_ports: ColoredString = format!("{} open ports", outcome.open_ports.len()).bold().green();
    let total_time: ColoredString = format::seconds(outcome.elapsed).bold().yellow();

    match outcome.status {
        ScanStatus::Completed => {
            let output: ColoredString =
                format!("Scan Complete: {open_ports} identified in {total_time}")
                    .color(colors::TEXT_DEFAULT);
            match cfg.quiet {
                0 => {
                    print::fat_separator();
                    print::centerln(&output.to_string());
                }
                _ => success!("{}", output),
            }
        }
        ScanStatus::Interrupted => {
            warn!(
                "Interrupted by user: {open_ports} identified before stopping, {}/{} ports scanned",
                outcome.ports_scanned, outcome.ports_requested
            );
        }
    }
}
