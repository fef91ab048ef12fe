pub mod models;

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use log::{debug, info};
use tokio::sync::watch;

use crate::{
    machines::{
        models::{DataSource, Machine, MachineListing, RiskLevel},
        DynMachineService,
    },
    refill_requests::models::RefillRequest,
};

use models::*;

#[cfg(test)]
mod test;

pub fn summarize(machines: &[Machine]) -> NetworkSummary {
    let average_daily_withdrawal = if machines.is_empty() {
        0.0
    } else {
        machines.iter().map(Machine::average_daily_withdrawal).sum::<f64>() / machines.len() as f64
    };

    NetworkSummary {
        machine_count: machines.len(),
        total_cash: machines.iter().map(|m| m.current_cash).sum(),
        high_risk_count: machines.iter().filter(|m| m.risk_level == RiskLevel::High).count(),
        average_daily_withdrawal,
    }
}

/// Coloring band from the unclamped cash percentage.
pub fn cash_band(machine: &Machine) -> CashBand {
    let pct = machine.cash_percentage();
    if pct < 20.0 {
        CashBand::Red
    } else if pct < 40.0 {
        CashBand::Amber
    } else {
        CashBand::Green
    }
}

/// Cash percentage clamped to `[0, 100]`, for drawing bars only.
pub fn display_percentage(machine: &Machine) -> f64 {
    machine.cash_percentage().clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

struct BoardState {
    machines: Vec<Machine>,
    source: Option<DataSource>,
    applied: Option<FetchTicket>,
}

pub type DynMachineBoard = Arc<MachineBoard>;

///
/// Machine list as held by the view. Fetches may overlap; each one takes a
/// ticket when issued and its result is applied only if no later-issued
/// fetch has been applied already.
///
pub struct MachineBoard {
    next_ticket: AtomicU64,
    state: Mutex<BoardState>,
}

impl MachineBoard {
    pub fn new_dyn() -> DynMachineBoard {
        Arc::new(Self {
            next_ticket: AtomicU64::new(0),
            state: Mutex::new(BoardState { machines: Vec::new(), source: None, applied: None }),
        })
    }

    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket(self.next_ticket.fetch_add(1, Ordering::SeqCst))
    }

    /// Returns whether the listing was applied.
    pub fn complete(&self, ticket: FetchTicket, listing: MachineListing) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.applied.is_some_and(|applied| applied > ticket) {
            debug!("Discarding stale machine listing {:?}", ticket);
            return false;
        }
        state.machines = listing.machines;
        state.source = Some(listing.source);
        state.applied = Some(ticket);
        true
    }

    pub fn machines(&self) -> Vec<Machine> {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).machines.clone()
    }

    /// `None` until the first fetch lands
    pub fn source(&self) -> Option<DataSource> {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).source
    }
}

pub async fn refresh(service: &DynMachineService, board: &DynMachineBoard) -> bool {
    let ticket = board.begin_fetch();
    let listing = service.list_machines().await;
    board.complete(ticket, listing)
}

///
/// Re-fetches the machine list every `interval` until `shutdown` flips.
/// Each tick runs on its own task so a slow backend does not delay the
/// next one.
///
pub async fn run_refresh_loop(
    service: DynMachineService,
    board: DynMachineBoard,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    info!("Refreshing machines every {:?}", interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let service = service.clone();
                let board = board.clone();
                tokio::spawn(async move {
                    refresh(&service, &board).await;
                });
            }
            _ = shutdown.changed() => break,
        }
    }
    info!("Refresh loop stopped");
}

///
/// Local copy of the refill workflow. Updates that would move a request
/// backwards through its status progression are ignored.
///
#[derive(Debug, Clone, Default)]
pub struct RefillBoard {
    requests: Vec<RefillRequest>,
}

impl RefillBoard {
    pub fn new(requests: Vec<RefillRequest>) -> Self {
        Self { requests }
    }

    pub fn requests(&self) -> &[RefillRequest] {
        &self.requests
    }

    /// Returns whether the update was applied.
    pub fn apply_update(&mut self, update: RefillRequest) -> bool {
        match self.requests.iter_mut().find(|r| r.request_id == update.request_id) {
            Some(held) => {
                if held.status != update.status && !held.status.can_transition_to(update.status) {
                    debug!(
                        "Ignoring {} -> {} for request {}",
                        held.status, update.status, update.request_id
                    );
                    return false;
                }
                *held = update;
                true
            }
            None => {
                self.requests.push(update);
                true
            }
        }
    }
}
