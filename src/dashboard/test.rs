use std::{sync::Arc, time::Duration};

use tokio::sync::watch;

use crate::{
    machines::{
        fallback::sample_machines,
        models::{DataSource, MachineListing},
        MockMachineService,
    },
    refill_requests::models::{RefillRequest, RefillStatus},
};

use super::{
    cash_band, display_percentage,
    models::{CashBand, Notice, NoticeKind},
    refresh, run_refresh_loop, summarize, MachineBoard, RefillBoard,
};

fn listing(count: usize, source: DataSource) -> MachineListing {
    MachineListing { machines: sample_machines().into_iter().take(count).collect(), source }
}

fn request(id: &str, status: RefillStatus) -> anyhow::Result<RefillRequest> {
    Ok(serde_json::from_value(serde_json::json!({
        "request_id": id, "atm_id": "ATM001", "requested_amount": 1000,
        "requestor": "atm_ops", "status": status.as_str(),
        "created_at": "2024-01-30T09:15:00", "updated_at": "2024-01-30T09:15:00"
    }))?)
}

#[test]
fn test_summary_of_sample_network() {
    let summary = summarize(&sample_machines());

    assert_eq!(4, summary.machine_count);
    assert_eq!(140000.0, summary.total_cash);
    assert_eq!(2, summary.high_risk_count);
    assert!((summary.average_daily_withdrawal - 690000.0 / 28.0).abs() < 1e-6);
}

#[test]
fn test_summary_of_empty_network_is_zero() {
    let summary = summarize(&[]);

    assert_eq!(0.0, summary.total_cash);
    assert_eq!(0.0, summary.average_daily_withdrawal);
}

#[test]
fn test_cash_band_and_display_clamp() {
    let mut machine = sample_machines().remove(0);
    assert_eq!(CashBand::Green, cash_band(&machine));

    machine.current_cash = 39999.0;
    assert_eq!(CashBand::Amber, cash_band(&machine));

    machine.current_cash = 19999.0;
    assert_eq!(CashBand::Red, cash_band(&machine));

    // Out-of-range upstream data: the bar is clamped, the fraction is not
    machine.current_cash = 150000.0;
    assert_eq!(100.0, display_percentage(&machine));
    assert_eq!(150.0, machine.cash_percentage());

    machine.current_cash = -10.0;
    assert_eq!(0.0, display_percentage(&machine));
}

#[test]
fn test_stale_listing_cannot_overwrite_newer() {
    let board = MachineBoard::new_dyn();

    let older = board.begin_fetch();
    let newer = board.begin_fetch();

    assert!(board.complete(newer, listing(2, DataSource::Live)));
    assert!(!board.complete(older, listing(4, DataSource::Fallback)));

    assert_eq!(2, board.machines().len());
    assert_eq!(Some(DataSource::Live), board.source());
}

#[test]
fn test_listings_in_issue_order_all_apply() {
    let board = MachineBoard::new_dyn();
    assert_eq!(None, board.source());

    let first = board.begin_fetch();
    assert!(board.complete(first, listing(1, DataSource::Live)));
    let second = board.begin_fetch();
    assert!(board.complete(second, listing(3, DataSource::Fallback)));

    assert_eq!(3, board.machines().len());
    assert_eq!(Some(DataSource::Fallback), board.source());
}

#[tokio::test]
async fn test_refresh_applies_service_listing() -> anyhow::Result<()> {
    let mut service = MockMachineService::new();
    service.expect_list_machines()
        .times(1)
        .returning(|| listing(4, DataSource::Fallback));

    let service: crate::machines::DynMachineService = Arc::new(service);
    let board = MachineBoard::new_dyn();

    assert!(refresh(&service, &board).await);
    assert_eq!(4, board.machines().len());
    assert_eq!(Some(DataSource::Fallback), board.source());
    Ok(())
}

#[tokio::test]
async fn test_refresh_loop_ticks_until_shutdown() -> anyhow::Result<()> {
    let mut service = MockMachineService::new();
    service.expect_list_machines()
        .returning(|| listing(2, DataSource::Live));

    let board = MachineBoard::new_dyn();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(run_refresh_loop(
        Arc::new(service),
        board.clone(),
        Duration::from_millis(10),
        shutdown_rx,
    ));

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown_tx.send_replace(true);
    tokio::time::timeout(Duration::from_secs(5), handle).await??;

    assert_eq!(2, board.machines().len());
    Ok(())
}

#[test]
fn test_refill_board_only_moves_forward() -> anyhow::Result<()> {
    let mut board = RefillBoard::new(vec![request("REQ-1", RefillStatus::Pending)?]);

    assert!(board.apply_update(request("REQ-1", RefillStatus::Approved)?));
    // A stale pending copy arriving late
    assert!(!board.apply_update(request("REQ-1", RefillStatus::Pending)?));
    assert!(!board.apply_update(request("REQ-1", RefillStatus::Rejected)?));
    assert!(board.apply_update(request("REQ-1", RefillStatus::Completed)?));
    assert!(board.apply_update(request("REQ-2", RefillStatus::Pending)?));

    assert_eq!(2, board.requests().len());
    assert_eq!(RefillStatus::Completed, board.requests()[0].status);
    Ok(())
}

#[test]
fn test_notice_rendering() {
    let notice = Notice::from_error("Refill Failed", &"HTTP error! status: 500");

    assert_eq!(NoticeKind::Failure, notice.kind);
    assert!(notice.is_failure());
    assert_eq!("[error] Refill Failed: HTTP error! status: 500", notice.to_string());
    assert_eq!("[ok] Saved: done", Notice::success("Saved", "done").to_string());
}
