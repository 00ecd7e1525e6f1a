//! Simple profiling guards using thread-local storage
//!
//! Lightweight profiling without changing function signatures.
//! Enable with environment variable: TRON_PROFILE=1

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

thread_local! {
    static MOVE_GEN_TIME: RefCell<u64> = RefCell::new(0);
    static MOVE_GEN_COUNT: RefCell<usize> = RefCell::new(0);

    static EVAL_TIME: RefCell<u64> = RefCell::new(0);
    static EVAL_COUNT: RefCell<usize> = RefCell::new(0);

    static PATH_CHECK_TIME: RefCell<u64> = RefCell::new(0);
    static PATH_CHECK_COUNT: RefCell<usize> = RefCell::new(0);

    static FLOOD_FILL_TIME: RefCell<u64> = RefCell::new(0);
    static FLOOD_FILL_COUNT: RefCell<usize> = RefCell::new(0);

    static ALPHA_BETA_TIME: RefCell<u64> = RefCell::new(0);
    static ALPHA_BETA_COUNT: RefCell<usize> = RefCell::new(0);
    static ALPHA_BETA_CUTOFFS: RefCell<usize> = RefCell::new(0);
}

// Global aggregators
static GLOBAL_MOVE_GEN_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_MOVE_GEN_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_EVAL_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_EVAL_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_PATH_CHECK_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_PATH_CHECK_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_FLOOD_FILL_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_FLOOD_FILL_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_ALPHA_BETA_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_ALPHA_BETA_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_ALPHA_BETA_CUTOFFS: AtomicUsize = AtomicUsize::new(0);

static PROFILING_ENABLED: OnceLock<bool> = OnceLock::new();

#[inline]
pub fn is_profiling_enabled() -> bool {
    *PROFILING_ENABLED.get_or_init(|| std::env::var("TRON_PROFILE").is_ok())
}

pub struct ProfileGuard {
    start: Instant,
    category: &'static str,
}

impl ProfileGuard {
    pub fn new(category: &'static str) -> Option<Self> {
        if is_profiling_enabled() {
            Some(ProfileGuard {
                start: Instant::now(),
                category,
            })
        } else {
            None
        }
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;

        match self.category {
            "move_gen" => {
                MOVE_GEN_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                MOVE_GEN_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            "eval" => {
                EVAL_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                EVAL_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            "path_check" => {
                PATH_CHECK_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                PATH_CHECK_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            "flood_fill" => {
                FLOOD_FILL_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                FLOOD_FILL_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            "alpha_beta" => {
                ALPHA_BETA_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                ALPHA_BETA_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            _ => {}
        }
    }
}

#[inline]
pub fn record_alpha_beta_cutoff() {
    if is_profiling_enabled() {
        ALPHA_BETA_CUTOFFS.with(|c| *c.borrow_mut() += 1);
    }
}

fn drain(local: &'static std::thread::LocalKey<RefCell<u64>>, global: &AtomicU64) {
    local.with(|t| {
        global.fetch_add(*t.borrow(), Ordering::Relaxed);
        *t.borrow_mut() = 0;
    });
}

fn drain_count(local: &'static std::thread::LocalKey<RefCell<usize>>, global: &AtomicUsize) {
    local.with(|c| {
        global.fetch_add(*c.borrow(), Ordering::Relaxed);
        *c.borrow_mut() = 0;
    });
}

/// Folds this thread's counters into the global totals.
/// Must run on every thread that searched (rayon workers included).
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    drain(&MOVE_GEN_TIME, &GLOBAL_MOVE_GEN_TIME);
    drain_count(&MOVE_GEN_COUNT, &GLOBAL_MOVE_GEN_COUNT);
    drain(&EVAL_TIME, &GLOBAL_EVAL_TIME);
    drain_count(&EVAL_COUNT, &GLOBAL_EVAL_COUNT);
    drain(&PATH_CHECK_TIME, &GLOBAL_PATH_CHECK_TIME);
    drain_count(&PATH_CHECK_COUNT, &GLOBAL_PATH_CHECK_COUNT);
    drain(&FLOOD_FILL_TIME, &GLOBAL_FLOOD_FILL_TIME);
    drain_count(&FLOOD_FILL_COUNT, &GLOBAL_FLOOD_FILL_COUNT);
    drain(&ALPHA_BETA_TIME, &GLOBAL_ALPHA_BETA_TIME);
    drain_count(&ALPHA_BETA_COUNT, &GLOBAL_ALPHA_BETA_COUNT);
    drain_count(&ALPHA_BETA_CUTOFFS, &GLOBAL_ALPHA_BETA_CUTOFFS);
}

fn summarize(time_ns: u64, count: usize, total_ns: u64) -> (f64, f64, f64) {
    let ms = time_ns as f64 / 1_000_000.0;
    let pct = if total_ns > 0 { 100.0 * time_ns as f64 / total_ns as f64 } else { 0.0 };
    let avg_us = if count > 0 { time_ns as f64 / (count * 1000) as f64 } else { 0.0 };
    (ms, pct, avg_us)
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 PERFORMANCE PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    let mg_time = GLOBAL_MOVE_GEN_TIME.load(Ordering::Relaxed);
    let mg_count = GLOBAL_MOVE_GEN_COUNT.load(Ordering::Relaxed);
    let (mg_ms, mg_pct, mg_avg_us) = summarize(mg_time, mg_count, total_ns);

    eprintln!("Move Generation:");
    eprintln!("  Time:     {:.2}ms ({:.1}%)", mg_ms, mg_pct);
    eprintln!("  Calls:    {}", mg_count);
    eprintln!("  Avg:      {:.2}µs/call\n", mg_avg_us);

    let eval_time = GLOBAL_EVAL_TIME.load(Ordering::Relaxed);
    let eval_count = GLOBAL_EVAL_COUNT.load(Ordering::Relaxed);
    let (eval_ms, eval_pct, eval_avg_us) = summarize(eval_time, eval_count, total_ns);

    let pc_time = GLOBAL_PATH_CHECK_TIME.load(Ordering::Relaxed);
    let pc_count = GLOBAL_PATH_CHECK_COUNT.load(Ordering::Relaxed);
    let (pc_ms, pc_pct, pc_avg_us) = summarize(pc_time, pc_count, eval_time);

    let ff_time = GLOBAL_FLOOD_FILL_TIME.load(Ordering::Relaxed);
    let ff_count = GLOBAL_FLOOD_FILL_COUNT.load(Ordering::Relaxed);
    let (ff_ms, ff_pct, ff_avg_us) = summarize(ff_time, ff_count, eval_time);

    eprintln!("Evaluation:");
    eprintln!("  Total Time:            {:.2}ms ({:.1}%)", eval_ms, eval_pct);
    eprintln!("  Calls:                 {}", eval_count);
    eprintln!("  Avg:                   {:.2}µs/call", eval_avg_us);
    eprintln!("  Path Check:            {:.2}ms ({:.1}%) - {} calls, {:.2}µs avg",
        pc_ms, pc_pct, pc_count, pc_avg_us);
    eprintln!("  Flood Fill (Space):    {:.2}ms ({:.1}%) - {} calls, {:.2}µs avg\n",
        ff_ms, ff_pct, ff_count, ff_avg_us);

    let ab_time = GLOBAL_ALPHA_BETA_TIME.load(Ordering::Relaxed);
    let ab_count = GLOBAL_ALPHA_BETA_COUNT.load(Ordering::Relaxed);
    let ab_cutoffs = GLOBAL_ALPHA_BETA_CUTOFFS.load(Ordering::Relaxed);
    let (ab_ms, ab_pct, _) = summarize(ab_time, ab_count, total_ns);
    let per_decision = if ab_count > 0 { ab_cutoffs as f64 / ab_count as f64 } else { 0.0 };

    eprintln!("Search:");
    eprintln!("  Alpha-Beta: {:.2}ms ({:.1}%) - {} decisions, {} cutoffs ({:.1}/decision)\n",
        ab_ms, ab_pct, ab_count, ab_cutoffs, per_decision);

    eprintln!("═══════════════════════════════════════════════════════════\n");
}

pub fn reset() {
    GLOBAL_MOVE_GEN_TIME.store(0, Ordering::Relaxed);
    GLOBAL_MOVE_GEN_COUNT.store(0, Ordering::Relaxed);
    GLOBAL_EVAL_TIME.store(0, Ordering::Relaxed);
    GLOBAL_EVAL_COUNT.store(0, Ordering::Relaxed);
    GLOBAL_PATH_CHECK_TIME.store(0, Ordering::Relaxed);
    GLOBAL_PATH_CHECK_COUNT.store(0, Ordering::Relaxed);
    GLOBAL_FLOOD_FILL_TIME.store(0, Ordering::Relaxed);
    GLOBAL_FLOOD_FILL_COUNT.store(0, Ordering::Relaxed);
    GLOBAL_ALPHA_BETA_TIME.store(0, Ordering::Relaxed);
    GLOBAL_ALPHA_BETA_COUNT.store(0, Ordering::Relaxed);
    GLOBAL_ALPHA_BETA_CUTOFFS.store(0, Ordering::Relaxed);
}
