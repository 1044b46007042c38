use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use num_format::{Locale, ToFormattedString};

const SLIDING_WINDOW: Duration = Duration::from_secs(2);
const BATCH: u64 = 1000;

static STOP: AtomicBool = AtomicBool::new(false);

// padded so that counters of different workers do not share a cache line
#[repr(C)]
#[allow(dead_code)]
#[derive(Default)]
struct WorkerStats {
    count: AtomicU64,
    padding: [u64; 15],
}

/// Runs `func` in a loop on every physical core but one until Ctrl-C,
/// printing the combined throughput every couple of seconds.
pub fn test_throughput<F>(func: F)
where
    F: Fn() + Sync + Send + 'static,
{
    if let Err(err) = ctrlc::set_handler(|| STOP.store(true, Ordering::SeqCst)) {
        eprintln!("Error setting Ctrl-C handler: {err}");
        return;
    }

    let num_threads = num_cpus::get_physical().max(2);
    println!("Number threads: {num_threads}");

    let func = Arc::new(func);
    let stats: Arc<Vec<WorkerStats>> =
        Arc::new((0..num_threads).map(|_| WorkerStats::default()).collect());
    let mut handles = Vec::with_capacity(num_threads);

    let monitor_stats = Arc::clone(&stats);
    handles.push(thread::spawn(move || {
        let mut window_start = Instant::now();
        let mut previous_total = 0u64;
        while !STOP.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(500));
            let elapsed = window_start.elapsed();
            if elapsed < SLIDING_WINDOW {
                continue;
            }
            let total: u64 = monitor_stats
                .iter()
                .map(|worker| worker.count.load(Ordering::Relaxed))
                .sum();
            let per_sec = ((total - previous_total) as f64 / elapsed.as_secs_f64()) as u64;
            println!(
                "Throughput: {} iterations/sec",
                per_sec.to_formatted_string(&Locale::en)
            );
            previous_total = total;
            window_start = Instant::now();
        }
    }));

    for worker in 0..num_threads - 1 {
        let stats = Arc::clone(&stats);
        let func = Arc::clone(&func);
        handles.push(thread::spawn(move || {
            while !STOP.load(Ordering::SeqCst) {
                for _ in 0..BATCH {
                    func();
                }
                stats[worker].count.fetch_add(BATCH, Ordering::Relaxed);
            }
        }));
    }

    for handle in handles {
        let _ = handle.join();
    }
}
