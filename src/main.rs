use concurrent_work_queue::{
    logging::{self, info, warn},
    Config, WorkQueue,
};
use crossbeam::channel;
use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    ops::Range,
    time::Instant,
};


const SEED: &str = "concurrent-work-queue";
const CHUNK: u64 = 50_000;
const MAX_CHUNKS: u64 = 100_000;

fn leading_zero_bits(nonce: u64) -> u32 {
    let mut hasher = DefaultHasher::new();
    SEED.hash(&mut hasher);
    nonce.hash(&mut hasher);
    hasher.finish().leading_zeros()
}

// Демо: параллельный поиск nonce. Первый найденный ответ останавливает весь пул.
fn main() {
    logging::init_default();

    let mut args = std::env::args().skip(1);
    let difficulty: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(24);
    let threads: usize = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or_else(|| Config::default().num_threads);

    let (answer_tx, answer_rx) = channel::unbounded::<u64>();

    let now = Instant::now();
    let pool = WorkQueue::<Range<u64>>::builder()
        .threads(threads)
        .observer(|range: &Range<u64>| {
            if range.start % (CHUNK * 100) == 0 {
                info!(from = range.start, "searching");
            }
        })
        .build(move |mut range: Range<u64>| {
            match range.find(|&nonce| leading_zero_bits(nonce) >= difficulty) {
                Some(nonce) => {
                    let _ = answer_tx.send(nonce);
                    false
                }
                None => true,
            }
        });

    let pool = match pool {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("failed to start work queue: {err}");
            std::process::exit(1);
        }
    };

    for chunk in 0..MAX_CHUNKS {
        let start = chunk * CHUNK;
        if pool.submit(start..start + CHUNK).is_err() {
            break;
        }
    }
    pool.join();

    let metrics = pool.metrics();
    match answer_rx.try_recv() {
        Ok(nonce) => info!(
            nonce,
            bits = leading_zero_bits(nonce),
            chunks = metrics.completed_tasks,
            abandoned = metrics.abandoned_tasks,
            "nonce found"
        ),
        Err(_) => warn!(difficulty, "no nonce found in the searched range"),
    }
    println!("elapsed: {:?}", now.elapsed());
}
