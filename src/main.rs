use growpool::ThreadPool;
use std::thread;
use std::time::{Duration, Instant};

fn square_slowly(n: u64) -> u64 {
    thread::sleep(Duration::from_millis(5));
    n * n
}

fn main() {
    env_logger::init();

    let now = Instant::now();
    let pool = ThreadPool::new(8);

    let handles: Vec<_> = (0..30)
        .map(|i| {
            println!(
                "idle workers: {} / {}",
                pool.idle_count(),
                pool.worker_count()
            );
            pool.submit(move || square_slowly(i)).unwrap()
        })
        .collect();

    for (i, handle) in handles.iter().enumerate() {
        println!("{}^2 = {}", i, handle.get().unwrap());
    }

    let metrics = pool.metrics();
    println!(
        "completed {} of {} tasks on {} workers in {:?}",
        metrics.completed_tasks,
        metrics.submitted_tasks,
        metrics.workers,
        now.elapsed()
    );
}
