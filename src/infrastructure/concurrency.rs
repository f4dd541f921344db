/// Concurrency management for Callscope.
/// Configures the rayon pool used by parallel rescans.

use anyhow::Result;

/// Initialize the global rayon thread pool with controlled worker count.
/// Reserves ~50% of CPU capacity so a hosting UI or editor stays responsive.
pub fn init_thread_pool() -> Result<()> {
    let cores = num_cpus::get();
    // Reserve 50% capacity, minimum 1 worker
    let workers = std::cmp::max(1, cores / 2);

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()?;

    println!(
        "[callscope] Initialized thread pool: {} workers (system has {} cores)",
        workers, cores
    );

    Ok(())
}
