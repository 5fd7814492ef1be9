//! Allocates and releases blocks of random sizes from a pool, printing its state along the way.
//!
//! Set `RUST_LOG=trace` to see every allocation and release.

use std::ptr::NonNull;

use rand::Rng;
use tracing_subscriber::EnvFilter;

use mempool::MemPool;

const MEMORY_SIZE: usize = 100 * 1024;
const MAX_SIZE: usize = 1000;
const NUMBER_POINTERS: usize = 100;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut memory = vec![0u8; MEMORY_SIZE];
    let pool: MemPool = match MemPool::new(memory.as_mut_ptr(), memory.len()) {
        Ok(pool) => pool,
        Err(error) => {
            eprintln!("Failed to create pool: {}", error);
            std::process::exit(1);
        }
    };

    let mut rng = rand::thread_rng();
    let mut pointers: Vec<Option<NonNull<u8>>> = Vec::with_capacity(NUMBER_POINTERS);

    for _ in 0..NUMBER_POINTERS {
        let size = rng.gen_range(1..=MAX_SIZE);

        match pool.try_allocate(size) {
            Ok(pointer) => {
                println!("Allocated memory at {:p}, size = {}", pointer, size);
                pointers.push(Some(pointer));
            }
            Err(error) => {
                eprintln!("Allocation of {} bytes failed: {}", size, error);
                std::process::exit(1);
            }
        }
    }

    print_state(&pool);

    for _ in 0..NUMBER_POINTERS / 2 {
        let index = rng.gen_range(0..NUMBER_POINTERS);

        if let Some(pointer) = pointers[index].take() {
            pool.release(pointer).expect("Allocated by the pool");
            println!("Freed memory at {:p}", pointer);
        }
    }

    print_state(&pool);

    for pointer in pointers.iter_mut().filter_map(Option::take) {
        pool.release(pointer).expect("Allocated by the pool");
        println!("Freed memory at {:p}", pointer);
    }

    print_state(&pool);

    pool.destroy();
}

fn print_state(pool: &MemPool) {
    println!("Used blocks:");
    for block in pool.used_blocks() {
        println!("{}", block);
    }

    println!("Free blocks:");
    for block in pool.free_blocks() {
        println!("{}", block);
    }

    let info = pool.info();
    println!("Memory usage ({} of {} bytes free, .: free, #: used):", info.free, info.total);
    println!("{}", pool.usage_map());
}
