use std::{ptr::NonNull, sync::{Arc, Barrier}, thread};

use mempool::{Block, MemPool};

//
//  Tests
//

#[test]
fn concurrent_fixed_size_churn() {
    //  Each thread repeatedly allocates a batch of fixed-size blocks, stamps them with its own index, and checks the
    //  stamps once all threads are done allocating. An overlap between two blocks handed to different threads would
    //  corrupt at least one stamp.

    const BLOCK_SIZE: usize = 64;
    const BATCH: usize = 32;

    let number_iterations = number_iterations();
    let number_threads = number_threads();

    let mut memory = vec![0u8; BLOCK_SIZE * BATCH * number_threads * 2];
    let size = memory.len();
    let pool: Arc<MemPool> = Arc::new(MemPool::new(memory.as_mut_ptr(), size).expect("Valid region"));

    let allocated = Arc::new(Barrier::new(number_threads));
    let checked = Arc::new(Barrier::new(number_threads));

    let threads = Threads::new(number_threads, |thread_index| {
        let pool = pool.clone();
        let allocated = allocated.clone();
        let checked = checked.clone();

        move || {
            let stamp = thread_index as u8;

            for iteration in 0..number_iterations {
                let addresses: Vec<usize> = (0..BATCH)
                    .map(|_| {
                        let address = pool.allocate(BLOCK_SIZE).expect("Room for every thread");

                        //  Safety:
                        //  -   The block spans `BLOCK_SIZE` bytes of `memory`, which outlives the threads.
                        unsafe { std::ptr::write_bytes(address.as_ptr(), stamp, BLOCK_SIZE) };

                        address.as_ptr() as usize
                    })
                    .collect();

                allocated.wait();

                for address in &addresses {
                    //  Safety:
                    //  -   The block spans `BLOCK_SIZE` bytes of `memory`, which outlives the threads.
                    let bytes = unsafe { std::slice::from_raw_parts(*address as *const u8, BLOCK_SIZE) };

                    assert!(bytes.iter().all(|b| *b == stamp),
                        "thread {}, iteration {}, block {:x}", thread_index, iteration, address);
                }

                checked.wait();

                for address in addresses {
                    pool.release(NonNull::new(address as *mut u8).unwrap()).expect("Released");
                }
            }
        }
    });

    threads.join();

    assert_invariants(&pool.blocks(), size);
    assert_eq!(1, pool.block_count());
    assert_eq!(size, pool.info().free);
}

#[test]
fn concurrent_used_blocks_never_overlap() {
    //  Threads allocate and release blocks of varying sizes without coordination, while the main thread keeps checking
    //  that the snapshot of the blocks tiles the region.

    let number_iterations = number_iterations() * 100;
    let number_threads = number_threads();

    let mut memory = vec![0u8; 64 * 1024];
    let size = memory.len();
    let pool: Arc<MemPool> = Arc::new(MemPool::new(memory.as_mut_ptr(), size).expect("Valid region"));

    let threads = Threads::new(number_threads, |thread_index| {
        let pool = pool.clone();

        move || {
            let mut live = vec!();

            for i in 0..number_iterations {
                let size = 4 + (thread_index * 7 + i * 13) % 200;

                if let Some(address) = pool.allocate(size) {
                    live.push(address.as_ptr() as usize);
                }

                if live.len() > 8 || i % 3 == 0 {
                    if let Some(address) = live.pop() {
                        pool.release(NonNull::new(address as *mut u8).unwrap()).expect("Released");
                    }
                }
            }

            for address in live {
                pool.release(NonNull::new(address as *mut u8).unwrap()).expect("Released");
            }
        }
    });

    for _ in 0..100 {
        assert_invariants(&pool.blocks(), size);
    }

    threads.join();

    assert_invariants(&pool.blocks(), size);
    assert_eq!(size, pool.info().free);
}

//
//  Multi-threaded helpers
//

struct Threads(Vec<thread::JoinHandle<()>>);

impl Threads {
    fn new<F, G>(count: usize, mut factory: F) -> Self
        where
            F: FnMut(usize) -> G,
            G: FnOnce() + Send + 'static,
    {
        let threads : Vec<_> = (0..count)
            .map(|i| thread::spawn(factory(i)))
            .collect();

        Self(threads)
    }

    fn join(mut self) {
        let thread_handles = std::mem::replace(&mut self.0, vec!());
        Self::join_handles(thread_handles);
    }

    fn join_handles(thread_handles: Vec<thread::JoinHandle<()>>) {
        //  First join _all_ threads, then report failures.
        let results: Vec<_> = thread_handles.into_iter()
            .map(|handle| handle.join())
            .collect();

        for result in results {
            result.unwrap();
        }
    }
}

impl Drop for Threads {
    fn drop(&mut self) {
        let thread_handles = std::mem::replace(&mut self.0, vec!());

        //  Do not panic while panicking, the threads are joined regardless.
        if !thread::panicking() {
            Self::join_handles(thread_handles);
        } else {
            thread_handles.into_iter().for_each(|handle| { let _ = handle.join(); });
        }
    }
}

//
//  Implementation Details
//

fn number_iterations() -> usize { read_number_from_environment("MEMPOOL_MULTI_NUMBER_ITERATIONS", 10) }

fn number_threads() -> usize {
    read_number_from_environment("MEMPOOL_MULTI_NUMBER_THREADS", num_cpus::get().max(2).min(16))
}

fn read_number_from_environment(name: &str, default: usize) -> usize {
    if let Some(result) = std::env::var(name).ok().and_then(|value| value.parse().ok()) {
        println!("read_number_from_environment - {}: {}", name, result);
        return result;
    }

    println!("read_number_from_environment - {}: {} (default)", name, default);
    default
}

fn assert_invariants(blocks: &[Block], size: usize) {
    let mut end = 0;

    for (index, block) in blocks.iter().enumerate() {
        assert_eq!(end, block.offset(), "{:?}", blocks);
        assert!(block.size() > 0 && block.size() % 4 == 0, "{:?}", blocks);

        if index > 0 {
            assert!(blocks[index - 1].is_used() || block.is_used(), "{:?}", blocks);
        }

        end = block.end();
    }

    assert_eq!(size, end, "{:?}", blocks);
}
