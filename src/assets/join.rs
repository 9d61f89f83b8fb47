use std::thread;

/// Run two jobs concurrently and wait for both to finish.
pub fn join_both<A, B, FA, FB>(a: FA, b: FB) -> (A, B)
where
    FA: FnOnce() -> A + Send,
    FB: FnOnce() -> B + Send,
    A: Send,
    B: Send,
{
    thread::scope(|s| {
        let other = s.spawn(b);
        let first = a();
        let second = match other.join() {
            Ok(v) => v,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        (first, second)
    })
}
