pub mod spin;

pub use spin::SpinLock;
