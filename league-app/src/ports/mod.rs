pub mod match_lock;
