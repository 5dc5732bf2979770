//! Host probing.

/// Logical processing units available to this process, at least 1.
pub fn available_threads() -> usize {
    num_cpus::get().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_least_one_thread() {
        assert!(available_threads() >= 1);
    }
}
