use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Liveness flag of a view that starts async work
///
/// Results that arrive after the view is gone must not be applied. Hand a
/// [`LifetimeToken`] to the task and check it before setting state.
#[derive(Debug)]
pub struct ViewLifetime {
    alive: Arc<AtomicBool>,
}

#[derive(Debug, Clone)]
pub struct LifetimeToken {
    alive: Arc<AtomicBool>,
}

impl Default for ViewLifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewLifetime {
    pub fn new() -> Self {
        Self { alive: Arc::new(AtomicBool::new(true)) }
    }

    pub fn token(&self) -> LifetimeToken {
        LifetimeToken { alive: self.alive.clone() }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the view as torn down
    pub fn end(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

impl Drop for ViewLifetime {
    fn drop(&mut self) {
        self.end();
    }
}

impl LifetimeToken {
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Run `apply` only while the view is still alive
    pub fn apply_if_alive<T, R>(&self, value: T, apply: impl FnOnce(T) -> R) -> Option<R> {
        if self.is_alive() {
            Some(apply(value))
        } else {
            debug!("Dropping late result for a closed view");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_late_result_is_dropped() {
        let view = ViewLifetime::new();
        let token = view.token();
        let mut shown = Vec::new();

        token.apply_if_alive("first", |v| shown.push(v));
        view.end();
        assert_eq!(token.apply_if_alive("late", |v| shown.push(v)), None);
        assert_eq!(shown, vec!["first"]);
    }

    #[test]
    fn test_drop_ends_lifetime() {
        let token = {
            let view = ViewLifetime::new();
            view.token()
        };
        assert!(!token.is_alive());
    }

    #[test]
    fn test_token_across_threads() {
        let view = ViewLifetime::new();
        let token = view.token();
        let handle = std::thread::spawn(move || token.apply_if_alive(3, |v| v * 2));
        assert_eq!(handle.join().unwrap(), Some(6));
    }
}
