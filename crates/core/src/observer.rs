/// Receives solver events.
///
/// Observers let callers monitor a solve without changing its API, enabling
/// logging, progress reporting, or collecting diagnostics. They cannot steer
/// or stop the solve: a solve always runs to completion.
///
/// Closures automatically implement `Observer`, and a built-in impl for `()`
/// provides a no-op observer.
pub trait Observer<E> {
    /// Observes a solver event.
    fn observe(&mut self, event: &E);
}

/// Blanket implementation for observer closures.
impl<E, F> Observer<E> for F
where
    F: FnMut(&E),
{
    fn observe(&mut self, event: &E) {
        self(event);
    }
}

/// A no-op observer.
impl<E> Observer<E> for () {
    fn observe(&mut self, _event: &E) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit<O: Observer<usize>>(observer: &mut O, events: &[usize]) {
        for event in events {
            observer.observe(event);
        }
    }

    #[test]
    fn closure_sees_every_event() {
        let mut seen = Vec::new();
        emit(&mut |event: &usize| seen.push(*event), &[3, 1, 4]);

        assert_eq!(seen, vec![3, 1, 4]);
    }

    #[test]
    fn unit_observer_is_a_no_op() {
        emit(&mut (), &[1, 2, 3]);
    }
}
