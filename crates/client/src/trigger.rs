//! "Request in flight" state for the upload trigger.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::presenter::Presenter;

/// Tracks whether an upload is running and mirrors it onto the trigger.
#[derive(Debug, Default)]
pub struct Trigger {
    in_flight: AtomicBool,
}

impl Trigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the trigger, disabling it on `presenter`.
    ///
    /// Returns `None` if an upload is already in flight. The trigger is
    /// re-enabled when the returned guard drops, on every exit path.
    pub fn acquire<'a, P: Presenter + ?Sized>(
        &'a self,
        presenter: &'a P,
    ) -> Option<InFlight<'a, P>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        presenter.set_trigger_enabled(false);
        Some(InFlight {
            trigger: self,
            presenter,
        })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Guard held for the duration of one upload.
pub struct InFlight<'a, P: Presenter + ?Sized> {
    trigger: &'a Trigger,
    presenter: &'a P,
}

impl<P: Presenter + ?Sized> Drop for InFlight<'_, P> {
    fn drop(&mut self) {
        self.trigger.in_flight.store(false, Ordering::Release);
        self.presenter.set_trigger_enabled(true);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use analyst_core::dashboard::DashboardView;

    use super::*;

    #[derive(Default)]
    struct ButtonOnly {
        states: RefCell<Vec<bool>>,
    }

    impl Presenter for ButtonOnly {
        fn alert(&self, _message: &str) {}
        fn set_trigger_enabled(&self, enabled: bool) {
            self.states.borrow_mut().push(enabled);
        }
        fn set_status(&self, _text: &str) {}
        fn set_result_text(&self, _text: &str) {}
        fn show_video(&self, _url: &str) {}
        fn render_dashboard(&self, _view: &DashboardView) {}
        fn set_active_angle(&self, _angle: &str) {}
    }

    #[test]
    fn guard_disables_then_reenables() {
        let trigger = Trigger::new();
        let button = ButtonOnly::default();

        {
            let _guard = trigger.acquire(&button).expect("free");
            assert!(trigger.is_in_flight());
            assert_eq!(*button.states.borrow(), vec![false]);
        }

        assert!(!trigger.is_in_flight());
        assert_eq!(*button.states.borrow(), vec![false, true]);
    }

    #[test]
    fn second_acquire_is_refused_while_held() {
        let trigger = Trigger::new();
        let button = ButtonOnly::default();

        let guard = trigger.acquire(&button).expect("free");
        assert!(trigger.acquire(&button).is_none());
        drop(guard);
        assert!(trigger.acquire(&button).is_some());
    }

    #[test]
    fn guard_releases_on_early_return() {
        fn fails(trigger: &Trigger, button: &ButtonOnly) -> Result<(), &'static str> {
            let _guard = trigger.acquire(button).ok_or("busy")?;
            Err("network down")
        }

        let trigger = Trigger::new();
        let button = ButtonOnly::default();
        assert_eq!(fails(&trigger, &button), Err("network down"));
        assert!(!trigger.is_in_flight());
        assert_eq!(button.states.borrow().last(), Some(&true));
    }
}
