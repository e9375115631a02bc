//! L3 Molecular Layer: single finish subscription on the current animation

use std::rc::Rc;

use tracing::trace;

use super::animation::{Animation, AnimationId, ListenerId};

pub type FinishCallback = Rc<dyn Fn()>;

#[derive(Default)]
pub struct FinishNotifier {
    callback: Option<FinishCallback>,
    subscription: Option<(AnimationId, ListenerId)>,
}

impl std::fmt::Debug for FinishNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinishNotifier")
            .field("has_callback", &self.callback.is_some())
            .field("subscription", &self.subscription)
            .finish()
    }
}

impl FinishNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Replace the callback and move the subscription over to it
    pub fn set_callback(&mut self, callback: Option<FinishCallback>, mut anim: Option<&mut Animation>) {
        self.unsubscribe(anim.as_deref_mut());
        self.callback = callback;
        self.subscribe(anim);
    }

    /// Subscribe the callback to `anim`, dropping any previous subscription first
    pub fn subscribe(&mut self, mut anim: Option<&mut Animation>) {
        self.unsubscribe(anim.as_deref_mut());
        let (Some(anim), Some(callback)) = (anim, self.callback.as_ref()) else {
            return;
        };
        let callback = Rc::clone(callback);
        let listener = anim.add_finish_listener(Box::new(move || callback()));
        trace!(animation = ?anim.id(), "Subscribed finish callback");
        self.subscription = Some((anim.id(), listener));
    }

    /// Remove the subscription. If `anim` is no longer the subscribed
    /// animation the listener went away with it and only the record is cleared.
    pub fn unsubscribe(&mut self, anim: Option<&mut Animation>) {
        let Some((animation_id, listener)) = self.subscription.take() else {
            return;
        };
        if let Some(anim) = anim {
            if anim.id() == animation_id {
                anim.remove_finish_listener(listener);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use super::*;
    use crate::clock::ManualClock;
    use crate::engine::animation::{Keyframes, Timeline};

    const KEYS: Keyframes = Keyframes {
        from_y: 0.0,
        to_y: -100.0,
    };

    fn counter() -> (Rc<Cell<u32>>, FinishCallback) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        (count, Rc::new(move || c.set(c.get() + 1)))
    }

    #[test]
    fn test_one_listener_per_animation() {
        let timeline = Timeline::new(Rc::new(ManualClock::new()));
        let mut anim = timeline.animate(KEYS, Duration::ZERO);
        let (count, cb) = counter();

        let mut notifier = FinishNotifier::new();
        notifier.set_callback(Some(cb), Some(&mut anim));
        notifier.subscribe(Some(&mut anim));
        notifier.subscribe(Some(&mut anim));
        assert_eq!(anim.finish_listener_count(), 1);

        anim.poll_finish();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_replacing_callback_moves_subscription() {
        let timeline = Timeline::new(Rc::new(ManualClock::new()));
        let mut anim = timeline.animate(KEYS, Duration::ZERO);
        let (first, cb1) = counter();
        let (second, cb2) = counter();

        let mut notifier = FinishNotifier::new();
        notifier.set_callback(Some(cb1), Some(&mut anim));
        notifier.set_callback(Some(cb2), Some(&mut anim));
        assert_eq!(anim.finish_listener_count(), 1);

        anim.poll_finish();
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn test_unsubscribe_from_replaced_animation() {
        let timeline = Timeline::new(Rc::new(ManualClock::new()));
        let mut old = timeline.animate(KEYS, Duration::ZERO);
        let mut new = timeline.animate(KEYS, Duration::ZERO);
        let (_count, cb) = counter();

        let mut notifier = FinishNotifier::new();
        notifier.set_callback(Some(cb), Some(&mut old));
        notifier.subscribe(Some(&mut new));
        // the old listener is left in place; it belongs to the old run
        assert_eq!(new.finish_listener_count(), 1);
        assert!(notifier.is_subscribed());

        notifier.unsubscribe(Some(&mut new));
        assert_eq!(new.finish_listener_count(), 0);
        assert!(!notifier.is_subscribed());
    }
}
