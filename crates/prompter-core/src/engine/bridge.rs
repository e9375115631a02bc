//! L3 Molecular Layer: progress ↔ scroll offset of the companion view
//!
//! Progress→scroll centres the reading line in the view and only runs while
//! paused. Scroll→progress runs on user scroll events. Programmatic scrolls
//! never emit scroll events, so the two rules cannot chase each other.

use super::timing::clamp;

/// A scrollable companion view, e.g. the script editor
pub trait ScrollView {
    fn scroll_top(&self) -> f64;
    fn client_height(&self) -> f64;
    fn scroll_height(&self) -> f64;
    /// Programmatic scroll; implementations may round to their own units
    fn scroll_to(&mut self, top: f64);
}

/// Scroll offset that puts `progress` in the middle of the view
#[inline]
pub fn scroll_target(scroll_height: f64, client_height: f64, progress: f64) -> f64 {
    clamp(scroll_height * progress - client_height / 2.0, 0.0, scroll_height)
}

/// Progress of the line in the middle of the view
#[inline]
pub fn progress_at(scroll_top: f64, client_height: f64, scroll_height: f64) -> f64 {
    if scroll_height <= 0.0 {
        return 0.0;
    }
    clamp((scroll_top + client_height / 2.0) / scroll_height, 0.0, 1.0)
}

/// Scroll `view` so the line at `progress` is centred
pub fn reflect_progress_on_view<V: ScrollView + ?Sized>(view: &mut V, progress: f64) {
    let top = scroll_target(view.scroll_height(), view.client_height(), progress);
    view.scroll_to(top);
}

/// Progress implied by the view's current scroll offset
pub fn progress_from_view<V: ScrollView + ?Sized>(view: &V) -> f64 {
    progress_at(view.scroll_top(), view.client_height(), view.scroll_height())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// View over `scroll_height` rows showing `client_height` of them
    #[derive(Debug, Clone, PartialEq)]
    pub struct TestView {
        pub top: f64,
        pub client: f64,
        pub height: f64,
        pub writes: usize,
    }

    impl TestView {
        pub fn new(client: f64, height: f64) -> Self {
            Self {
                top: 0.0,
                client,
                height,
                writes: 0,
            }
        }
    }

    impl ScrollView for TestView {
        fn scroll_top(&self) -> f64 {
            self.top
        }
        fn client_height(&self) -> f64 {
            self.client
        }
        fn scroll_height(&self) -> f64 {
            self.height
        }
        fn scroll_to(&mut self, top: f64) {
            self.writes += 1;
            self.top = clamp(top, 0.0, (self.height - self.client).max(0.0));
        }
    }

    #[test]
    fn test_scroll_target_centres_line() {
        assert_eq!(scroll_target(1000.0, 100.0, 0.5), 450.0);
        assert_eq!(scroll_target(1000.0, 100.0, 0.0), 0.0);
        assert_eq!(scroll_target(1000.0, 100.0, 1.0), 950.0);
    }

    #[test]
    fn test_progress_at_clamps() {
        assert_eq!(progress_at(450.0, 100.0, 1000.0), 0.5);
        assert_eq!(progress_at(0.0, 100.0, 1000.0), 0.05);
        assert_eq!(progress_at(5000.0, 100.0, 1000.0), 1.0);
        assert_eq!(progress_at(0.0, 100.0, 0.0), 0.0);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let (h, c) = (1000.0, 100.0);
        for i in 0..=20 {
            let p = i as f64 / 20.0;
            let top = scroll_target(h, c, p);
            let back = progress_at(top, c, h);
            let lo = progress_at(0.0, c, h);
            let expected = p.max(lo);
            assert!((back - expected).abs() < 1e-9, "p={p} back={back}");
        }
    }

    #[test]
    fn test_user_scroll_then_reflect_converges() {
        let mut view = TestView::new(100.0, 1000.0);
        view.top = 700.0;
        let p = progress_from_view(&view);
        assert_eq!(p, 0.75);

        reflect_progress_on_view(&mut view, p);
        assert_eq!(view.top, 700.0);
        assert_eq!(progress_from_view(&view), p);
    }
}
